//! Configuration for the web front end.

use std::net::SocketAddr;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::{Error, Result};

/// Address the server listens on unless `--bind` says otherwise.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Minutes a session may sit unused before it is dropped.
pub const DEFAULT_IDLE_MINUTES: u64 = 30;

/// Command-line arguments for the geminichat-web tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct WebArgs {
    /// Address to listen on.
    #[arrrg(optional, "Address to listen on (default: 127.0.0.1:8501)", "ADDR")]
    pub bind: Option<String>,

    /// Idle time before a session is dropped.
    #[arrrg(optional, "Drop sessions unused this many minutes (default: 30)", "MINUTES")]
    pub idle_minutes: Option<u64>,
}

/// Resolved web server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Socket address to bind.
    pub bind_addr: SocketAddr,
    /// Sessions unused this long are dropped.
    pub session_idle: Duration,
}

impl WebConfig {
    /// How often idle sessions are looked for.
    pub fn sweep_interval(&self) -> Duration {
        (self.session_idle / 4).max(Duration::from_secs(1))
    }
}

impl TryFrom<WebArgs> for WebConfig {
    type Error = Error;

    fn try_from(args: WebArgs) -> Result<Self> {
        let bind = args.bind.as_deref().unwrap_or(DEFAULT_BIND);
        let bind_addr = bind.parse::<SocketAddr>().map_err(|e| {
            Error::io(
                format!("invalid --bind address {bind:?}"),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
            )
        })?;
        let minutes = args.idle_minutes.unwrap_or(DEFAULT_IDLE_MINUTES).max(1);
        Ok(Self {
            bind_addr,
            session_idle: Duration::from_secs(minutes * 60),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WebConfig::try_from(WebArgs::default()).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
        assert_eq!(config.session_idle, Duration::from_secs(30 * 60));
        assert_eq!(config.sweep_interval(), Duration::from_secs(450));
    }

    #[test]
    fn custom_values() {
        let config = WebConfig::try_from(WebArgs {
            bind: Some("0.0.0.0:9000".to_string()),
            idle_minutes: Some(0),
        })
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.session_idle, Duration::from_secs(60));
    }

    #[test]
    fn bad_bind_is_an_error() {
        let err = WebConfig::try_from(WebArgs {
            bind: Some("localhost".to_string()),
            ..WebArgs::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("invalid --bind address"));
    }
}
