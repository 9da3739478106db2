//! The web server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::time::{MissedTickBehavior, interval};

use crate::generator::TextGenerator;
use crate::web::config::WebConfig;
use crate::web::registry::SessionRegistry;
use crate::web::routes::router;
use crate::{Error, Result};

/// Serves the chat page and its API until the process exits.
pub struct WebServer<G: TextGenerator + Clone> {
    config: WebConfig,
    registry: Arc<SessionRegistry<G>>,
}

impl<G: TextGenerator + Clone + 'static> WebServer<G> {
    /// Create a server whose sessions use clones of `generator`.
    pub fn new(config: WebConfig, generator: G) -> Self {
        Self {
            config,
            registry: Arc::new(SessionRegistry::new(generator)),
        }
    }

    /// Bind and serve.  Idle sessions are swept in the background.
    pub async fn start(self) -> Result<()> {
        let addr = self.config.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::io(format!("could not bind {addr}"), e))?;
        tracing::info!(%addr, "serving chat page");

        let registry = Arc::clone(&self.registry);
        let idle = self.config.session_idle;
        let mut ticker = interval(self.config.sweep_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(idle).await;
                if evicted > 0 {
                    tracing::debug!(evicted, "swept idle sessions");
                }
            }
        });

        axum::serve(listener, router(self.registry))
            .await
            .map_err(|e| Error::io("server failed", e))
    }
}
