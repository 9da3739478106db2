//! Browser chat with Gemini.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! geminichat-web --bind 127.0.0.1:8501
//! ```
//!
//! Then open the printed address in a browser.

use std::sync::Arc;

use arrrg::CommandLine;

use geminichat::logging::init_tracing;
use geminichat::web::{WebArgs, WebConfig, WebServer};
use geminichat::{Gemini, TracingLogger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = WebArgs::from_command_line_relaxed("geminichat-web [OPTIONS]");
    init_tracing("info");
    let config = WebConfig::try_from(args)?;

    let client = Gemini::new(None)?.with_logger(Arc::new(TracingLogger));
    println!("Chat page at http://{}/", config.bind_addr);
    WebServer::new(config, client).start().await?;
    Ok(())
}
