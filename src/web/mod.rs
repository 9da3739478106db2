//! Browser front end: a single chat page served by axum.
//!
//! Each browser tab gets its own [`ChatSession`](crate::chat::ChatSession),
//! created when the page loads and destroyed when the tab goes away.  A
//! turn streams its render events back to the page as server-sent events.

mod config;
mod events;
mod page;
mod registry;
mod routes;
mod server;

pub use config::{DEFAULT_BIND, WebArgs, WebConfig};
pub use events::{EventRenderer, MessageView, RenderEvent};
pub use page::render_index;
pub use registry::{SessionId, SessionRegistry, SharedSession};
pub use routes::{AppState, CreatedSession, MessageRequest, SessionView, router};
pub use server::WebServer;
