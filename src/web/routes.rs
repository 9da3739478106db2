//! HTTP routes of the web front end.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::chat::Renderer;
use crate::generator::TextGenerator;
use crate::web::events::{EventRenderer, MessageView, RenderEvent};
use crate::web::page::render_index;
use crate::web::registry::{SessionId, SessionRegistry};

/// Shared state of every route.
pub struct AppState<G: TextGenerator + Clone> {
    registry: Arc<SessionRegistry<G>>,
}

impl<G: TextGenerator + Clone> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

/// Body of `POST /api/sessions/:id/messages`.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// What the user typed.
    pub text: String,
}

/// Body returned by `POST /api/sessions`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedSession {
    /// Identifier for subsequent calls.
    pub session_id: SessionId,
}

/// Body returned by `GET /api/sessions/:id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    /// Identifier of the session.
    pub session_id: SessionId,
    /// The transcript, oldest first.
    pub messages: Vec<MessageView>,
    /// Number of messages in the transcript.
    pub message_count: usize,
}

#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn unknown_session(id: &SessionId) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("unknown session {id}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.message
        }));
        (self.status, body).into_response()
    }
}

/// Build the router over `registry`.
pub fn router<G>(registry: Arc<SessionRegistry<G>>) -> Router
where
    G: TextGenerator + Clone + 'static,
{
    let state = AppState { registry };
    Router::new()
        .route("/", get(index))
        .route("/api/sessions", post(create_session::<G>))
        .route(
            "/api/sessions/:id",
            get(get_session::<G>).delete(delete_session::<G>),
        )
        .route("/api/sessions/:id/messages", post(post_message::<G>))
        .route("/api/sessions/:id/clear", post(clear_session::<G>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<String> {
    Html(render_index())
}

async fn create_session<G>(State(state): State<AppState<G>>) -> Json<CreatedSession>
where
    G: TextGenerator + Clone + 'static,
{
    let session_id = state.registry.create().await;
    Json(CreatedSession { session_id })
}

async fn get_session<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, AppError>
where
    G: TextGenerator + Clone + 'static,
{
    let session = state
        .registry
        .get(&id)
        .await
        .ok_or_else(|| AppError::unknown_session(&id))?;
    let session = session.lock().await;
    Ok(Json(SessionView {
        session_id: id,
        messages: session.messages().iter().map(MessageView::from).collect(),
        message_count: session.message_count(),
    }))
}

async fn delete_session<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, AppError>
where
    G: TextGenerator + Clone + 'static,
{
    if state.registry.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::unknown_session(&id))
    }
}

async fn clear_session<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<SessionId>,
) -> Result<Json<Vec<RenderEvent>>, AppError>
where
    G: TextGenerator + Clone + 'static,
{
    let session = state
        .registry
        .get(&id)
        .await
        .ok_or_else(|| AppError::unknown_session(&id))?;
    let (mut renderer, mut rx) = EventRenderer::channel();
    {
        let mut session = session.lock().await;
        session.clear(&mut renderer);
        renderer.render_message_count(session.message_count());
    }
    drop(renderer);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    Ok(Json(events))
}

async fn post_message<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<SessionId>,
    Json(req): Json<MessageRequest>,
) -> Result<Response, AppError>
where
    G: TextGenerator + Clone + 'static,
{
    let session = state
        .registry
        .get(&id)
        .await
        .ok_or_else(|| AppError::unknown_session(&id))?;
    if req.text.trim().is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    // The turn runs to completion even if the browser disconnects.
    let (mut renderer, mut rx) = EventRenderer::channel();
    tokio::spawn(async move {
        let mut session = session.lock().await;
        session.handle_user_input(&req.text, &mut renderer).await;
    });

    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match Event::default().event(event.name()).json_data(&event) {
                Ok(sse) => yield Ok::<_, Infallible>(sse),
                Err(err) => tracing::warn!(error = %err, "could not encode render event"),
            }
        }
        yield Ok(Event::default().event("done").data(r#"{"type":"done"}"#));
    };
    Ok(Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response())
}
