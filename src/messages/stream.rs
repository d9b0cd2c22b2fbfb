use std::{convert::Infallible, sync::Arc};

use async_stream::stream;
use axum::{
    debug_handler,
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::json;
use sqlx::SqlitePool;

use crate::llm::Generate;

use super::{store, Profile, REQUIRED_FIELDS_ERROR};

/// Stream a personalized message to the client as SSE while
/// accumulating the full text for persistence.
#[debug_handler(state = crate::AppState)]
pub async fn create_message_stream(
    State(db_pool): State<SqlitePool>,
    State(generator): State<Arc<dyn Generate>>,
    Json(profile): Json<Profile>,
) -> Response {
    if !profile.is_complete() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": REQUIRED_FIELDS_ERROR })),
        )
            .into_response();
    }

    (
        [(header::CACHE_CONTROL, "no-cache")],
        Sse::new(relay(db_pool, generator, profile)),
    )
        .into_response()
}

/// Forward fragments to the client as they arrive, then persist and
/// emit exactly one terminal event: `{"done":true}` or `{"error":...}`.
///
/// If the client disconnects the stream is dropped at its next await,
/// so nothing is persisted for an abandoned generation.
fn relay(
    db_pool: SqlitePool,
    generator: Arc<dyn Generate>,
    profile: Profile,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream! {
        let mut fragments = generator.generate_stream(profile.clone());
        let mut message = String::new();
        while let Some(fragment) = fragments.next().await {
            message.push_str(&fragment);
            yield Ok(Event::default().data(json!({ "chunk": fragment }).to_string()));
        }

        // The record must be durable before the done event goes out.
        match store::save(&db_pool, &profile, &message).await {
            Ok(record) => {
                tracing::debug!("persisted generated message {}", record.id);
                yield Ok(Event::default().data(r#"{"done":true}"#));
            }
            Err(e) => {
                // Headers are already committed, so the failure has to
                // ride the stream as an in-band event. Detail stays in
                // the log, like the batch path's AppError.
                tracing::error!("failed to persist generated message: {e}");
                yield Ok(Event::default().data(r#"{"error":"Internal server error"}"#));
            }
        }
    }
}
