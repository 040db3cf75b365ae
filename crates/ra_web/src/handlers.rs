use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use ra_core::{FeedResponse, Scope};
use ra_reader::Action;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
    pub voice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub id: String,
}

pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let scope: Scope = query
        .location
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(ApiError::BadRequest)?;

    let response = state.feed.assemble(scope).await.map_err(|e| {
        error!("❌ Feed sync failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(response))
}

/// Stream synthesized audio, or tell the client to speak the text itself.
pub async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    let text = request.text.trim();
    if text.is_empty() {
        return ApiError::BadRequest("text is required".to_string()).into_response();
    }

    let Some(speech) = state.speech.as_ref() else {
        return browser_speech(text);
    };

    match speech.synthesize(text, request.voice.as_deref()).await {
        Ok(audio) => (
            [(header::CONTENT_TYPE, "audio/mpeg")],
            Body::from_stream(audio),
        )
            .into_response(),
        Err(e) => {
            warn!("⚠️ {} failed, falling back to browser speech: {}", speech.name(), e);
            browser_speech(text)
        }
    }
}

fn browser_speech(text: &str) -> Response {
    Json(json!({ "use_browser_tts": true, "text": text })).into_response()
}

pub async fn archive(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    apply(&state, Action::Archive, &request.id).await
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    apply(&state, Action::Delete, &request.id).await
}

pub async fn later(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    apply(&state, Action::Later, &request.id).await
}

async fn apply(state: &AppState, action: Action, id: &str) -> Result<Json<Value>, ApiError> {
    state.actions.apply(action, id).await.map_err(|e| {
        error!("❌ {} {:?} failed: {}", action, id, e);
        ApiError::from(e)
    })?;
    Ok(Json(json!({ "success": true })))
}
