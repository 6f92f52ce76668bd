use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use super::dto::{ContentQuery, PromptQuery};
use super::response::ApiError;
use super::router::AppState;

/// Installation leaderboard, most-installed first.
pub async fn analytics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tools = state.store.installation_leaderboard()?;
    Ok::<_, ApiError>(Json(tools))
}

/// Serves generated markup to the storefront loader. A landing-page load
/// counts as an installation event for the named tool.
pub async fn llm_response(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContentQuery>,
) -> impl IntoResponse {
    if params.landing_page.as_deref() == Some("true") {
        match params.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => {
                state.store.increment_installation(name)?;
            }
            None => tracing::warn!("landing page load without a tool name, not counted"),
        }
    }

    let content = state
        .store
        .get_content(&params.id)?
        .ok_or_else(|| ApiError::not_found("Response not found"))?;

    Ok::<_, ApiError>(Json(content))
}

/// Raw prompt passthrough for the admin UI's ad-hoc generation calls.
pub async fn ai_tools(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PromptQuery>,
) -> impl IntoResponse {
    let response = state.generator.generate(&params.prompt).await?;
    Ok::<_, ApiError>(Json(json!({ "response": response })))
}
