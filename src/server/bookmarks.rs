use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use super::dto::ManageBookmarksRequest;
use super::response::ApiError;
use super::router::AppState;
use crate::types::BookmarkAction;

pub async fn manage_bookmarks(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ManageBookmarksRequest>,
) -> impl IntoResponse {
    let (Some(shop_name), Some(action)) = (req.shop_name.as_deref(), req.action.as_deref()) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Shop name and action are required" })),
        ));
    };

    if matches!(action, "add" | "remove") && req.title.is_none() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Title is required for add/remove actions" })),
        ));
    }

    if state.store.get_session(shop_name)?.is_none() {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "Shop not authenticated",
                "redirectToAuth": format!("/auth?shop={shop_name}"),
            })),
        ));
    }

    let parsed: BookmarkAction = action
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid action"))?;

    let result = state
        .store
        .manage_bookmarks(shop_name, parsed, req.title.as_deref())?;

    Ok::<_, ApiError>((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": result,
            "message": format!("Bookmark {action} successful"),
        })),
    ))
}
