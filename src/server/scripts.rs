use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use super::dto::{
    AddToolScriptRequest, AddToolScriptResponse, RemoveToolScriptRequest, ShopQuery,
};
use super::response::ApiError;
use super::router::AppState;
use crate::error::Error;

/// Runs the full provisioning workflow for `(shop, name)` and answers with
/// the installable storefront URL.
pub async fn add_tool_script(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddToolScriptRequest>,
) -> impl IntoResponse {
    let Some(shop) = req.shop.as_deref() else {
        return Err(ApiError::bad_request("Shop parameter is required"));
    };

    let outcome = state.provisioner.install(shop, &req.name).await?;

    Ok::<_, ApiError>(Json(AddToolScriptResponse {
        message: "Script tag added successfully",
        shop_url: outcome.shop_url,
        shop: shop.to_string(),
    }))
}

/// Deletes one installed script tag by id. The `{success: bool}` envelope is
/// what the admin UI's installed-scripts table consumes.
pub async fn remove_tool_script(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RemoveToolScriptRequest>,
) -> impl IntoResponse {
    let Some(shop) = req.shop.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Shop parameter is required" })),
        );
    };

    let session = match state.store.get_session(shop) {
        Ok(Some(session)) => session,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "error": "Shop not authenticated",
                    "redirectToAuth": format!("/auth?shop={shop}"),
                })),
            );
        }
        Err(e) => {
            tracing::error!("session lookup failed for {}: {}", shop, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Internal server error" })),
            );
        }
    };

    match state
        .platform
        .delete_script_tag(shop, &session.access_token, req.delete_script_id)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(Error::Remote { status, body }) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(json!({ "success": false, "error": body })),
        ),
        Err(e) => {
            tracing::error!("failed to remove script tag for {}: {}", shop, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Internal server error" })),
            )
        }
    }
}

/// Lists the shop's installed script tags. Steady state is at most one, but
/// the read side does not enforce it.
pub async fn get_scripts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopQuery>,
) -> impl IntoResponse {
    let Some(shop) = params.shop.as_deref() else {
        return Err(ApiError::bad_request("Shop parameter is required"));
    };

    let session = state
        .store
        .get_session(shop)?
        .ok_or_else(|| ApiError::unauthenticated(shop))?;

    let tags = state
        .platform
        .list_script_tags(shop, &session.access_token)
        .await?;

    Ok::<_, ApiError>(Json(tags))
}
