use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use super::dto::{PagePathResponse, SavePagePathRequest, ShopQuery, StoreUrlResponse};
use super::response::ApiError;
use super::router::AppState;
use crate::error::Error;

pub async fn get_page_path(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopQuery>,
) -> impl IntoResponse {
    let Some(shop) = params.shop.as_deref() else {
        return Err(ApiError::bad_request("Shop parameter is required"));
    };

    let path = state.store.get_page_path(shop)?;

    Ok::<_, ApiError>(Json(PagePathResponse {
        path: path.map(|p| p.path),
        shop_name: shop.to_string(),
    }))
}

/// Persists the shop's page path and creates the matching published
/// storefront page. The path row is written before the remote call, so a
/// platform-side user error leaves it in place.
pub async fn save_page_path(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SavePagePathRequest>,
) -> impl IntoResponse {
    let (Some(path), Some(shop_name)) = (req.path.as_deref(), req.shop_name.as_deref()) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Path and shop name are required" })),
        ));
    };

    let Some(session) = state.store.get_session(shop_name)? else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "Shop not authenticated",
                "redirectToAuth": format!("/auth?shop={shop_name}"),
            })),
        ));
    };

    match state.store.save_page_path(shop_name, path) {
        Ok(_) => {}
        Err(Error::AlreadyExists) => {
            return Ok((
                StatusCode::CONFLICT,
                Json(json!({
                    "success": false,
                    "error": "A page path is already configured for this shop",
                })),
            ));
        }
        Err(e) => return Err(ApiError::from(e)),
    }

    let title = format!("{path} Page");
    let result = state
        .platform
        .create_page(shop_name, &session.access_token, &title, path)
        .await?;

    if let Some(user_error) = result.user_errors.first() {
        tracing::warn!(
            "page creation for {} rejected: {}",
            shop_name,
            user_error.message
        );
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": user_error.message })),
        ));
    }

    Ok::<_, ApiError>((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": result,
            "message": "Page path saved successfully",
        })),
    ))
}

/// Composes the public storefront URL for the shop, pointing at the
/// configured tool page when one exists.
pub async fn get_store_url(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopQuery>,
) -> impl IntoResponse {
    let Some(shop) = params.shop.as_deref() else {
        return Err(ApiError::bad_request("Shop parameter is required"));
    };

    if state.store.get_session(shop)?.is_none() {
        return Err(ApiError::unauthenticated(shop));
    }

    let path = state.store.get_page_path(shop)?.map(|p| p.path);
    let store_url = match &path {
        Some(path) => format!("https://{shop}/pages/{path}"),
        None => format!("https://{shop}"),
    };

    Ok::<_, ApiError>(Json(StoreUrlResponse {
        store_url,
        shop: shop.to_string(),
        has_path: path.is_some(),
        authenticated: true,
    }))
}
