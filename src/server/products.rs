use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use super::dto::{ProductsResponse, ShopQuery};
use super::response::ApiError;
use super::router::AppState;

pub async fn get_products(
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

    let products = state
        .platform
        .list_products(shop, &session.access_token)
        .await?;

    let count = products.len();
    Ok::<_, ApiError>(Json(ProductsResponse {
        products,
        count,
        shop: shop.to_string(),
    }))
}
