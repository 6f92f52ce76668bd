use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use rand::{Rng, distributions::Alphanumeric};

use super::dto::{CallbackQuery, ShopQuery};
use super::response::ApiError;
use super::router::AppState;
use super::validation::validate_shop_domain;

const STATE_LENGTH: usize = 26;

fn oauth_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// OAuth step 1: redirect the merchant to the platform's authorize page.
pub async fn begin_auth(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopQuery>,
) -> impl IntoResponse {
    let shop = params.shop.as_deref().ok_or_else(|| {
        ApiError::bad_request("Missing shop parameter! Usage: /auth?shop=your-shop.myshopify.com")
    })?;
    validate_shop_domain(shop)?;

    let creds = &state.credentials;
    let auth_url = format!(
        "https://{shop}/admin/oauth/authorize?client_id={}&scope={}&redirect_uri={}&state={}",
        creds.api_key,
        urlencoding::encode(&creds.scopes),
        urlencoding::encode(&creds.redirect_uri),
        oauth_state()
    );

    tracing::info!("redirecting {} to platform OAuth", shop);
    Ok::<_, ApiError>(Redirect::to(&auth_url))
}

/// OAuth step 2: exchange the callback code for an access token and persist
/// the shop session.
pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackQuery>,
) -> impl IntoResponse {
    if let Some(error) = params.error {
        return Err(ApiError::bad_request(format!("OAuth error: {error}")));
    }

    let (Some(shop), Some(code)) = (params.shop.as_deref(), params.code.as_deref()) else {
        return Err(ApiError::bad_request(
            "Missing required parameters (shop or code)",
        ));
    };
    validate_shop_domain(shop)?;

    let grant = state.platform.exchange_code(shop, code).await?;
    state
        .store
        .save_session(shop, &grant.access_token, &grant.scope)?;

    tracing::info!("authenticated shop {} (scopes: {})", shop, grant.scope);

    let app_url = format!(
        "{}/?shop={}&authenticated=true&message={}",
        state.credentials.app_url,
        shop,
        urlencoding::encode(&format!("Successfully connected to {shop}"))
    );
    Ok::<_, ApiError>(Redirect::to(&app_url))
}
