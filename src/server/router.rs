use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::{analytics, auth, bookmarks, pages, products, scripts};
use crate::ai::TextGenerator;
use crate::config::Credentials;
use crate::provision::Provisioner;
use crate::remote::PlatformApi;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub platform: Arc<dyn PlatformApi>,
    pub generator: Arc<dyn TextGenerator>,
    pub provisioner: Provisioner,
    pub credentials: Credentials,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        platform: Arc<dyn PlatformApi>,
        generator: Arc<dyn TextGenerator>,
        credentials: Credentials,
    ) -> Self {
        let provisioner = Provisioner::new(
            store.clone(),
            platform.clone(),
            generator.clone(),
            credentials.loader_url.clone(),
        );
        Self {
            store,
            platform,
            generator,
            provisioner,
            credentials,
        }
    }
}

async fn hello() -> &'static str {
    "Hello from the Toolforge backend!"
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/health", get(health))
        .route("/auth", get(auth::begin_auth))
        .route("/auth/callback", get(auth::auth_callback))
        .route("/addToolScript", post(scripts::add_tool_script))
        .route("/removeToolScript", post(scripts::remove_tool_script))
        .route("/get-scripts", get(scripts::get_scripts))
        .route("/get-page-path", get(pages::get_page_path))
        .route("/save-page-path", post(pages::save_page_path))
        .route("/get-store-url", get(pages::get_store_url))
        .route("/manage-bookmarks", post(bookmarks::manage_bookmarks))
        .route("/analytics", get(analytics::analytics))
        .route("/llmResponse", get(analytics::llm_response))
        .route("/ai-tools", post(analytics::ai_tools))
        .route("/get-products", get(products::get_products))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
