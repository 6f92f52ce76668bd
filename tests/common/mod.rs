use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use toolforge::ai::TextGenerator;
use toolforge::config::Credentials;
use toolforge::error::{Error, Result};
use toolforge::remote::PlatformApi;
use toolforge::server::{AppState, create_router};
use toolforge::store::{SqliteStore, Store};
use toolforge::types::*;

pub const SHOP: &str = "test.myshopify.com";

/// In-process double for the platform admin API. Script tags live in a
/// plain Vec; everything else answers with canned data.
pub struct MockPlatform {
    pub tags: Mutex<Vec<ScriptTag>>,
    next_tag_id: Mutex<i64>,
    pub created_pages: Mutex<Vec<String>>,
    pub reject_page_handle: Option<String>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            tags: Mutex::new(Vec::new()),
            next_tag_id: Mutex::new(100),
            created_pages: Mutex::new(Vec::new()),
            reject_page_handle: None,
        }
    }

    pub fn with_tag(self, id: i64, src: &str) -> Self {
        self.tags.lock().unwrap().push(ScriptTag {
            id,
            src: src.to_string(),
            event: "onload".to_string(),
        });
        self
    }
}

#[async_trait]
impl PlatformApi for MockPlatform {
    async fn exchange_code(&self, _shop: &str, code: &str) -> Result<AccessTokenGrant> {
        Ok(AccessTokenGrant {
            access_token: format!("shpat_{code}"),
            scope: "read_themes,write_script_tags".to_string(),
        })
    }

    async fn list_themes(&self, _shop: &str, _token: &str) -> Result<Vec<Theme>> {
        Ok(vec![Theme {
            id: 42,
            name: "Dawn".to_string(),
            role: "main".to_string(),
        }])
    }

    async fn get_asset(
        &self,
        _shop: &str,
        _token: &str,
        _theme_id: i64,
        _key: &str,
    ) -> Result<String> {
        Ok(json!({
            "current": {
                "color_schemes": {
                    "scheme-1": {
                        "settings": { "background": "#ffffff", "text": "#121212" }
                    }
                }
            }
        })
        .to_string())
    }

    async fn list_script_tags(&self, _shop: &str, _token: &str) -> Result<Vec<ScriptTag>> {
        Ok(self.tags.lock().unwrap().clone())
    }

    async fn create_script_tag(
        &self,
        _shop: &str,
        _token: &str,
        src: &str,
        event: &str,
    ) -> Result<ScriptTag> {
        let mut next_id = self.next_tag_id.lock().unwrap();
        let tag = ScriptTag {
            id: *next_id,
            src: src.to_string(),
            event: event.to_string(),
        };
        *next_id += 1;
        self.tags.lock().unwrap().push(tag.clone());
        Ok(tag)
    }

    async fn delete_script_tag(&self, _shop: &str, _token: &str, id: i64) -> Result<()> {
        let mut tags = self.tags.lock().unwrap();
        let before = tags.len();
        tags.retain(|t| t.id != id);
        if tags.len() == before {
            return Err(Error::Remote {
                status: 404,
                body: "Not Found".to_string(),
            });
        }
        Ok(())
    }

    async fn create_page(
        &self,
        _shop: &str,
        _token: &str,
        title: &str,
        handle: &str,
    ) -> Result<PageCreateResult> {
        if self.reject_page_handle.as_deref() == Some(handle) {
            return Ok(PageCreateResult {
                page: None,
                user_errors: vec![UserError {
                    code: Some("TAKEN".to_string()),
                    field: Some(vec!["handle".to_string()]),
                    message: "Handle has already been taken".to_string(),
                }],
            });
        }

        self.created_pages.lock().unwrap().push(handle.to_string());
        Ok(PageCreateResult {
            page: Some(PageInfo {
                id: format!("gid://shopify/Page/{}", handle.len()),
                title: title.to_string(),
                handle: handle.to_string(),
            }),
            user_errors: Vec::new(),
        })
    }

    async fn list_products(&self, _shop: &str, _token: &str) -> Result<Vec<Product>> {
        Ok(vec![Product {
            id: "gid://shopify/Product/1".to_string(),
            title: "Shirt".to_string(),
            handle: "shirt".to_string(),
            description: String::new(),
            product_type: "Apparel".to_string(),
            vendor: "Acme".to_string(),
            tags: vec!["summer".to_string()],
            status: "ACTIVE".to_string(),
            created_at: None,
            updated_at: None,
            image: None,
            variant: None,
        }])
    }
}

pub struct MockGenerator;

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(format!("<div data-prompt-chars=\"{}\"></div>", prompt.len()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub platform: Arc<MockPlatform>,
    _temp: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_platform(MockPlatform::new())
    }

    pub fn with_platform(platform: MockPlatform) -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let store = Arc::new(SqliteStore::new(temp.path().join("test.db")).expect("open store"));
        store.initialize().expect("initialize store");

        let platform = Arc::new(platform);
        let credentials = Credentials {
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            scopes: "read_themes,write_script_tags".to_string(),
            redirect_uri: "https://app.example.com/auth/callback".to_string(),
            app_url: "https://app.example.com".to_string(),
            ai_api_key: "test-ai-key".to_string(),
            loader_url: "https://loader.example.com/ai-tools.js".to_string(),
        };

        let state = Arc::new(AppState::new(
            store.clone(),
            platform.clone(),
            Arc::new(MockGenerator),
            credentials,
        ));

        Self {
            router: create_router(state),
            store,
            platform,
            _temp: temp,
        }
    }

    pub fn authenticate(&self, shop: &str) {
        self.store
            .save_session(shop, "shpat_test", "read_themes,write_script_tags")
            .expect("save session");
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("build request");
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, body)
    }
}
