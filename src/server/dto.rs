use serde::{Deserialize, Serialize};

use crate::types::Product;

// Request bodies. Fields the original admin UI may omit are optional here
// so handlers can answer 400 instead of a deserialization rejection.

#[derive(Debug, Deserialize)]
pub struct AddToolScriptRequest {
    pub name: String,
    #[serde(default)]
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveToolScriptRequest {
    pub delete_script_id: i64,
    #[serde(default)]
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePagePathRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageBookmarksRequest {
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

// Query strings

#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    #[serde(default)]
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "LandingPage", default)]
    pub landing_page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptQuery {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub shop: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// Response bodies

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToolScriptResponse {
    pub message: &'static str,
    pub shop_url: String,
    pub shop: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePathResponse {
    pub path: Option<String>,
    pub shop_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreUrlResponse {
    pub store_url: String,
    pub shop: String,
    pub has_path: bool,
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub count: usize,
    pub shop: String,
}
