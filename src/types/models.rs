use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Authentication record for a shop. At most one per shop; refreshed on
/// every OAuth exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSession {
    pub shop: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub scope: String,
    pub updated_at: DateTime<Utc>,
}

/// AI-generated markup for one provisioning run, addressed by the loader
/// script via `id`. Write-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub id: String,
    pub landing: String,
    pub popup: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePath {
    pub shop_name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInstallation {
    pub tool_name: String,
    pub metrics: i64,
}

/// The ordered, duplicate-free title set a bookmark operation leaves behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkSet {
    pub titles: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkAction {
    Add,
    Remove,
    Get,
    Clear,
}

impl FromStr for BookmarkAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "get" => Ok(Self::Get),
            "clear" => Ok(Self::Clear),
            _ => Err(Error::BadRequest(format!("invalid action: {s}"))),
        }
    }
}

impl fmt::Display for BookmarkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Get => "get",
            Self::Clear => "clear",
        };
        f.write_str(s)
    }
}

// Remote platform wire types. Field names follow the platform's admin API.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub id: i64,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptTag {
    pub id: i64,
    pub src: String,
    #[serde(default)]
    pub event: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub id: String,
    pub title: String,
    pub handle: String,
}

/// Structured user-level failure from the platform, distinct from a
/// transport fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCreateResult {
    pub page: Option<PageInfo>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub image: Option<ProductImage>,
    pub variant: Option<ProductVariant>,
}
