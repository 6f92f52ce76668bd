mod shopify;

pub use shopify::ShopifyClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::*;

/// Client contract for the merchant platform's admin API. Everything the
/// orchestrator needs from the remote side goes through this trait so that
/// tests can swap in an in-process double.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// OAuth code-for-token exchange against the shop's token endpoint.
    async fn exchange_code(&self, shop: &str, code: &str) -> Result<AccessTokenGrant>;

    async fn list_themes(&self, shop: &str, token: &str) -> Result<Vec<Theme>>;

    /// Fetches a single theme asset value, e.g. `config/settings_data.json`.
    async fn get_asset(&self, shop: &str, token: &str, theme_id: i64, key: &str)
    -> Result<String>;

    async fn list_script_tags(&self, shop: &str, token: &str) -> Result<Vec<ScriptTag>>;

    async fn create_script_tag(
        &self,
        shop: &str,
        token: &str,
        src: &str,
        event: &str,
    ) -> Result<ScriptTag>;

    async fn delete_script_tag(&self, shop: &str, token: &str, id: i64) -> Result<()>;

    /// Creates a published storefront page. Platform-side validation
    /// failures come back as `user_errors`, not as an `Err`.
    async fn create_page(
        &self,
        shop: &str,
        token: &str,
        title: &str,
        handle: &str,
    ) -> Result<PageCreateResult>;

    async fn list_products(&self, shop: &str, token: &str) -> Result<Vec<Product>>;
}
