//! Tool provisioning: the one sequenced workflow in the system.
//!
//! Given an authenticated shop and a tool name, a run reads the active
//! theme's color settings, generates popup and tool markup, persists them
//! under a fresh identifier, and installs a script tag pointing the
//! storefront loader at that identifier. At most one tool per shop: any
//! previously installed tag is removed first.

use std::sync::Arc;

use rand::{Rng, distributions::Alphanumeric};
use serde_json::Value;

use crate::ai::{TextGenerator, prompts};
use crate::error::{Error, Result};
use crate::remote::PlatformApi;
use crate::store::Store;
use crate::types::GeneratedContent;

const CONTENT_ID_LENGTH: usize = 13;
const SETTINGS_ASSET_KEY: &str = "config/settings_data.json";
const COLOR_SCHEME_KEY: &str = "scheme-1";
const MAIN_THEME_ROLE: &str = "main";
const SCRIPT_TAG_EVENT: &str = "onload";
const DEFAULT_PAGE_PATH: &str = "default";

#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    pub shop_url: String,
    pub content_id: String,
}

pub struct Provisioner {
    store: Arc<dyn Store>,
    platform: Arc<dyn PlatformApi>,
    generator: Arc<dyn TextGenerator>,
    loader_base_url: String,
}

impl Provisioner {
    pub fn new(
        store: Arc<dyn Store>,
        platform: Arc<dyn PlatformApi>,
        generator: Arc<dyn TextGenerator>,
        loader_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            platform,
            generator,
            loader_base_url: loader_base_url.into(),
        }
    }

    /// Runs one end-to-end provisioning for `(shop, tool_name)`.
    ///
    /// Failures short-circuit; completed steps are not rolled back. In
    /// particular, a failure after the old script tag was removed leaves
    /// the shop without an installed tool.
    pub async fn install(&self, shop: &str, tool_name: &str) -> Result<ProvisionOutcome> {
        let session = self
            .store
            .get_session(shop)?
            .ok_or_else(|| Error::Unauthenticated {
                shop: shop.to_string(),
            })?;
        let token = &session.access_token;

        self.remove_existing_tag(shop, token).await;

        let colors = self.fetch_theme_colors(shop, token).await?;

        let path = self
            .store
            .get_page_path(shop)?
            .map(|p| p.path)
            .unwrap_or_else(|| DEFAULT_PAGE_PATH.to_string());

        let id = generate_content_id();

        let popup_prompt = prompts::popup_prompt(tool_name, &path);
        let tool_prompt = prompts::tool_prompt(tool_name, &colors);
        let (popup, landing) = tokio::join!(
            self.generator.generate(&popup_prompt),
            self.generator.generate(&tool_prompt),
        );
        let (popup, landing) = (popup?, landing?);

        self.store.insert_content(&GeneratedContent {
            id: id.clone(),
            landing,
            popup,
        })?;

        let src = loader_src(&self.loader_base_url, &id, tool_name, &path);
        let tag = self
            .platform
            .create_script_tag(shop, token, &src, SCRIPT_TAG_EVENT)
            .await?;

        tracing::info!("installed script tag {} for {} ({})", tag.id, shop, tool_name);

        Ok(ProvisionOutcome {
            shop_url: format!("https://{shop}/pages/{path}"),
            content_id: id,
        })
    }

    /// Removes the shop's current script tag, if any. Best-effort: failures
    /// here are logged and never abort the run.
    async fn remove_existing_tag(&self, shop: &str, token: &str) {
        match self.platform.list_script_tags(shop, token).await {
            Ok(tags) => {
                if let Some(tag) = tags.first() {
                    if let Err(e) = self.platform.delete_script_tag(shop, token, tag.id).await {
                        tracing::warn!(
                            "failed to remove existing script tag {} for {}: {}",
                            tag.id,
                            shop,
                            e
                        );
                    }
                }
            }
            Err(e) => tracing::warn!("failed to list script tags for {}: {}", shop, e),
        }
    }

    async fn fetch_theme_colors(&self, shop: &str, token: &str) -> Result<Value> {
        let themes = self.platform.list_themes(shop, token).await?;
        let main_theme = themes
            .into_iter()
            .find(|t| t.role == MAIN_THEME_ROLE)
            .ok_or_else(|| Error::MissingPrecondition("shop has no main theme".to_string()))?;

        let raw = self
            .platform
            .get_asset(shop, token, main_theme.id, SETTINGS_ASSET_KEY)
            .await?;

        extract_scheme_colors(&raw)
    }
}

/// Pulls `current.color_schemes["scheme-1"].settings` out of the theme's
/// settings asset. A theme without that scheme cannot be styled against and
/// aborts the run.
fn extract_scheme_colors(raw: &str) -> Result<Value> {
    let settings: Value = serde_json::from_str(raw)
        .map_err(|e| Error::MissingPrecondition(format!("theme settings are not valid JSON: {e}")))?;

    settings
        .get("current")
        .and_then(|c| c.get("color_schemes"))
        .and_then(|s| s.get(COLOR_SCHEME_KEY))
        .and_then(|s| s.get("settings"))
        .cloned()
        .ok_or_else(|| {
            Error::MissingPrecondition(format!(
                "theme has no '{COLOR_SCHEME_KEY}' color scheme settings"
            ))
        })
}

/// Short opaque identifier for a generated-content row. No uniqueness check
/// against the store; a collision surfaces as a primary-key conflict on
/// insert.
fn generate_content_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CONTENT_ID_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

fn loader_src(base: &str, id: &str, name: &str, path: &str) -> String {
    format!(
        "{}?id={}&name={}&path={}",
        base,
        urlencoding::encode(id),
        urlencoding::encode(name),
        urlencoding::encode(path)
    )
}
