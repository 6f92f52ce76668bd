use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::PlatformApi;
use crate::error::{Error, Result};
use crate::types::*;

const API_VERSION: &str = "2024-04";
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Admin API client. REST for themes, assets and script tags; GraphQL for
/// page creation and products, where the platform reports user errors
/// structurally.
pub struct ShopifyClient {
    client: Client,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct ThemesEnvelope {
    themes: Vec<Theme>,
}

#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    asset: Asset,
}

#[derive(Debug, Deserialize)]
struct Asset {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ScriptTagsEnvelope {
    script_tags: Vec<ScriptTag>,
}

#[derive(Debug, Deserialize)]
struct ScriptTagEnvelope {
    script_tag: ScriptTag,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Edges<T> {
    #[serde(default)]
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    id: String,
    title: String,
    handle: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    product_type: String,
    #[serde(default)]
    vendor: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    images: Edges<ProductImage>,
    variants: Edges<ProductVariant>,
}

const PAGE_CREATE_MUTATION: &str = r#"
mutation CreatePage($page: PageCreateInput!) {
  pageCreate(page: $page) {
    page {
      id
      title
      handle
    }
    userErrors {
      code
      field
      message
    }
  }
}
"#;

const PRODUCTS_QUERY: &str = r#"
{
  products(first: 10) {
    edges {
      node {
        id
        title
        handle
        description
        productType
        vendor
        tags
        status
        createdAt
        updatedAt
        images(first: 1) {
          edges {
            node {
              id
              url
              altText
            }
          }
        }
        variants(first: 1) {
          edges {
            node {
              id
              title
              price
              compareAtPrice
              sku
              inventoryQuantity
            }
          }
        }
      }
    }
  }
}
"#;

impl ShopifyClient {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        })
    }

    fn admin_url(shop: &str, path: &str) -> String {
        format!("https://{shop}/admin/api/{API_VERSION}/{path}")
    }

    async fn handle<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Error::Remote {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            })
        }
    }

    /// POSTs to the GraphQL admin endpoint and unwraps the `data` object.
    /// Top-level GraphQL errors are treated as remote failures.
    async fn graphql(&self, shop: &str, token: &str, query: &str, variables: Value) -> Result<Value> {
        let resp = self
            .client
            .post(Self::admin_url(shop, "graphql.json"))
            .header(ACCESS_TOKEN_HEADER, token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let mut body: Value = Self::handle(resp).await?;

        if let Some(errors) = body.get("errors").filter(|e| !e.is_null()) {
            return Err(Error::Remote {
                status: 200,
                body: errors.to_string(),
            });
        }

        match body.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(Error::Remote {
                status: 200,
                body: "GraphQL response has no data".to_string(),
            }),
        }
    }
}

#[async_trait]
impl PlatformApi for ShopifyClient {
    async fn exchange_code(&self, shop: &str, code: &str) -> Result<AccessTokenGrant> {
        let resp = self
            .client
            .post(format!("https://{shop}/admin/oauth/access_token"))
            .json(&json!({
                "client_id": self.api_key,
                "client_secret": self.api_secret,
                "code": code,
            }))
            .send()
            .await?;

        Self::handle(resp).await
    }

    async fn list_themes(&self, shop: &str, token: &str) -> Result<Vec<Theme>> {
        let resp = self
            .client
            .get(Self::admin_url(shop, "themes.json"))
            .header(ACCESS_TOKEN_HEADER, token)
            .send()
            .await?;

        let envelope: ThemesEnvelope = Self::handle(resp).await?;
        Ok(envelope.themes)
    }

    async fn get_asset(
        &self,
        shop: &str,
        token: &str,
        theme_id: i64,
        key: &str,
    ) -> Result<String> {
        let resp = self
            .client
            .get(Self::admin_url(shop, &format!("themes/{theme_id}/assets.json")))
            .header(ACCESS_TOKEN_HEADER, token)
            .query(&[("asset[key]", key)])
            .send()
            .await?;

        let envelope: AssetEnvelope = Self::handle(resp).await?;
        Ok(envelope.asset.value)
    }

    async fn list_script_tags(&self, shop: &str, token: &str) -> Result<Vec<ScriptTag>> {
        let resp = self
            .client
            .get(Self::admin_url(shop, "script_tags.json"))
            .header(ACCESS_TOKEN_HEADER, token)
            .send()
            .await?;

        let envelope: ScriptTagsEnvelope = Self::handle(resp).await?;
        Ok(envelope.script_tags)
    }

    async fn create_script_tag(
        &self,
        shop: &str,
        token: &str,
        src: &str,
        event: &str,
    ) -> Result<ScriptTag> {
        let resp = self
            .client
            .post(Self::admin_url(shop, "script_tags.json"))
            .header(ACCESS_TOKEN_HEADER, token)
            .json(&json!({ "script_tag": { "event": event, "src": src } }))
            .send()
            .await?;

        let envelope: ScriptTagEnvelope = Self::handle(resp).await?;
        Ok(envelope.script_tag)
    }

    async fn delete_script_tag(&self, shop: &str, token: &str, id: i64) -> Result<()> {
        let resp = self
            .client
            .delete(Self::admin_url(shop, &format!("script_tags/{id}.json")))
            .header(ACCESS_TOKEN_HEADER, token)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Remote {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            })
        }
    }

    async fn create_page(
        &self,
        shop: &str,
        token: &str,
        title: &str,
        handle: &str,
    ) -> Result<PageCreateResult> {
        let variables = json!({
            "page": {
                "title": title,
                "handle": handle,
                "body": "",
                "isPublished": true,
                "templateSuffix": "custom",
            }
        });

        let data = self
            .graphql(shop, token, PAGE_CREATE_MUTATION, variables)
            .await?;

        let result = data.get("pageCreate").cloned().ok_or_else(|| Error::Remote {
            status: 200,
            body: "GraphQL response has no pageCreate".to_string(),
        })?;

        serde_json::from_value(result).map_err(|e| Error::Remote {
            status: 200,
            body: format!("unexpected pageCreate shape: {e}"),
        })
    }

    async fn list_products(&self, shop: &str, token: &str) -> Result<Vec<Product>> {
        let data = self
            .graphql(shop, token, PRODUCTS_QUERY, Value::Null)
            .await?;

        let products = data.get("products").cloned().ok_or_else(|| Error::Remote {
            status: 200,
            body: "GraphQL response has no products".to_string(),
        })?;

        let nodes: Edges<ProductNode> =
            serde_json::from_value(products).map_err(|e| Error::Remote {
                status: 200,
                body: format!("unexpected products shape: {e}"),
            })?;

        Ok(nodes
            .edges
            .into_iter()
            .map(|edge| {
                let node = edge.node;
                Product {
                    id: node.id,
                    title: node.title,
                    handle: node.handle,
                    description: node.description,
                    product_type: node.product_type,
                    vendor: node.vendor,
                    tags: node.tags,
                    status: node.status,
                    created_at: node.created_at,
                    updated_at: node.updated_at,
                    image: node.images.edges.into_iter().next().map(|e| e.node),
                    variant: node.variants.edges.into_iter().next().map(|e| e.node),
                }
            })
            .collect())
    }
}
