use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SHOPIFY_API_VERSION: &str = "2023-10";

#[derive(Error, Debug)]
pub enum ShopifyError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication failed")]
    AuthFailed,

    #[error("Store not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShopifyError>;

/// Client for the Shopify Admin REST API
///
/// Authenticates with a private-app access token sent in the
/// `X-Shopify-Access-Token` header on every request.
pub struct ShopifyClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl ShopifyClient {
    /// `store` is the shop handle, i.e. the `my-store` in `my-store.myshopify.com`
    pub fn new(store: &str, access_token: String) -> Self {
        Self::with_api_version(store, access_token, SHOPIFY_API_VERSION)
    }

    /// For pinning a different Admin API version
    pub fn with_api_version(store: &str, access_token: String, api_version: &str) -> Self {
        Self::with_base_url(
            access_token,
            format!(
                "https://{}.myshopify.com/admin/api/{}",
                store, api_version
            ),
        )
    }

    /// For testing against a local mock server
    pub fn with_base_url(access_token: String, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("StockWatch/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            access_token,
            base_url,
        }
    }

    /// List products in the catalog, variants included
    ///
    /// `limit` is capped at 250 by Shopify. No retry here: a failed fetch
    /// aborts the whole check cycle and the caller logs it.
    pub async fn list_products(&self, limit: u32) -> Result<Vec<Product>> {
        let url = format!("{}/products.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("X-Shopify-Access-Token", &self.access_token)
            .query(&[("limit", limit.min(250).to_string())])
            .send()
            .await?;

        if response.status() == 401 || response.status() == 403 {
            return Err(ShopifyError::AuthFailed);
        }

        if response.status() == 404 {
            return Err(ShopifyError::NotFound(self.base_url.clone()));
        }

        if response.status() == 429 {
            return Err(ShopifyError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let parsed: ProductsResponse = response.json().await?;
        Ok(parsed.products)
    }
}

/// Envelope around the products listing
#[derive(Debug, Deserialize)]
struct ProductsResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Shopify omits this for variants without inventory tracking
    #[serde(default)]
    pub inventory_quantity: i64,
}
