// Catalog provider - bridges the Shopify client with the CatalogSource trait
use async_trait::async_trait;
use stockwatch_api::{Product, ShopifyClient};

use crate::{models::VariantStock, Error, Result};

/// Trait for catalog sources - makes testing easier and keeps things flexible
///
/// The orchestrator only ever sees this; swapping the commerce platform
/// means writing another adapter, not touching the state machine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the current stock level of every variant in the catalog
    async fn fetch(&self) -> Result<Vec<VariantStock>>;
}

/// Wrapper around ShopifyClient that implements CatalogSource
pub struct ShopifyCatalog {
    client: ShopifyClient,
}

impl ShopifyCatalog {
    pub fn new(client: ShopifyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for ShopifyCatalog {
    async fn fetch(&self) -> Result<Vec<VariantStock>> {
        let products = self
            .client
            .list_products(250)
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        Ok(flatten_products(products))
    }
}

/// Flatten products into one row per variant
fn flatten_products(products: Vec<Product>) -> Vec<VariantStock> {
    products
        .into_iter()
        .flat_map(|product| {
            let product_title = product.title;
            product
                .variants
                .into_iter()
                .map(move |variant| VariantStock {
                    product_title: product_title.clone(),
                    variant_title: variant.title,
                    variant_id: variant.id.to_string(),
                    inventory: variant.inventory_quantity,
                })
        })
        .collect()
}
