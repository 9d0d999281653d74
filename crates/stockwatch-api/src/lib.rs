// API client implementations for the external services we talk to
pub mod sendgrid;
pub mod shopify;

// Re-export common types
pub use sendgrid::{SendGridClient, SendGridError};
pub use shopify::{Product, ProductVariant, ShopifyClient, ShopifyError};
