use thiserror::Error;

/// All the ways things can go wrong in StockWatch
///
/// We use thiserror here because it generates the boilerplate for us.
/// Only `Fetch` is allowed to fail a check cycle; delivery problems are
/// logged and swallowed by the orchestrator, and the ledger store never
/// surfaces errors at all.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog fetch failed: {0}")]
    Fetch(String),

    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
