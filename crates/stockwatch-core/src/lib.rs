// Core business logic lives here - the alert state machine and the cycle
// that drives it
pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod notify;
pub mod orchestrator;
pub mod reminders;

pub use catalog::{CatalogSource, ShopifyCatalog};
pub use config::Config;
pub use error::Error;
pub use evaluator::evaluate_snapshot;
pub use models::{AlertSettings, CycleSummary, VariantStock};
pub use notify::{EmailNotifier, Notifier};
pub use orchestrator::Orchestrator;
pub use reminders::collect_due_reminders;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
