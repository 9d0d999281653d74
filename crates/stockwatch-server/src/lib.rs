// HTTP trigger surface - webhook and scheduler endpoints in front of the
// orchestrator
pub mod api;
pub mod auth;
pub mod server;

pub use api::AppState;
pub use auth::TriggerAuth;
pub use server::{build_router, start_server};
