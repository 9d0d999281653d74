use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::ledger::Ledger;

/// Internal failure modes of the filesystem store. These never cross the
/// trait boundary - see `LedgerStore`.
#[derive(Error, Debug)]
enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where alert state lives between invocations
///
/// Both operations are deliberately infallible: state bookkeeping must
/// never fail the webhook that triggered a check. `load` falls back to an
/// empty ledger and `save` drops this invocation's updates, with a log
/// line either way.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Ledger;
    async fn save(&self, ledger: &Ledger);
}

/// Ledger persistence as a single JSON file on disk
pub struct FsLedgerStore {
    path: PathBuf,
}

impl FsLedgerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the platform data dir
    /// Uses XDG on Linux/macOS, AppData on Windows
    pub fn default_path() -> Option<PathBuf> {
        Some(
            dirs::data_dir()?
                .join("stockwatch")
                .join("inventory_alerts.json"),
        )
    }

    async fn try_load(&self) -> Result<Ledger, StoreError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let ledger: Ledger = serde_json::from_str(&contents)?;
        Ok(ledger)
    }

    async fn try_save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(ledger)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for FsLedgerStore {
    async fn load(&self) -> Ledger {
        let mut ledger = match self.try_load().await {
            Ok(ledger) => ledger,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no ledger file yet, starting empty");
                Ledger::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to load ledger, starting empty");
                Ledger::default()
            }
        };

        let dropped = ledger.prune_orphaned_reminders();
        if dropped > 0 {
            warn!(dropped, "dropped orphaned reminders from loaded ledger");
        }

        ledger
    }

    async fn save(&self, ledger: &Ledger) {
        if let Err(e) = self.try_save(ledger).await {
            warn!(path = %self.path.display(), error = %e, "failed to save ledger, this cycle's state is lost");
        }
    }
}
