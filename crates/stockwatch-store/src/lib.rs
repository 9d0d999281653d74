// Persisted alert state - one JSON blob, loaded whole and written whole
pub mod ledger;
pub mod store;

pub use ledger::{AlertRecord, Ledger};
pub use store::{FsLedgerStore, LedgerStore};
