use chrono::Duration;
use serde::{Deserialize, Serialize};

/// One variant's stock level - the unit both the catalog snapshot and the
/// notification lists are made of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStock {
    pub product_title: String,
    pub variant_title: String,
    pub variant_id: String,
    pub inventory: i64,
}

/// Tuning knobs for the alert state machine
///
/// Passed in explicitly wherever they're needed - core logic never reads
/// the environment.
#[derive(Debug, Clone)]
pub struct AlertSettings {
    /// Quantities at or below this are considered low stock
    pub inventory_threshold: i64,
    /// How long after an alert before a follow-up is due if the condition
    /// persists
    pub reminder_after: Duration,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            inventory_threshold: 2,
            reminder_after: Duration::days(7),
        }
    }
}

/// What a single invocation cycle did, reported back to the trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Variants seen in the catalog snapshot (0 for reminder-only runs)
    pub snapshot_variants: usize,
    /// Alerts newly raised this cycle
    pub new_alerts: usize,
    /// Reminders that came due and were dispatched
    pub reminders_due: usize,
    /// Variants still tracked as low stock after the cycle
    pub tracked_variants: usize,
}
