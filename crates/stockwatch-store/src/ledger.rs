use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The alert ledger - which variants are currently flagged low-stock and
/// when their next reminder is due
///
/// Keys in both maps are variant ids. Persisted as a single JSON object,
/// so the on-disk field names are part of the storage contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub alerted_items: HashMap<String, AlertRecord>,
    #[serde(default)]
    pub pending_reminders: HashMap<String, DateTime<Utc>>,
}

/// State recorded when a variant was last alerted on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub last_alert: DateTime<Utc>,
    /// Quantity at the time of the alert. Compared against the next
    /// snapshot to decide whether to re-alert.
    pub inventory: i64,
    /// Display titles denormalized at alert time, so a reminder can name
    /// the item without a second catalog fetch. Older ledgers predate
    /// these fields, hence optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_title: Option<String>,
}

impl Ledger {
    /// Drop reminders that have no matching alerted entry
    ///
    /// A reminder only makes sense for a tracked alert. The persisted blob
    /// can be edited out from under us, so tolerate orphans on read rather
    /// than choking on them. Returns how many were dropped.
    pub fn prune_orphaned_reminders(&mut self) -> usize {
        let before = self.pending_reminders.len();
        let alerted = &self.alerted_items;
        self.pending_reminders
            .retain(|variant_id, _| alerted.contains_key(variant_id));
        before - self.pending_reminders.len()
    }

    /// Stop tracking a variant entirely
    pub fn clear_variant(&mut self, variant_id: &str) {
        self.alerted_items.remove(variant_id);
        self.pending_reminders.remove(variant_id);
    }

    pub fn is_empty(&self) -> bool {
        self.alerted_items.is_empty() && self.pending_reminders.is_empty()
    }
}
