use chrono::{DateTime, Utc};
use stockwatch_store::Ledger;

use crate::models::VariantStock;

/// Pull the reminders that have come due, removing them from the ledger
///
/// A reminder fires at most once: every due entry is dropped here whether
/// or not the notification that follows succeeds. Entries whose variant is
/// no longer tracked produce nothing (the alert was cleared or the blob
/// was edited externally) but are still consumed.
pub fn collect_due_reminders(ledger: &mut Ledger, now: DateTime<Utc>) -> Vec<VariantStock> {
    // Collect ids first; entries are removed while we walk them
    let due_ids: Vec<String> = ledger
        .pending_reminders
        .iter()
        .filter(|(_, due_at)| now >= **due_at)
        .map(|(variant_id, _)| variant_id.clone())
        .collect();

    let mut due_items = Vec::new();
    for variant_id in due_ids {
        ledger.pending_reminders.remove(&variant_id);

        if let Some(record) = ledger.alerted_items.get(&variant_id) {
            due_items.push(VariantStock {
                product_title: record
                    .product_title
                    .clone()
                    .unwrap_or_else(|| format!("variant {}", variant_id)),
                variant_title: record.variant_title.clone().unwrap_or_default(),
                variant_id: variant_id.clone(),
                inventory: record.inventory,
            });
        }
    }

    due_items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use stockwatch_store::AlertRecord;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn tracked(ledger: &mut Ledger, variant_id: &str, due_at: DateTime<Utc>) {
        ledger.alerted_items.insert(
            variant_id.to_string(),
            AlertRecord {
                last_alert: due_at - Duration::days(1),
                inventory: 1,
                product_title: Some("Widget".to_string()),
                variant_title: Some("Blue".to_string()),
            },
        );
        ledger
            .pending_reminders
            .insert(variant_id.to_string(), due_at);
    }

    #[test]
    fn test_not_yet_due_entries_stay_put() {
        let mut ledger = Ledger::default();
        tracked(&mut ledger, "100", now() + Duration::hours(1));

        let due = collect_due_reminders(&mut ledger, now());

        assert!(due.is_empty());
        assert!(ledger.pending_reminders.contains_key("100"));
    }

    #[test]
    fn test_due_entry_fires_once_and_is_removed() {
        let mut ledger = Ledger::default();
        tracked(&mut ledger, "100", now() - Duration::seconds(1));

        let due = collect_due_reminders(&mut ledger, now());

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].variant_id, "100");
        assert_eq!(due[0].product_title, "Widget");
        assert_eq!(due[0].inventory, 1);
        assert!(ledger.pending_reminders.is_empty());
        // The alert itself stays tracked
        assert!(ledger.alerted_items.contains_key("100"));

        // A second pass finds nothing - the reminder is spent
        let again = collect_due_reminders(&mut ledger, now());
        assert!(again.is_empty());
    }

    #[test]
    fn test_exactly_at_due_time_counts_as_due() {
        let mut ledger = Ledger::default();
        tracked(&mut ledger, "100", now());

        let due = collect_due_reminders(&mut ledger, now());
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn test_day_after_alert_scenario() {
        // The canonical flow: alerted yesterday, checked a second past due
        let alerted_at = now();
        let mut ledger = Ledger::default();
        tracked(&mut ledger, "100", alerted_at + Duration::days(1));

        let check_at = alerted_at + Duration::days(1) + Duration::seconds(1);
        let due = collect_due_reminders(&mut ledger, check_at);

        assert_eq!(due.len(), 1);
        assert!(ledger.pending_reminders.is_empty());
    }

    #[test]
    fn test_untracked_reminder_is_consumed_silently() {
        let mut ledger = Ledger::default();
        ledger
            .pending_reminders
            .insert("999".to_string(), now() - Duration::hours(1));

        let due = collect_due_reminders(&mut ledger, now());

        assert!(due.is_empty());
        assert!(ledger.pending_reminders.is_empty());
    }

    #[test]
    fn test_titles_fall_back_to_variant_id() {
        let mut ledger = Ledger::default();
        ledger.alerted_items.insert(
            "777".to_string(),
            AlertRecord {
                last_alert: now() - Duration::days(7),
                inventory: 0,
                product_title: None,
                variant_title: None,
            },
        );
        ledger
            .pending_reminders
            .insert("777".to_string(), now() - Duration::hours(1));

        let due = collect_due_reminders(&mut ledger, now());

        assert_eq!(due[0].product_title, "variant 777");
        assert_eq!(due[0].variant_title, "");
    }

    #[test]
    fn test_only_due_subset_fires() {
        let mut ledger = Ledger::default();
        tracked(&mut ledger, "early", now() - Duration::hours(2));
        tracked(&mut ledger, "late", now() + Duration::hours(2));

        let due = collect_due_reminders(&mut ledger, now());

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].variant_id, "early");
        assert!(ledger.pending_reminders.contains_key("late"));
    }
}
