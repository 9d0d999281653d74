use chrono::{DateTime, Utc};
use stockwatch_store::{AlertRecord, Ledger};

use crate::models::{AlertSettings, VariantStock};

/// Compare a catalog snapshot against the ledger and apply the state
/// transitions, returning the variants that need an immediate alert
///
/// Three outcomes per snapshot row:
/// - newly low (or low again after a partial restock): raise an alert,
///   record it, and schedule a reminder
/// - still low at the same or a lower quantity: nothing, the alert
///   already went out
/// - back above the threshold: clear the alert and its reminder
///
/// The ledger is mutated in place; nothing here talks to the notifier, so
/// the decision logic stays testable on its own.
pub fn evaluate_snapshot(
    ledger: &mut Ledger,
    snapshot: &[VariantStock],
    settings: &AlertSettings,
    now: DateTime<Utc>,
) -> Vec<VariantStock> {
    let mut newly_low = Vec::new();

    for stock in snapshot {
        if stock.inventory <= settings.inventory_threshold {
            // Re-alert only when the recorded quantity is strictly below
            // the current one: the stock climbed since the last alert and
            // is still under the threshold. Flat or falling quantities
            // stay quiet. Intentional, if surprising - a full recovery
            // above the threshold is what resets tracking.
            let should_alert = match ledger.alerted_items.get(&stock.variant_id) {
                None => true,
                Some(record) => record.inventory < stock.inventory,
            };

            if should_alert {
                newly_low.push(stock.clone());
                ledger.alerted_items.insert(
                    stock.variant_id.clone(),
                    AlertRecord {
                        last_alert: now,
                        inventory: stock.inventory,
                        product_title: Some(stock.product_title.clone()),
                        variant_title: Some(stock.variant_title.clone()),
                    },
                );
                ledger
                    .pending_reminders
                    .insert(stock.variant_id.clone(), now + settings.reminder_after);
            }
        } else if ledger.alerted_items.contains_key(&stock.variant_id) {
            // Replenished above the threshold: stop tracking entirely
            ledger.clear_variant(&stock.variant_id);
        }
    }

    newly_low
}
