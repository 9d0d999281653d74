use chrono::Utc;
use stockwatch_store::LedgerStore;
use tracing::{info, warn};

use crate::{
    catalog::CatalogSource,
    evaluator::evaluate_snapshot,
    models::{AlertSettings, CycleSummary},
    notify::Notifier,
    reminders::collect_due_reminders,
    Result,
};

const ALERT_SUBJECT: &str = "Low Inventory Alert";
const REMINDER_SUBJECT: &str = "Low Inventory Reminder";

/// Composes ledger, catalog, evaluator, scheduler, and notifier into one
/// invocation cycle
///
/// Error policy in one place: a failed catalog fetch aborts the cycle with
/// nothing persisted; a failed notification is logged and the cycle
/// carries on, ledger included - alert tracking must not re-fire every
/// cycle just because the email provider hiccuped.
pub struct Orchestrator {
    catalog: Box<dyn CatalogSource>,
    notifier: Box<dyn Notifier>,
    store: Box<dyn LedgerStore>,
    settings: AlertSettings,
}

impl Orchestrator {
    pub fn new(
        catalog: Box<dyn CatalogSource>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn LedgerStore>,
        settings: AlertSettings,
    ) -> Self {
        Self {
            catalog,
            notifier,
            store,
            settings,
        }
    }

    /// Full inventory check: snapshot the catalog, raise/clear alerts,
    /// dispatch whatever reminders came due, persist the ledger
    pub async fn run_inventory_check(&self) -> Result<CycleSummary> {
        let mut ledger = self.store.load().await;

        // The one fatal step. Ledger stays unsaved on purpose: this cycle
        // decided nothing.
        let snapshot = self.catalog.fetch().await?;
        let now = Utc::now();

        let new_items = evaluate_snapshot(&mut ledger, &snapshot, &self.settings, now);
        info!(
            snapshot_variants = snapshot.len(),
            new_alerts = new_items.len(),
            "evaluated catalog snapshot"
        );

        if !new_items.is_empty() {
            if let Err(e) = self.notifier.notify(ALERT_SUBJECT, &new_items).await {
                warn!(error = %e, "failed to send low inventory alert");
            }
        }

        let due_items = collect_due_reminders(&mut ledger, now);
        if !due_items.is_empty() {
            if let Err(e) = self.notifier.notify(REMINDER_SUBJECT, &due_items).await {
                warn!(error = %e, "failed to send low inventory reminder");
            }
        }

        self.store.save(&ledger).await;

        Ok(CycleSummary {
            snapshot_variants: snapshot.len(),
            new_alerts: new_items.len(),
            reminders_due: due_items.len(),
            tracked_variants: ledger.alerted_items.len(),
        })
    }

    /// Reminder-only check: no catalog fetch, just dispatch due reminders
    /// and persist the consumed entries
    pub async fn run_reminder_check(&self) -> Result<CycleSummary> {
        let mut ledger = self.store.load().await;
        let now = Utc::now();

        let due_items = collect_due_reminders(&mut ledger, now);
        info!(reminders_due = due_items.len(), "checked pending reminders");

        if !due_items.is_empty() {
            if let Err(e) = self.notifier.notify(REMINDER_SUBJECT, &due_items).await {
                warn!(error = %e, "failed to send low inventory reminder");
            }
        }

        self.store.save(&ledger).await;

        Ok(CycleSummary {
            snapshot_variants: 0,
            new_alerts: 0,
            reminders_due: due_items.len(),
            tracked_variants: ledger.alerted_items.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalogSource;
    use crate::models::VariantStock;
    use crate::notify::MockNotifier;
    use crate::Error;
    use async_trait::async_trait;
    use chrono::Duration;
    use stockwatch_store::{AlertRecord, Ledger};

    mockall::mock! {
        Store {}

        #[async_trait]
        impl LedgerStore for Store {
            async fn load(&self) -> Ledger;
            async fn save(&self, ledger: &Ledger);
        }
    }

    fn low_stock() -> VariantStock {
        VariantStock {
            product_title: "Widget".to_string(),
            variant_title: "Blue".to_string(),
            variant_id: "100".to_string(),
            inventory: 1,
        }
    }

    fn ledger_with_due_reminder() -> Ledger {
        let mut ledger = Ledger::default();
        let past = Utc::now() - Duration::days(8);
        ledger.alerted_items.insert(
            "100".to_string(),
            AlertRecord {
                last_alert: past,
                inventory: 1,
                product_title: Some("Widget".to_string()),
                variant_title: Some("Blue".to_string()),
            },
        );
        ledger
            .pending_reminders
            .insert("100".to_string(), past + Duration::days(7));
        ledger
    }

    fn orchestrator(
        catalog: MockCatalogSource,
        notifier: MockNotifier,
        store: MockStore,
    ) -> Orchestrator {
        Orchestrator::new(
            Box::new(catalog),
            Box::new(notifier),
            Box::new(store),
            AlertSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_new_alert_notifies_and_saves() {
        let mut catalog = MockCatalogSource::new();
        catalog.expect_fetch().times(1).returning(|| Ok(vec![low_stock()]));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|subject, items| subject == "Low Inventory Alert" && items.len() == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut store = MockStore::new();
        store.expect_load().times(1).returning(Ledger::default);
        store
            .expect_save()
            .withf(|ledger| {
                ledger.alerted_items.contains_key("100")
                    && ledger.pending_reminders.contains_key("100")
            })
            .times(1)
            .returning(|_| ());

        let summary = orchestrator(catalog, notifier, store)
            .run_inventory_check()
            .await
            .unwrap();

        assert_eq!(summary.new_alerts, 1);
        assert_eq!(summary.reminders_due, 0);
        assert_eq!(summary.tracked_variants, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_without_saving() {
        let mut catalog = MockCatalogSource::new();
        catalog
            .expect_fetch()
            .times(1)
            .returning(|| Err(Error::Fetch("store unreachable".to_string())));

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);

        let mut store = MockStore::new();
        store.expect_load().times(1).returning(Ledger::default);
        store.expect_save().times(0);

        let result = orchestrator(catalog, notifier, store)
            .run_inventory_check()
            .await;

        assert!(matches!(result, Err(Error::Fetch(_))));
    }

    #[tokio::test]
    async fn test_notify_failure_still_saves_ledger() {
        let mut catalog = MockCatalogSource::new();
        catalog.expect_fetch().times(1).returning(|| Ok(vec![low_stock()]));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _| Err(Error::Delivery("mail API down".to_string())));

        let mut store = MockStore::new();
        store.expect_load().times(1).returning(Ledger::default);
        store
            .expect_save()
            .withf(|ledger| ledger.alerted_items.contains_key("100"))
            .times(1)
            .returning(|_| ());

        // The cycle still reports success
        let summary = orchestrator(catalog, notifier, store)
            .run_inventory_check()
            .await
            .unwrap();
        assert_eq!(summary.new_alerts, 1);
    }

    #[tokio::test]
    async fn test_quiet_snapshot_sends_nothing_but_still_saves() {
        let mut catalog = MockCatalogSource::new();
        catalog.expect_fetch().times(1).returning(|| {
            Ok(vec![VariantStock {
                product_title: "Widget".to_string(),
                variant_title: "Blue".to_string(),
                variant_id: "100".to_string(),
                inventory: 40,
            }])
        });

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);

        let mut store = MockStore::new();
        store.expect_load().times(1).returning(Ledger::default);
        store.expect_save().times(1).returning(|_| ());

        let summary = orchestrator(catalog, notifier, store)
            .run_inventory_check()
            .await
            .unwrap();

        assert_eq!(summary.new_alerts, 0);
        assert_eq!(summary.tracked_variants, 0);
    }

    #[tokio::test]
    async fn test_inventory_check_dispatches_due_reminders_same_cycle() {
        // Variant is quiet in the snapshot (still low, not increased) but
        // its reminder has come due.
        let mut catalog = MockCatalogSource::new();
        catalog.expect_fetch().times(1).returning(|| Ok(vec![low_stock()]));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|subject, _| subject == "Low Inventory Reminder")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut store = MockStore::new();
        store
            .expect_load()
            .times(1)
            .returning(ledger_with_due_reminder);
        store
            .expect_save()
            .withf(|ledger| ledger.pending_reminders.is_empty())
            .times(1)
            .returning(|_| ());

        let summary = orchestrator(catalog, notifier, store)
            .run_inventory_check()
            .await
            .unwrap();

        assert_eq!(summary.new_alerts, 0);
        assert_eq!(summary.reminders_due, 1);
    }

    #[tokio::test]
    async fn test_reminder_check_never_touches_catalog() {
        let mut catalog = MockCatalogSource::new();
        catalog.expect_fetch().times(0);

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|subject, items| subject == "Low Inventory Reminder" && items.len() == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut store = MockStore::new();
        store
            .expect_load()
            .times(1)
            .returning(ledger_with_due_reminder);
        store
            .expect_save()
            .withf(|ledger| {
                ledger.pending_reminders.is_empty() && ledger.alerted_items.contains_key("100")
            })
            .times(1)
            .returning(|_| ());

        let summary = orchestrator(catalog, notifier, store)
            .run_reminder_check()
            .await
            .unwrap();

        assert_eq!(summary.snapshot_variants, 0);
        assert_eq!(summary.reminders_due, 1);
        assert_eq!(summary.tracked_variants, 1);
    }

    #[tokio::test]
    async fn test_reminder_check_with_nothing_due_saves_quietly() {
        let mut catalog = MockCatalogSource::new();
        catalog.expect_fetch().times(0);

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);

        let mut store = MockStore::new();
        store.expect_load().times(1).returning(Ledger::default);
        store.expect_save().times(1).returning(|_| ());

        let summary = orchestrator(catalog, notifier, store)
            .run_reminder_check()
            .await
            .unwrap();

        assert_eq!(summary.reminders_due, 0);
    }
}
