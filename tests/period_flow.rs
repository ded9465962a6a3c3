use chrono::NaiveDate;
use period_core::domain::{BudgetCategory, CategoryKind, PeriodConfiguration, Transaction};
use period_core::engine::{ConfigurationImpactAnalyzer, MigrationResult, PeriodEngine};
use period_core::storage::{FamilyStore, JsonStorage};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn engine_in(temp: &tempfile::TempDir) -> PeriodEngine {
    let store = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
    PeriodEngine::new(Box::new(store))
}

#[test]
fn resolve_and_list_through_the_facade() {
    let temp = tempdir().unwrap();
    let engine = engine_in(&temp);
    engine
        .create_family("smith", PeriodConfiguration::monthly(1, "USD"))
        .unwrap();

    let window = engine
        .resolve_period("smith", Some(date(2024, 3, 15)))
        .unwrap();
    assert_eq!(window.start, date(2024, 3, 1));
    assert_eq!(window.end, date(2024, 3, 31));
    assert_eq!(window.label, "March 2024");

    // First access materializes the touched window.
    engine
        .ensure_recurring_data("smith", date(2024, 3, 1))
        .unwrap();

    let summaries = engine.list_available_periods("smith").unwrap();
    assert!(summaries
        .iter()
        .any(|s| s.start == date(2024, 3, 1) && !s.has_data));
    assert_eq!(summaries.iter().filter(|s| s.is_current).count(), 1);
    for pair in summaries.windows(2) {
        assert!(pair[0].start > pair[1].start, "not most-recent-first");
    }
}

#[test]
fn config_change_end_to_end_is_idempotent() {
    let temp = tempdir().unwrap();
    let engine = engine_in(&temp);
    engine
        .create_family("smith", PeriodConfiguration::monthly(1, "USD"))
        .unwrap();

    // Seed the open window with a category and transactions.
    let store = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
    let mut family = store.load("smith").unwrap().family;
    let groceries = family.add_category(
        BudgetCategory::new("Groceries", CategoryKind::Expense, date(2024, 3, 1), 400.0)
            .recurring(),
    );
    family.add_transaction(Transaction::new(groceries, date(2024, 3, 20), 55.0));
    family.add_transaction(Transaction::new(groceries, date(2024, 4, 20), 75.0));
    store.save(&family, "smith").unwrap();

    let new_config = PeriodConfiguration::monthly(15, "USD");
    let impact =
        ConfigurationImpactAnalyzer::analyze(&family, &new_config, date(2024, 3, 10)).unwrap();
    assert!(impact.requires_close);
    assert!(impact.adjustment_period.is_none());
    assert_eq!(impact.new_current_period.start, date(2024, 3, 15));

    let result = engine
        .apply_config_change("smith", &new_config, &impact)
        .unwrap();
    assert_eq!(result.periods_created, 2);
    assert_eq!(result.categories_copied, 1);
    assert_eq!(result.future_transactions_reanchored, 1);

    let migrated = store.load("smith").unwrap().family;
    assert_eq!(migrated.configuration, new_config);
    assert_eq!(
        migrated.period_at(date(2024, 3, 1)).unwrap().end_date,
        date(2024, 3, 14)
    );
    assert_eq!(
        migrated.period_at(date(2024, 3, 15)).unwrap().end_date,
        date(2024, 4, 14)
    );

    // Re-applying the accepted impact never duplicates anything.
    let rerun = engine
        .apply_config_change("smith", &new_config, &impact)
        .unwrap();
    assert_eq!(rerun, MigrationResult::default());
    let settled = store.load("smith").unwrap().family;
    assert_eq!(settled.periods.len(), migrated.periods.len());
    assert_eq!(settled.categories.len(), migrated.categories.len());
}

#[test]
fn recurring_replication_survives_persistence() {
    let temp = tempdir().unwrap();
    let engine = engine_in(&temp);
    engine
        .create_family("smith", PeriodConfiguration::monthly(1, "USD"))
        .unwrap();

    let store = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
    let mut family = store.load("smith").unwrap().family;
    let rent = family.add_category(
        BudgetCategory::new("Rent", CategoryKind::Expense, date(2024, 1, 1), 1500.0)
            .recurring(),
    );
    family.add_transaction(Transaction::new(rent, date(2024, 1, 31), 1500.0).fixed());
    store.save(&family, "smith").unwrap();

    let result = engine
        .ensure_recurring_data("smith", date(2024, 4, 1))
        .unwrap();
    assert_eq!(result.groups_created, 1);
    assert_eq!(result.transactions_created, 1);

    let rerun = engine
        .ensure_recurring_data("smith", date(2024, 4, 1))
        .unwrap();
    assert_eq!(rerun.groups_created, 0);
    assert_eq!(rerun.already_existed, 1);

    let reloaded = store.load("smith").unwrap().family;
    let copy = reloaded
        .categories
        .iter()
        .find(|c| c.period_start_date == date(2024, 4, 1))
        .expect("replicated category");
    assert_eq!(copy.name, "Rent");
    let txn = reloaded
        .transactions
        .iter()
        .find(|t| t.category_id == copy.id)
        .expect("replicated transaction");
    // The 31st clamps into the 30-day month and arrives unrealized.
    assert_eq!(txn.date, date(2024, 4, 30));
    assert!(!txn.realized);
}
