//! End-to-end: a file-backed cashbook driven through add, edit, delete,
//! queries and export, then reopened from disk.

use std::path::PathBuf;

use async_trait::async_trait;
use cashbook_app::{
    CashbookConfig, ControllerState, ExportAdapter, ExportError, LedgerError, Notice,
    open_file_controller,
};
use cashbook_core::CategoryId;
use cashbook_infra::{FileKeyValueStore, KeyValueStore, codec};
use cashbook_ledger::{
    AccountingCategory, AppSettings, CategoryKey, CategoryKind, CurrencyDisplay, EntryDraft,
    EntryFilter, NetBalance, UNCATEGORIZED, category_label,
};
use rust_decimal_macros::dec;

/// Writes the rendered view text into `{dir}/{filename}`.
struct FileExporter {
    dir: PathBuf,
}

#[async_trait]
impl ExportAdapter for FileExporter {
    type Target = str;

    async fn export_as_image(&self, target: &str, filename: &str) -> Result<(), ExportError> {
        if target.is_empty() {
            return Err(ExportError::Render("nothing to render".to_string()));
        }
        std::fs::write(self.dir.join(filename), target.as_bytes())?;
        Ok(())
    }
}

fn seed_reference_data(config: &CashbookConfig) -> Vec<AccountingCategory> {
    let categories = vec![
        AccountingCategory {
            id: CategoryId::new("1700000000001"),
            name: "Sales".to_string(),
            kind: CategoryKind::Income,
        },
        AccountingCategory {
            id: CategoryId::new("1700000000002"),
            name: "Rent".to_string(),
            kind: CategoryKind::Expense,
        },
    ];
    let settings = AppSettings {
        primary: CurrencyDisplay::new("Egyptian Pound", "E£"),
        secondary: CurrencyDisplay::new("US Dollar", "$"),
    };

    let kv = FileKeyValueStore::open(&config.data_dir).unwrap();
    kv.put(
        &config.keys.categories,
        &codec::encode_categories(&categories).unwrap(),
    )
    .unwrap();
    kv.put(
        &config.keys.settings,
        &codec::encode_settings(&settings).unwrap(),
    )
    .unwrap();
    categories
}

#[tokio::test]
async fn cashbook_lifecycle_on_disk() {
    cashbook_observability::init_for_tests();

    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let config = CashbookConfig::default().with_data_dir(data.path());
    let categories = seed_reference_data(&config);
    let exporter = || FileExporter {
        dir: out.path().to_path_buf(),
    };

    let book = open_file_controller(&config, exporter()).unwrap();
    assert_eq!(book.reference.categories, categories);
    assert_eq!(book.reference.settings.primary.symbol, "E£");
    let ledger = &book.controller;

    // Add through the compose flow.
    ledger.start_add().unwrap();
    ledger
        .update_draft(|d| {
            d.date = "2024-01-01".to_string();
            d.statement = "Opening sale".to_string();
            d.category_id = Some(categories[0].id.clone());
            d.received_primary = dec!(100);
        })
        .unwrap();
    let sale = ledger.submit().unwrap().unwrap();

    let rent = ledger
        .add(
            EntryDraft::new("2024-01-15", "January rent")
                .with_category(categories[1].id.clone())
                .with_primary(dec!(0), dec!(40))
                .with_secondary(dec!(0), dec!(2.5)),
        )
        .unwrap();
    let stray = ledger
        .add(
            EntryDraft::new("2024-02-01", "Refund")
                .with_category(CategoryId::new("removed-category"))
                .with_primary(dec!(5), dec!(0)),
        )
        .unwrap();

    // Invalid input is refused and nothing changes.
    assert!(matches!(
        ledger.add(EntryDraft::new("2024-02-30", "bad date")),
        Err(LedgerError::Validation(_))
    ));
    assert_eq!(ledger.len(), 3);

    // Filtering and aggregation.
    let day = EntryFilter::new().from_date("2024-01-01").to_date("2024-01-01");
    let on_day = ledger.filter(&day);
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].id_typed(), sale);
    assert_eq!(ledger.aggregate(&day), NetBalance::new(dec!(100), dec!(0)));

    let rent_search = EntryFilter::new().with_search("RENT");
    assert_eq!(ledger.filter(&rent_search).len(), 1);
    assert_eq!(
        ledger.aggregate(&EntryFilter::new()),
        NetBalance::new(dec!(65), dec!(-2.5))
    );

    // Category labels and grouping treat the removed category as uncategorized.
    let refund = ledger.entry(stray).unwrap();
    assert_eq!(
        category_label(&book.reference.categories, refund.category_id.as_ref()),
        UNCATEGORIZED
    );
    let groups = ledger.balances_by_category(&book.reference.categories);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[2].key, CategoryKey::Uncategorized);
    assert_eq!(groups[2].balance.net_primary, dec!(5));

    // Edit keeps identity.
    assert!(ledger.start_edit(rent).unwrap());
    ledger
        .update_draft(|d| d.paid_primary = dec!(45))
        .unwrap();
    assert_eq!(ledger.submit().unwrap(), Some(rent));
    assert_eq!(ledger.entry(rent).unwrap().paid_primary, dec!(45));

    // Two-phase delete.
    let token = ledger.request_delete(stray).unwrap();
    assert!(ledger.entry(stray).is_some());
    assert!(ledger.confirm_delete(token).unwrap());
    assert_eq!(ledger.len(), 2);

    // Export writes `{base}.png` and reports it.
    let filename = ledger.export_view("ledger table", "cashbook-2024-02-01").await.unwrap();
    assert_eq!(filename, "cashbook-2024-02-01.png");
    assert!(out.path().join(&filename).is_file());
    assert!(matches!(ledger.export_view("", "blank").await, Err(LedgerError::Export(_))));
    assert_eq!(ledger.state(), ControllerState::Idle);
    let notices = ledger.take_notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0], Notice::Exported { filename });

    let expected = ledger.entries();
    drop(book);

    // Everything acknowledged is on disk.
    let reopened = open_file_controller(&config, exporter()).unwrap();
    assert_eq!(reopened.controller.entries(), expected);
    let ids: Vec<_> = expected.iter().map(|e| e.id_typed()).collect();
    assert_eq!(ids, vec![rent, sale]);
}
