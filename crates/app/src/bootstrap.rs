//! Wiring of a file-backed controller.

use std::sync::Arc;

use anyhow::Context;

use cashbook_infra::{FileKeyValueStore, KvEntryStore, ReferenceData, ReferenceStore};

use crate::config::CashbookConfig;
use crate::controller::LedgerController;
use crate::export::ExportAdapter;

/// A ready-to-use ledger: the controller plus the reference data it displays.
pub struct Cashbook<X> {
    pub controller: LedgerController<X>,
    pub reference: ReferenceData,
}

/// Open the ledger stored under `config.data_dir`.
///
/// Fails only when the data directory cannot be created. Missing or corrupt
/// records load as empty collections or defaults.
pub fn open_file_controller<X: ExportAdapter>(
    config: &CashbookConfig,
    exporter: X,
) -> anyhow::Result<Cashbook<X>> {
    let kv = FileKeyValueStore::open(&config.data_dir).with_context(|| {
        format!("failed to open data directory at {:?}", config.data_dir)
    })?;
    let kv = Arc::new(kv);

    let reference = ReferenceStore::new(kv.clone(), config.keys.clone()).load();
    let entries = KvEntryStore::new(kv, config.keys.entries.clone());
    let controller =
        LedgerController::new(entries, exporter).with_export_prefix(config.export_prefix.clone());

    tracing::info!(
        data_dir = %config.data_dir.display(),
        entries = controller.len(),
        categories = reference.categories.len(),
        "cashbook opened"
    );

    Ok(Cashbook {
        controller,
        reference,
    })
}
