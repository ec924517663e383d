//! `cashbook-app`
//!
//! **Responsibility:** the ledger controller a UI drives.
//!
//! This crate provides:
//! - `LedgerController`: entry add/edit/delete with an explicit compose/export
//!   state machine
//! - the `ExportAdapter` port for rendering the current view to an image
//! - configuration and file-backed bootstrap

pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod state;

pub use bootstrap::{Cashbook, open_file_controller};
pub use config::CashbookConfig;
pub use controller::LedgerController;
pub use error::LedgerError;
pub use export::{ExportAdapter, ExportError, Notice, export_file_base};
pub use state::{ComposeSession, ControllerState, DeleteToken};
