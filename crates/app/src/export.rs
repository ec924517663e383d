//! Image export port.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Failure reported by an [`ExportAdapter`].
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("rendering failed: {0}")]
    Render(String),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a view region to a raster image file.
///
/// Implementations may be slow and may fail; the controller never assumes the
/// call completes synchronously.
#[async_trait]
pub trait ExportAdapter: Send + Sync {
    /// Whatever the presentation layer hands over as "the current view".
    type Target: ?Sized + Sync;

    async fn export_as_image(
        &self,
        target: &Self::Target,
        filename: &str,
    ) -> Result<(), ExportError>;
}

/// User-visible outcome of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Exported { filename: String },
    ExportFailed { filename: String, reason: String },
}

/// Base filename embedding the calendar date, e.g. `cashbook-2024-05-01`.
pub fn export_file_base(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}", date.format("%Y-%m-%d"))
}
