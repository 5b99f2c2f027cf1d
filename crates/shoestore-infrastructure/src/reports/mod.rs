//! Binary report renderers. The text layout lives in core.

mod pdf;
mod xlsx;

pub use pdf::PdfRenderer;
pub use xlsx::XlsxRenderer;

use shoestore_core::error::DomainError;

pub(crate) fn render_error(format: &str, e: impl std::fmt::Display) -> DomainError {
    tracing::error!("Failed to render {} report: {}", format, e);
    DomainError::RenderError(format!("{} rendering failed: {}", format, e))
}
