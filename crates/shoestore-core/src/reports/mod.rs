//! Report documents and the renderer port

pub mod document;
pub mod text;

pub use document::{ReportDocument, ReportTable};
pub use text::TextRenderer;

use crate::domain::ReportFormat;
use crate::error::DomainError;

/// Turns a report document into file bytes for one output format.
pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, DomainError>;
}
