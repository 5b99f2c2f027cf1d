//! Plain-text report layout

use super::{ReportDocument, ReportRenderer};
use crate::domain::ReportFormat;
use crate::error::DomainError;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn compose(title: &str, content: &str) -> String {
        format!("=== {} ===\n\n{}\n\n--- End of Report ---", title, content)
    }
}

impl ReportRenderer for TextRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, DomainError> {
        let content = document.body_lines().join("\n");
        Ok(Self::compose(&document.title, &content).into_bytes())
    }
}
