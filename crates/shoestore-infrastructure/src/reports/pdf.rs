use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use shoestore_core::domain::ReportFormat;
use shoestore_core::error::DomainError;
use shoestore_core::reports::{ReportDocument, ReportRenderer};

use super::render_error;

// A4 in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const TITLE_SIZE: i64 = 16;
const BODY_SIZE: i64 = 11;
const LINE_HEIGHT: i64 = 14;
const LINES_PER_PAGE: usize = 50;

/// Single-column PDF: the title in bold, then the report lines, paginated.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfRenderer;

impl PdfRenderer {
    fn page_content(title: Option<&str>, lines: &[String]) -> Content {
        let mut operations = vec![Operation::new("BT", vec![])];
        let top = PAGE_HEIGHT - MARGIN;

        if let Some(title) = title {
            operations.push(Operation::new("Tf", vec!["F2".into(), TITLE_SIZE.into()]));
            operations.push(Operation::new("Td", vec![MARGIN.into(), top.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(title)]));
            operations.push(Operation::new("Td", vec![0.into(), (-2 * LINE_HEIGHT).into()]));
        } else {
            operations.push(Operation::new("Td", vec![MARGIN.into(), top.into()]));
        }

        operations.push(Operation::new("Tf", vec!["F1".into(), BODY_SIZE.into()]));
        operations.push(Operation::new("TL", vec![LINE_HEIGHT.into()]));
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
            operations.push(Operation::new("T*", vec![]));
        }

        operations.push(Operation::new("ET", vec![]));
        Content { operations }
    }

    fn build(document: &ReportDocument) -> Result<Vec<u8>, DomainError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let lines = document.body_lines();
        let mut chunks: Vec<&[String]> = lines.chunks(LINES_PER_PAGE).collect();
        if chunks.is_empty() {
            chunks.push(&[]);
        }

        let mut kids: Vec<ObjectId> = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let title = (index == 0).then_some(document.title.as_str());
            let content = Self::page_content(title, chunk);
            let encoded = content.encode().map_err(|e| render_error("PDF", e))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            kids.push(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }));
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => kids.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(|e| render_error("PDF", e))?;
        Ok(bytes)
    }
}

impl ReportRenderer for PdfRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, DomainError> {
        Self::build(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoestore_core::reports::ReportTable;

    #[test]
    fn test_renders_loadable_pdf() {
        let doc = ReportDocument::new("SALES REPORT")
            .fact("Total sales", "1500.00")
            .fact("Total orders", 3);

        let bytes = PdfRenderer.render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }

    #[test]
    fn test_long_reports_span_pages() {
        let mut table = ReportTable::new("LOW STOCK", &["Product", "Stock"]);
        for i in 0..120 {
            table.row(vec![format!("Product {}", i), "1".to_string()]);
        }
        let doc = ReportDocument::new("INVENTORY REPORT").table(table);

        let expected_pages = doc.body_lines().len().div_ceil(LINES_PER_PAGE);
        let bytes = PdfRenderer.render(&doc).unwrap();
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), expected_pages);
    }

    #[test]
    fn test_empty_document_still_has_a_page() {
        let bytes = PdfRenderer.render(&ReportDocument::new("EMPTY")).unwrap();
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }
}
