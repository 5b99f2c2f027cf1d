use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use shoestore_core::domain::ReportFormat;
use shoestore_core::error::DomainError;
use shoestore_core::reports::{ReportDocument, ReportRenderer};

use super::render_error;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

/// Sheet names are capped at 31 characters by spreadsheet applications
const MAX_SHEET_NAME: usize = 31;

/// One-sheet workbook: title, summary facts, then the table with a header row.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxRenderer;

impl XlsxRenderer {
    fn workbook(sheet_name: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
            escape(sheet_name)
        )
    }

    /// Rows of the sheet, `None` leaves a blank spacer row.
    fn rows(document: &ReportDocument) -> Vec<Option<Vec<String>>> {
        let mut rows = vec![Some(vec![document.title.clone()]), None];

        for (label, value) in &document.summary {
            rows.push(Some(vec![label.clone(), value.clone()]));
        }

        if let Some(table) = &document.table {
            if !document.summary.is_empty() {
                rows.push(None);
            }
            rows.push(Some(vec![table.heading.clone()]));
            rows.push(Some(table.columns.clone()));
            rows.extend(table.rows.iter().cloned().map(Some));
        }
        rows
    }

    fn worksheet(document: &ReportDocument) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );

        for (index, row) in Self::rows(document).iter().enumerate() {
            let row_number = index + 1;
            let Some(cells) = row else {
                continue;
            };
            xml.push_str(&format!(r#"<row r="{}">"#, row_number));
            for (col, value) in cells.iter().enumerate() {
                xml.push_str(&cell(&format!("{}{}", column_name(col), row_number), value));
            }
            xml.push_str("</row>");
        }

        xml.push_str("</sheetData></worksheet>");
        xml
    }

    fn build(document: &ReportDocument) -> Result<Vec<u8>, DomainError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let sheet_name: String = document.title.chars().take(MAX_SHEET_NAME).collect();
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", ROOT_RELS.to_string()),
            ("xl/workbook.xml", Self::workbook(&sheet_name)),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
            ("xl/worksheets/sheet1.xml", Self::worksheet(document)),
        ];

        for (name, body) in parts {
            writer
                .start_file(name, options)
                .map_err(|e| render_error("Excel", e))?;
            writer
                .write_all(body.as_bytes())
                .map_err(|e| render_error("Excel", e))?;
        }

        let cursor = writer.finish().map_err(|e| render_error("Excel", e))?;
        Ok(cursor.into_inner())
    }
}

impl ReportRenderer for XlsxRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Excel
    }

    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, DomainError> {
        Self::build(document)
    }
}

/// Numbers become numeric cells so they can be summed, everything else an inline string.
fn cell(reference: &str, value: &str) -> String {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value),
        _ => format!(
            r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            reference,
            escape(value)
        ),
    }
}

/// 0 -> A, 25 -> Z, 26 -> AA
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoestore_core::reports::ReportTable;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
    }

    #[test]
    fn test_workbook_parts_and_cells() {
        let mut table = ReportTable::new("TOP CUSTOMERS", &["Customer", "Orders", "Spent"]);
        table.row(vec!["Tom & Jerry".into(), "2".into(), "199.90".into()]);
        let doc = ReportDocument::new("CUSTOMER REPORT")
            .fact("Total customers", 5)
            .table(table);

        let bytes = XlsxRenderer.render(&doc).unwrap();

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/xl/worksheets/sheet1.xml"));
        assert!(read_part(&bytes, "xl/workbook.xml").contains(r#"name="CUSTOMER REPORT""#));

        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<c r="A1" t="inlineStr"><is><t xml:space="preserve">CUSTOMER REPORT</t></is></c>"#));
        assert!(sheet.contains(r#"<c r="B3"><v>5</v></c>"#));
        assert!(sheet.contains("Tom &amp; Jerry"));
        assert!(sheet.contains(r#"<c r="C7"><v>199.90</v></c>"#));
        // Row 2 is a spacer
        assert!(!sheet.contains(r#"<row r="2">"#));
    }

    #[test]
    fn test_long_title_is_cut_for_sheet_name() {
        let title = "X".repeat(40);
        let bytes = XlsxRenderer.render(&ReportDocument::new(title)).unwrap();
        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(&format!(r#"name="{}""#, "X".repeat(MAX_SHEET_NAME))));
    }
}
