//! Format-neutral report content

/// Title, a block of `label: value` facts, and an optional table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportDocument {
    pub title: String,
    pub summary: Vec<(String, String)>,
    pub table: Option<ReportTable>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportTable {
    pub heading: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn fact(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.summary.push((label.into(), value.to_string()));
        self
    }

    pub fn table(mut self, table: ReportTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Plain lines shared by the text and PDF layouts
    pub fn body_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .summary
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect();

        if let Some(table) = &self.table {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(table.heading.clone());
            if table.rows.is_empty() {
                lines.push("(no data)".to_string());
            }
            for row in &table.rows {
                lines.push(format!("- {}", row.join(" | ")));
            }
        }
        lines
    }
}

impl ReportTable {
    pub fn new(heading: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            heading: heading.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}
