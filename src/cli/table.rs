//! Table output for list commands
//!
//! One formatter renders a list of rows as aligned text, CSV, Markdown, or
//! bare IDs. JSON and YAML are serialized by the commands themselves from
//! the records, not from the rows.

use chrono::{DateTime, NaiveDate, Utc};
use console::style;

use crate::cli::helpers::{escape_md, truncate_str};
use crate::cli::OutputFormat;
use crate::core::identity::EntityId;
use crate::core::shortid::ShortIdIndex;
use crate::entities::project::ProjectStatus;

/// Column definition: stable key (CSV header), display header, max width
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    /// Optional text, shown as "-" when absent
    Maybe(Option<String>),
    Status(ProjectStatus),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Number(u64),
}

impl CellValue {
    fn raw(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Maybe(s) => s.clone().unwrap_or_default(),
            CellValue::Status(s) => s.label().to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            CellValue::Number(n) => n.to_string(),
        }
    }

    fn display_width(&self) -> usize {
        match self {
            CellValue::Maybe(None) => 1,
            other => other.raw().chars().count(),
        }
    }

    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Text(s) => format!("{:<width$}", truncate_str(s, width), width = width),
            CellValue::Maybe(Some(s)) => {
                format!("{:<width$}", truncate_str(s, width), width = width)
            }
            CellValue::Maybe(None) => format!("{:<width$}", style("-").dim(), width = width),
            CellValue::Status(status) => {
                let label = status.label();
                let styled = match status {
                    ProjectStatus::InProgress => style(label).yellow(),
                    ProjectStatus::Finished => style(label).green(),
                    ProjectStatus::Waiting => style(label).cyan(),
                    ProjectStatus::Cancelled => style(label).red().dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            other => format!("{:<width$}", other.raw(), width = width),
        }
    }

    pub fn format_md(&self) -> String {
        match self {
            CellValue::Maybe(None) => "-".to_string(),
            other => escape_md(&other.raw()),
        }
    }
}

pub struct TableRow {
    pub short_id: String,
    pub full_id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(kind: &'static str, id: &EntityId, short_ids: &ShortIdIndex) -> Self {
        Self {
            short_id: short_ids
                .get_short_id(kind, id)
                .map(|n| format!("@{}", n))
                .unwrap_or_default(),
            full_id: id.to_string(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            show_summary: true,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.show_summary = !quiet;
        self
    }

    pub fn output(&self, rows: &[TableRow], format: OutputFormat) -> miette::Result<()> {
        match format {
            OutputFormat::Csv => self.output_csv(rows),
            OutputFormat::Md => {
                self.output_md(rows);
                Ok(())
            }
            OutputFormat::Id => {
                for row in rows {
                    println!("{}", row.full_id);
                }
                Ok(())
            }
            _ => {
                self.output_tsv(rows);
                Ok(())
            }
        }
    }

    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        let mut widths = vec![rows
            .iter()
            .map(|r| r.short_id.len())
            .max()
            .unwrap_or(0)
            .max(5)];

        for col in self.columns {
            let content = rows
                .iter()
                .filter_map(|r| r.get(col.key))
                .map(CellValue::display_width)
                .max()
                .unwrap_or(0);
            widths.push(col.header.len().max(content).min(col.width));
        }
        widths
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let mut header = vec![format!("{:<w$}", style("SHORT").bold().dim(), w = widths[0])];
        for (col, w) in self.columns.iter().zip(&widths[1..]) {
            header.push(format!("{:<w$}", style(col.header).bold(), w = *w));
        }
        println!("{}", header.join(" "));

        let total: usize = widths.iter().sum::<usize>() + widths.len() - 1;
        println!("{}", "-".repeat(total));

        for row in rows {
            let mut parts = vec![format!("{:<w$}", style(&row.short_id).cyan(), w = widths[0])];
            for (col, w) in self.columns.iter().zip(&widths[1..]) {
                parts.push(match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => format!("{:<w$}", "-", w = *w),
                });
            }
            println!("{}", parts.join(" ").trim_end());
        }

        if self.show_summary {
            println!();
            println!(
                "{} {}(s) found. Use {} to reference by short ID.",
                style(rows.len()).cyan(),
                self.entity_name,
                style("@N").cyan()
            );
        }
    }

    fn output_csv(&self, rows: &[TableRow]) -> miette::Result<()> {
        use miette::IntoDiagnostic;

        let mut writer = csv::Writer::from_writer(std::io::stdout());
        let mut headers = vec!["short_id", "id"];
        headers.extend(self.columns.iter().map(|c| c.key));
        writer.write_record(&headers).into_diagnostic()?;

        for row in rows {
            let mut record = vec![row.short_id.clone(), row.full_id.clone()];
            for col in self.columns {
                record.push(row.get(col.key).map(CellValue::raw).unwrap_or_default());
            }
            writer.write_record(&record).into_diagnostic()?;
        }
        writer.flush().into_diagnostic()
    }

    fn output_md(&self, rows: &[TableRow]) {
        let mut headers = vec!["Short", "ID"];
        headers.extend(self.columns.iter().map(|c| c.header));
        println!("| {} |", headers.join(" | "));
        println!("|{}|", vec!["---"; headers.len()].join("|"));

        for row in rows {
            let mut values = vec![row.short_id.clone(), row.full_id.clone()];
            for col in self.columns {
                values.push(row.get(col.key).map_or_else(|| "-".to_string(), CellValue::format_md));
            }
            println!("| {} |", values.join(" | "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_raw_values() {
        assert_eq!(CellValue::Status(ProjectStatus::Finished).raw(), "Finalizado");
        assert_eq!(CellValue::Maybe(None).raw(), "");
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        assert_eq!(CellValue::Date(date).raw(), "2024-03-20");
    }

    #[test]
    fn test_md_escapes_pipes() {
        assert_eq!(CellValue::Text("a|b".to_string()).format_md(), "a\\|b");
        assert_eq!(CellValue::Maybe(None).format_md(), "-");
    }

    #[test]
    fn test_row_uses_short_id() {
        let id = EntityId::from("2");
        let mut short_ids = ShortIdIndex::new();
        short_ids.rebuild("client", [&id]);
        let row = TableRow::new("client", &id, &short_ids).cell("name", CellValue::Text("João".to_string()));
        assert_eq!(row.short_id, "@1");
        assert_eq!(row.full_id, "2");
        assert!(row.get("name").is_some());
        assert!(row.get("email").is_none());
    }

    #[test]
    fn test_widths_are_capped_by_column() {
        let columns = [ColumnDef::new("name", "NAME", 8)];
        let id = EntityId::from("1");
        let rows = vec![TableRow::new("project", &id, &ShortIdIndex::new())
            .cell("name", CellValue::Text("Reforma Cozinha Completa".to_string()))];
        let widths = TableFormatter::new(&columns, "project").calculate_widths(&rows);
        assert_eq!(widths, vec![5, 8]);
    }
}
