//! Table formatting for CLI list output
//!
//! Every list view (project lines, bucket sheets, supplier ranking, readiness)
//! goes through [`TableFormatter`], which renders typed [`CellValue`] rows as
//! aligned text, CSV or Markdown. Colours only apply to the text form.

use chrono::NaiveDate;
use console::style;

use crate::analysis::{FulfillmentBand, SheetCell, SheetTable, Status};
use crate::cli::helpers::{escape_csv, format_countdown, format_qty, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::demand::{Delay, LineStatus};

/// Widest a text column may grow before it is truncated
const MAX_TEXT_WIDTH: usize = 40;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain text, truncated in aligned output
    Text(String),
    /// Identifier (project, item, supplier), cyan
    Key(String),
    /// Quantity, right-aligned
    Qty(f64),
    /// Count, right-aligned
    Count(usize),
    /// Fulfillment percentage coloured by band
    Pct(f64),
    Date(NaiveDate),
    /// Supply delay (on time dim, days yellow, late red)
    Delay(Delay),
    /// Per-line fulfillment status
    LineStatus(LineStatus),
    /// Project status
    Status(Status),
    /// Days until delivery (overdue red, within a week yellow)
    Countdown(Option<i64>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn opt_date(d: Option<NaiveDate>) -> Self {
        d.map_or(CellValue::Empty, CellValue::Date)
    }

    /// Uncoloured display text
    pub fn raw(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Key(s) => s.clone(),
            CellValue::Qty(q) => format_qty(*q),
            CellValue::Count(n) => n.to_string(),
            CellValue::Pct(p) => format!("{:.1}%", p),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Delay(d) => d.to_string(),
            CellValue::LineStatus(s) => s.to_string(),
            CellValue::Status(s) => s.to_string(),
            CellValue::Countdown(days) => format_countdown(*days),
            CellValue::Empty => "-".to_string(),
        }
    }

    fn right_aligned(&self) -> bool {
        matches!(
            self,
            CellValue::Qty(_) | CellValue::Count(_) | CellValue::Pct(_)
        )
    }

    /// Format for aligned text output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        let raw = self.raw();
        if self.right_aligned() {
            let styled = match self {
                CellValue::Pct(p) => match FulfillmentBand::of(*p) {
                    FulfillmentBand::Complete => style(raw).green(),
                    FulfillmentBand::Near => style(raw).yellow(),
                    FulfillmentBand::Low => style(raw).red(),
                },
                _ => style(raw),
            };
            return format!("{:>width$}", styled, width = width);
        }

        let styled = match self {
            CellValue::Text(_) => style(truncate_str(&raw, width)),
            CellValue::Key(_) => style(truncate_str(&raw, width)).cyan(),
            CellValue::Delay(d) => match d {
                Delay::OnTime => style(raw).dim(),
                Delay::Days(_) => style(raw).yellow(),
                Delay::Late => style(raw).red().bold(),
            },
            CellValue::LineStatus(s) => match s {
                LineStatus::Ready => style(raw).green(),
                LineStatus::Partial => style(raw).yellow(),
                LineStatus::Missing => style(raw).red(),
            },
            CellValue::Status(s) => match s {
                Status::Ready => style(raw).green(),
                Status::Partial => style(raw).yellow(),
                Status::Critical => style(raw).red().bold(),
            },
            CellValue::Countdown(Some(d)) if *d < 0 => style(raw).red().bold(),
            CellValue::Countdown(Some(d)) if *d <= 7 => style(raw).yellow(),
            CellValue::Countdown(None) | CellValue::Empty => style(raw).dim(),
            _ => style(raw),
        };
        format!("{:<width$}", styled, width = width)
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Pct(p) => format!("{:.1}", p),
            CellValue::Delay(Delay::OnTime) => "0".to_string(),
            CellValue::Delay(Delay::Days(d)) => d.to_string(),
            other => escape_csv(&other.raw()),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Status(Status::Critical) => "**Critical**".to_string(),
            CellValue::Delay(Delay::Late) => "**late**".to_string(),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        self.raw().chars().count()
    }
}

impl From<&SheetCell> for CellValue {
    fn from(cell: &SheetCell) -> Self {
        match cell {
            SheetCell::Text(s) => CellValue::Text(s.clone()),
            SheetCell::Number(n) => CellValue::Qty(*n),
            SheetCell::Date(d) => CellValue::Date(*d),
            SheetCell::Delay(d) => CellValue::Delay(*d),
            SheetCell::Status(s) => CellValue::LineStatus(*s),
            SheetCell::Empty => CellValue::Empty,
        }
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    headers: &'a [&'a str],
    noun: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    /// `noun` names one row in the summary line, e.g. "line"
    pub fn new(headers: &'a [&'a str], noun: &'static str) -> Self {
        Self {
            headers,
            noun,
            show_summary: true,
        }
    }

    /// Suppress the "N <noun>(s)" line after aligned output
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Output rows in the specified format; JSON is rendered by the caller
    pub fn output(&self, rows: &[Vec<CellValue>], format: OutputFormat) {
        print!("{}", self.render(rows, format));
    }

    pub fn render(&self, rows: &[Vec<CellValue>], format: OutputFormat) -> String {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => self.render_md(rows),
            _ => self.render_tsv(rows),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[Vec<CellValue>]) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let content = rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.display_width())
                    .max()
                    .unwrap_or(0);
                header.len().max(content.min(MAX_TEXT_WIDTH))
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[Vec<CellValue>]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<width$}", style(h).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| row.get(i).unwrap_or(&CellValue::Empty).format_tsv(*w))
                .collect();
            out.push_str(cells.join(" ").trim_end());
            out.push('\n');
        }

        if self.show_summary {
            out.push('\n');
            out.push_str(&format!("{} {}(s)\n", style(rows.len()).cyan(), self.noun));
        }
        out
    }

    fn render_csv(&self, rows: &[Vec<CellValue>]) -> String {
        let mut out = String::new();
        let header: Vec<String> = self.headers.iter().map(|h| escape_csv(h)).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for row in rows {
            let values: Vec<String> = (0..self.headers.len())
                .map(|i| row.get(i).map(|c| c.format_csv()).unwrap_or_default())
                .collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[Vec<CellValue>]) -> String {
        let mut out = String::new();
        out.push_str(&format!("| {} |\n", self.headers.join(" | ")));
        let separators: Vec<&str> = self.headers.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", separators.join("|")));

        for row in rows {
            let values: Vec<String> = (0..self.headers.len())
                .map(|i| row.get(i).map(|c| c.format_md()).unwrap_or_else(|| "-".to_string()))
                .collect();
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }
        out
    }
}

/// Render a sheet through the formatter
pub fn output_sheet(sheet: &SheetTable, noun: &'static str, format: OutputFormat) {
    let rows: Vec<Vec<CellValue>> = sheet
        .rows
        .iter()
        .map(|r| r.iter().map(CellValue::from).collect())
        .collect();
    TableFormatter::new(&sheet.headers, noun).output(&rows, format);
}
