//! Reading the Material Study from xlsx or csv
//!
//! Both formats are reduced to header text plus rows of cell text, then
//! mapped onto [`DemandLine`]s in one place. The load is all-or-nothing: the
//! first bad row aborts it.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::core::error::StudyError;
use crate::core::study::{Column, StudyTable};
use crate::entities::demand::{Delay, DemandLine, SupplyType};

/// Load a study file, picking the reader from the extension
pub fn load_study(path: &Path, sheet: &str) -> Result<StudyTable, StudyError> {
    if !path.exists() {
        return Err(StudyError::FileNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let (headers, rows) = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" => read_workbook(path, sheet)?,
        "csv" => read_csv(path)?,
        _ => return Err(StudyError::UnsupportedFormat(ext)),
    };

    let table = build_table(&headers, rows)?.with_source(path);
    info!(
        file = %path.display(),
        lines = table.len(),
        projects = table.project_ids().len(),
        "study loaded"
    );
    Ok(table)
}

fn read_workbook(path: &Path, sheet: &str) -> Result<(Vec<String>, Vec<Vec<String>>), StudyError> {
    let workbook_err = |message: String| StudyError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;

    let names = workbook.sheet_names();
    if !names.iter().any(|n| n == sheet) {
        return Err(StudyError::SheetNotFound {
            sheet: sheet.to_string(),
            available: names.join(", "),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| workbook_err(e.to_string()))?;
    debug!(sheet, rows = range.height(), cols = range.width(), "reading worksheet");

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok((Vec::new(), Vec::new()));
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell_text(cell, false))
        .collect();
    let date_cols: Vec<bool> = headers
        .iter()
        .map(|h| Column::from_header(h).is_some_and(|c| c.is_date()))
        .collect();

    let data = rows
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| cell_text(cell, date_cols.get(i).copied().unwrap_or(false)))
                .collect()
        })
        .collect();

    Ok((headers, data))
}

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), StudyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }
    Ok((headers, rows))
}

/// Text of a workbook cell; date cells (and numbers in date columns) become ISO dates
fn cell_text(cell: &Data, date_column: bool) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if date_column => excel_serial_to_date(*f)
            .map(|d| d.to_string())
            .unwrap_or_default(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) if date_column => excel_serial_to_date(*i as f64)
            .map(|d| d.to_string())
            .unwrap_or_default(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Excel's 1900 date system counts days from 1899-12-30; serials below 1
/// are "no date" placeholders
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Parse a date cell; unparseable text yields `None` rather than an error
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    // Slashed dates without a leading year are month first
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(v, fmt) {
            return Some(d);
        }
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Map header text plus rows of cell text onto a study table
pub(crate) fn build_table(
    headers: &[String],
    rows: Vec<Vec<String>>,
) -> Result<StudyTable, StudyError> {
    let mut index: HashMap<Column, usize> = HashMap::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(col) = Column::from_header(header) {
            index.entry(col).or_insert(i);
        }
    }

    let missing: Vec<String> = Column::REQUIRED
        .iter()
        .filter(|c| !index.contains_key(c))
        .map(|c| c.header().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StudyError::MissingColumns { missing });
    }

    let mut lines = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        // Header is sheet row 1
        let row_no = i + 2;
        let record = RowRef {
            row,
            index: &index,
            row_no,
        };
        let line = record.to_line()?;
        if line.balance < 0.0 {
            warn!(
                row = row_no,
                project = %line.sec_order,
                item = %line.item,
                balance = line.balance,
                "negative balance (over-allocated line) counted as partial"
            );
        }
        lines.push(line);
    }

    debug!(
        columns = index.len(),
        skipped = rows.len() - lines.len(),
        "mapped study rows"
    );
    Ok(StudyTable::new(lines, index.into_keys()))
}

struct RowRef<'a> {
    row: &'a [String],
    index: &'a HashMap<Column, usize>,
    row_no: usize,
}

impl RowRef<'_> {
    fn text(&self, col: Column) -> &str {
        self.index
            .get(&col)
            .and_then(|&i| self.row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn opt(&self, col: Column) -> Option<String> {
        let v = self.text(col);
        (!v.is_empty()).then(|| v.to_string())
    }

    fn qty(&self, col: Column) -> Result<f64, StudyError> {
        let v = self.text(col);
        if v.is_empty() {
            return Ok(0.0);
        }
        v.parse::<f64>()
            .ok()
            .filter(|q| q.is_finite())
            .ok_or_else(|| self.invalid(col, v))
    }

    fn date(&self, col: Column) -> Option<NaiveDate> {
        parse_date(self.text(col))
    }

    fn invalid(&self, col: Column, value: &str) -> StudyError {
        StudyError::InvalidValue {
            row: self.row_no,
            column: col.header().to_string(),
            value: value.to_string(),
        }
    }

    fn to_line(&self) -> Result<DemandLine, StudyError> {
        let delay_text = self.text(Column::Delay);
        let delay = delay_text
            .parse::<Delay>()
            .map_err(|_| self.invalid(Column::Delay, delay_text))?;
        let supply_type: SupplyType = self
            .text(Column::SupplyType)
            .parse()
            .unwrap_or_else(|never| match never {});

        Ok(DemandLine {
            sec_order: self.text(Column::SecOrder).to_string(),
            sec_number: self.opt(Column::SecNumber),
            product: self.opt(Column::Product),
            item: self.text(Column::Item).to_string(),
            description: self.text(Column::Description).to_string(),
            req_qty: self.qty(Column::ReqQty)?,
            allocated_qty: self.qty(Column::AllocatedQty)?,
            balance: self.qty(Column::Balance)?,
            supply_type,
            source: self.opt(Column::Source),
            locater: self.opt(Column::Locater),
            supplier: self.opt(Column::Supplier),
            delay,
            availability_date: self.date(Column::AvailabilityDate),
            roh_delivery: self.date(Column::RohDelivery),
            sec_delivery: self.date(Column::SecDelivery),
            asn_expected_date: self.date(Column::AsnExpectedDate),
            asn_creation_date: self.date(Column::AsnCreationDate),
        })
    }
}
