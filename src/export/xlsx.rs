//! xlsx writers for bucket sheets and the combined action report

use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analysis::{Bucket, ProductionBlockers, SheetCell, SheetTable};
use crate::core::error::ExportError;
use crate::core::StudyTable;
use crate::entities::demand::Delay;

const SUMMARY_SHEET: &str = "Summary";

struct Formats {
    header: Format,
    text: Format,
    number: Format,
    date: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_background_color(0x4472C4)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            text: Format::new().set_border(FormatBorder::Thin),
            number: Format::new()
                .set_num_format("#,##0.##")
                .set_border(FormatBorder::Thin),
            date: Format::new()
                .set_num_format("yyyy-mm-dd")
                .set_border(FormatBorder::Thin),
        }
    }
}

/// Write one sheet as a single-sheet workbook
pub fn write_sheet_workbook(path: &Path, sheet: &SheetTable) -> Result<(), ExportError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    add_sheet(&mut workbook, sheet, &formats).map_err(|e| xlsx_error(path, e))?;
    save(&mut workbook, path)
}

/// Write every non-empty sheet plus a summary of all bucket counts
pub fn write_action_report(
    path: &Path,
    sheets: &[SheetTable],
    summary: &[(&str, usize)],
) -> Result<(), ExportError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    for sheet in sheets.iter().filter(|s| !s.is_empty()) {
        add_sheet(&mut workbook, sheet, &formats).map_err(|e| xlsx_error(path, e))?;
    }
    add_summary(&mut workbook, summary, &formats).map_err(|e| xlsx_error(path, e))?;

    save(&mut workbook, path)
}

/// Write the per-bucket workbooks and the combined report into `dir`
///
/// Returns the written paths, bucket files first.
pub fn export_blockers(
    dir: &Path,
    blockers: &ProductionBlockers<'_>,
    study: &StudyTable,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Dir {
        path: dir.to_path_buf(),
        source,
    })?;

    let suffix = blockers.selection.file_suffix();
    let mut written = Vec::new();
    let mut sheets = Vec::new();

    for bucket in Bucket::ALL {
        let sheet = blockers.sheet(bucket, study);
        if sheet.is_empty() {
            debug!(bucket = bucket.sheet_name(), "empty bucket, no workbook");
            continue;
        }
        let path = dir.join(format!("{}_{}.xlsx", bucket.file_stem(), suffix));
        write_sheet_workbook(&path, &sheet)?;
        written.push(path);
        sheets.push(sheet);
    }

    let report = dir.join(format!("Production_Action_Report_{}.xlsx", suffix));
    write_action_report(&report, &sheets, &blockers.summary())?;
    written.push(report);

    info!(dir = %dir.display(), files = written.len(), "action plan exported");
    Ok(written)
}

fn save(workbook: &mut Workbook, path: &Path) -> Result<(), ExportError> {
    workbook.save(path).map_err(|e| xlsx_error(path, e))?;
    debug!(file = %path.display(), "workbook written");
    Ok(())
}

fn xlsx_error(path: &Path, source: XlsxError) -> ExportError {
    ExportError::Xlsx {
        path: path.to_path_buf(),
        source,
    }
}

fn add_sheet(workbook: &mut Workbook, sheet: &SheetTable, formats: &Formats) -> Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name)?;

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &formats.header)?;
    }
    for (i, row) in sheet.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, i as u32 + 1, col as u16, cell, formats)?;
        }
    }

    worksheet.autofit();
    Ok(())
}

fn add_summary(
    workbook: &mut Workbook,
    summary: &[(&str, usize)],
    formats: &Formats,
) -> Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SUMMARY_SHEET)?;

    worksheet.write_with_format(0, 0, "Category", &formats.header)?;
    worksheet.write_with_format(0, 1, "Count", &formats.header)?;
    for (i, (category, count)) in summary.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_with_format(row, 0, *category, &formats.text)?;
        worksheet.write_with_format(row, 1, *count as f64, &formats.number)?;
    }

    worksheet.autofit();
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &SheetCell,
    formats: &Formats,
) -> Result<(), XlsxError> {
    match cell {
        SheetCell::Text(s) => {
            worksheet.write_with_format(row, col, s.as_str(), &formats.text)?;
        }
        SheetCell::Number(n) => {
            worksheet.write_with_format(row, col, *n, &formats.number)?;
        }
        SheetCell::Date(d) if (1900..=9999).contains(&d.year()) => {
            let date = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)?;
            worksheet.write_with_format(row, col, &date, &formats.date)?;
        }
        // Outside Excel's date range
        SheetCell::Date(d) => {
            worksheet.write_with_format(row, col, d.to_string().as_str(), &formats.text)?;
        }
        SheetCell::Delay(Delay::OnTime) => {
            worksheet.write_with_format(row, col, 0.0, &formats.number)?;
        }
        SheetCell::Delay(Delay::Days(days)) => {
            worksheet.write_with_format(row, col, *days, &formats.number)?;
        }
        SheetCell::Delay(Delay::Late) => {
            worksheet.write_with_format(row, col, "late", &formats.text)?;
        }
        SheetCell::Status(status) => {
            worksheet.write_with_format(row, col, status.to_string().as_str(), &formats.text)?;
        }
        SheetCell::Empty => {
            worksheet.write_blank(row, col, &formats.text)?;
        }
    }
    Ok(())
}
