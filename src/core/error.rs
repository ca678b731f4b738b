//! Load and export errors with diagnostic help

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a study table; nothing is loaded when this is returned
#[derive(Debug, Error, Diagnostic)]
pub enum StudyError {
    #[error("Study file not found: {}", .0.display())]
    #[diagnostic(
        code(mstudy::load::not_found),
        help("Pass the file with --file or set MSTUDY_FILE")
    )]
    FileNotFound(PathBuf),

    #[error("No Material Study file found in {}", dir.display())]
    #[diagnostic(code(mstudy::load::no_study_file))]
    NoStudyFile {
        dir: PathBuf,
        #[help]
        help: Option<String>,
    },

    #[error("Unsupported file format: {0}")]
    #[diagnostic(
        code(mstudy::load::format),
        help("Only .xlsx, .xlsm, .xls and .csv files can be read")
    )]
    UnsupportedFormat(String),

    #[error("Cannot read workbook {}: {message}", path.display())]
    #[diagnostic(code(mstudy::load::workbook))]
    Workbook { path: PathBuf, message: String },

    #[error("Sheet '{sheet}' not found (available: {available})")]
    #[diagnostic(code(mstudy::load::sheet), help("Use --sheet to pick another sheet"))]
    SheetNotFound { sheet: String, available: String },

    #[error("Missing required column(s): {}", missing.join(", "))]
    #[diagnostic(
        code(mstudy::load::columns),
        help("The study needs at least: SEC order, item, req_qty, allocated_qty, balance, supply_type")
    )]
    MissingColumns { missing: Vec<String> },

    #[error("Row {row}: invalid value '{value}' in column '{column}'")]
    #[diagnostic(code(mstudy::load::value))]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV error: {0}")]
    #[diagnostic(code(mstudy::load::csv))]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(mstudy::io))]
    Io(#[from] std::io::Error),
}

/// Failure while writing an export workbook
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("Cannot write workbook {}: {source}", path.display())]
    #[diagnostic(code(mstudy::export::xlsx))]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("Cannot create export directory {}: {source}", path.display())]
    #[diagnostic(code(mstudy::export::dir))]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
