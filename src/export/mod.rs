//! Workbook export of the production action plan

pub mod xlsx;

pub use xlsx::{export_blockers, write_action_report, write_sheet_workbook};
