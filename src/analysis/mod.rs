//! Reporting engine - pure functions of the study table
//!
//! Each view (project status, material inquiry, supplier delays, production
//! readiness, production blockers, overview, critical projects) is computed
//! from a [`StudyTable`](crate::core::StudyTable) without side effects.

pub mod blockers;
pub mod critical;
pub mod inquiry;
pub mod overview;
pub mod readiness;
pub mod sheet;
pub mod status;
pub mod supplier;

pub use blockers::{
    file_suffix, production_blockers, selection_options, BlockerRules, Bucket,
    ProductionBlockers, ReallocationAction, SelectBy, Selection, Verdict,
};
pub use critical::{critical_projects, problem_lines, CriticalProject};
pub use inquiry::{material_inquiry, BlockingIssue, MaterialInquiry};
pub use overview::{dashboard_overview, Overview};
pub use readiness::{production_readiness, FulfillmentBand, ReadinessFilter, ReadinessRow};
pub use sheet::{Field, FieldDef, SheetCell, SheetTable};
pub use status::{project_issues, project_status, ProjectIssue, ProjectStatus, Status};
pub use supplier::{delayed_lines_for, supplier_performance, SupplierStats};

/// allocated / required × 100, clamped to [0, 100]; 0 when nothing is required
pub fn fulfillment_pct(allocated: f64, required: f64) -> f64 {
    if required > 0.0 {
        (allocated / required * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
