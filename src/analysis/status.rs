//! Project status classifier

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::fulfillment_pct;
use crate::core::StudyTable;
use crate::entities::demand::{Delay, DemandLine, LineStatus, SupplyType};

/// Overall material status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ready,
    Partial,
    Critical,
}

impl Status {
    /// Ready when nothing is outstanding; Critical when anything is missing
    /// or known late; Partial otherwise.
    pub fn classify(total_balance: f64, missing_items: usize, max_delay: Delay) -> Self {
        if total_balance == 0.0 {
            Status::Ready
        } else if missing_items > 0 || max_delay.is_late() {
            Status::Critical
        } else {
            Status::Partial
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ready => write!(f, "Ready"),
            Status::Partial => write!(f, "Partial"),
            Status::Critical => write!(f, "Critical"),
        }
    }
}

/// Aggregated material position of one project
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatus {
    pub project: String,
    pub status: Status,
    pub total_items: usize,
    pub ready_items: usize,
    pub partial_items: usize,
    pub missing_items: usize,
    pub total_req: f64,
    pub total_allocated: f64,
    pub total_balance: f64,
    pub fulfillment_pct: f64,
    pub max_delay: Delay,
    /// Allocated quantity per supply type
    pub supply_breakdown: BTreeMap<String, f64>,
    /// Earliest scheduled project delivery
    pub sec_delivery: Option<NaiveDate>,
    /// Earliest required-on-hand date
    pub roh_delivery: Option<NaiveDate>,
}

/// Classify the lines of one project; `None` when the project has no lines
pub fn project_status(table: &StudyTable, project: &str) -> Option<ProjectStatus> {
    let lines: Vec<&DemandLine> = table.for_project(project).collect();
    classify_lines(project, &lines)
}

pub(crate) fn classify_lines(project: &str, lines: &[&DemandLine]) -> Option<ProjectStatus> {
    if lines.is_empty() {
        return None;
    }

    let mut ready = 0;
    let mut partial = 0;
    let mut missing = 0;
    let mut total_req = 0.0;
    let mut total_allocated = 0.0;
    let mut total_balance = 0.0;
    let mut max_delay = Delay::OnTime;
    let mut supply_breakdown: BTreeMap<String, f64> = BTreeMap::new();

    for line in lines {
        match line.status() {
            LineStatus::Ready => ready += 1,
            LineStatus::Partial => partial += 1,
            LineStatus::Missing => missing += 1,
        }
        total_req += line.req_qty;
        total_allocated += line.allocated_qty;
        total_balance += line.balance;
        if line.delay > max_delay {
            max_delay = line.delay;
        }
        *supply_breakdown
            .entry(line.supply_type.label().to_string())
            .or_insert(0.0) += line.allocated_qty;
    }

    Some(ProjectStatus {
        project: project.to_string(),
        status: Status::classify(total_balance, missing, max_delay),
        total_items: lines.len(),
        ready_items: ready,
        partial_items: partial,
        missing_items: missing,
        total_req,
        total_allocated,
        total_balance,
        fulfillment_pct: fulfillment_pct(total_allocated, total_req),
        max_delay,
        supply_breakdown,
        sec_delivery: lines.iter().filter_map(|l| l.sec_delivery).min(),
        roh_delivery: lines.iter().filter_map(|l| l.roh_delivery).min(),
    })
}

/// Blocking issue on the project health view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "items")]
pub enum ProjectIssue {
    MissingItems(usize),
    QcItems(usize),
    GrItems(usize),
}

impl std::fmt::Display for ProjectIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectIssue::MissingItems(n) => write!(f, "{} items completely missing", n),
            ProjectIssue::QcItems(n) => write!(f, "{} items stuck in QC", n),
            ProjectIssue::GrItems(n) => write!(f, "{} items in GR process", n),
        }
    }
}

/// Item-count issues for a project: missing lines, QC holds, pending GRs
pub fn project_issues(table: &StudyTable, status: &ProjectStatus) -> Vec<ProjectIssue> {
    let mut issues = Vec::new();
    if status.missing_items > 0 {
        issues.push(ProjectIssue::MissingItems(status.missing_items));
    }

    let qc = table
        .for_project(&status.project)
        .filter(|l| l.supply_type == SupplyType::QcHold)
        .count();
    if qc > 0 {
        issues.push(ProjectIssue::QcItems(qc));
    }

    let gr = table
        .for_project(&status.project)
        .filter(|l| l.supply_type == SupplyType::GrInProcess)
        .count();
    if gr > 0 {
        issues.push(ProjectIssue::GrItems(gr));
    }

    issues
}
