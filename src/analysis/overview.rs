//! Dashboard overview of the whole study

use serde::Serialize;
use std::collections::BTreeMap;

use super::fulfillment_pct;
use super::status::{project_status, Status};
use crate::core::StudyTable;
use crate::entities::demand::DemandLine;

/// Headline numbers over every demand line
#[derive(Debug, Clone, Serialize)]
pub struct Overview<'a> {
    pub total_projects: usize,
    pub total_items: usize,
    pub fulfillment_pct: f64,
    pub total_balance: f64,
    /// Allocated quantity per supply type label
    pub supply_breakdown: BTreeMap<String, f64>,
    pub ready_projects: usize,
    pub partial_projects: usize,
    pub critical_projects: usize,
    /// Number of delayed lines in the whole study
    pub delayed_count: usize,
    /// First delayed lines, in study order
    pub delayed: Vec<&'a DemandLine>,
}

pub fn dashboard_overview(table: &StudyTable, delayed_limit: usize) -> Overview<'_> {
    let mut supply_breakdown: BTreeMap<String, f64> = BTreeMap::new();
    let mut total_req = 0.0;
    let mut total_allocated = 0.0;
    let mut total_balance = 0.0;

    for line in table.lines() {
        total_req += line.req_qty;
        total_allocated += line.allocated_qty;
        total_balance += line.balance;
        *supply_breakdown
            .entry(line.supply_type.label().to_string())
            .or_insert(0.0) += line.allocated_qty;
    }

    let projects = table.project_ids();
    let (mut ready, mut partial, mut critical) = (0, 0, 0);
    for status in projects.iter().filter_map(|p| project_status(table, p)) {
        match status.status {
            Status::Ready => ready += 1,
            Status::Partial => partial += 1,
            Status::Critical => critical += 1,
        }
    }

    let delayed_all: Vec<&DemandLine> = table.lines().iter().filter(|l| l.delay.is_delayed()).collect();

    Overview {
        total_projects: projects.len(),
        total_items: table.len(),
        fulfillment_pct: fulfillment_pct(total_allocated, total_req),
        total_balance,
        supply_breakdown,
        ready_projects: ready,
        partial_projects: partial,
        critical_projects: critical,
        delayed_count: delayed_all.len(),
        delayed: delayed_all.into_iter().take(delayed_limit).collect(),
    }
}
