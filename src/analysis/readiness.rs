//! Production readiness ranking

use chrono::NaiveDate;
use serde::Serialize;

use super::status::{project_status, Status};
use crate::core::StudyTable;
use crate::entities::demand::Delay;

/// One project on the readiness ranking
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessRow {
    pub project: String,
    pub status: Status,
    pub fulfillment_pct: f64,
    pub missing_items: usize,
    pub max_delay: Delay,
    pub sec_delivery: Option<NaiveDate>,
}

impl ReadinessRow {
    pub fn is_fully_ready(&self) -> bool {
        self.fulfillment_pct >= 100.0
    }
}

/// Colour band of a fulfillment percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentBand {
    Complete,
    Near,
    Low,
}

impl FulfillmentBand {
    pub fn of(pct: f64) -> Self {
        if pct >= 100.0 {
            FulfillmentBand::Complete
        } else if pct >= 90.0 {
            FulfillmentBand::Near
        } else {
            FulfillmentBand::Low
        }
    }
}

/// Which projects to keep on the ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadinessFilter {
    /// Only projects at 100 %
    FullyReady,
    /// Projects at or above the threshold
    AtLeast(f64),
}

impl ReadinessFilter {
    pub fn keeps(&self, row: &ReadinessRow) -> bool {
        match self {
            ReadinessFilter::FullyReady => row.is_fully_ready(),
            ReadinessFilter::AtLeast(min) => row.fulfillment_pct >= *min,
        }
    }
}

/// Every project, best fulfillment first; ties keep study order
pub fn production_readiness(table: &StudyTable) -> Vec<ReadinessRow> {
    let mut rows: Vec<ReadinessRow> = table
        .project_ids()
        .into_iter()
        .filter_map(|project| project_status(table, project))
        .map(|s| ReadinessRow {
            project: s.project,
            status: s.status,
            fulfillment_pct: s.fulfillment_pct,
            missing_items: s.missing_items,
            max_delay: s.max_delay,
            sec_delivery: s.sec_delivery,
        })
        .collect();

    // sort_by is stable
    rows.sort_by(|a, b| b.fulfillment_pct.total_cmp(&a.fulfillment_pct));
    rows
}
