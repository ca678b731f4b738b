//! Material inquiry - where an item is, and why it cannot be issued

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::StudyTable;
use crate::entities::demand::{DemandLine, SupplyType};

/// Item quantities summed per project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectAllocation {
    pub project: String,
    pub req_qty: f64,
    pub allocated_qty: f64,
    pub balance: f64,
}

/// Allocated quantity per supply type and source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAllocation {
    pub supply_type: String,
    pub source: String,
    pub allocated_qty: f64,
}

/// Reason an item cannot be issued to production
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "qty")]
pub enum BlockingIssue {
    /// Allocated quantity held in quality control
    StuckInQc(f64),
    /// Allocated quantity awaiting goods receipt
    InGrProcess(f64),
    /// Allocated quantity on purchase orders marked late
    DelayedPo(f64),
    /// Outstanding balance on requisitions without an order
    NeedsPr(f64),
}

impl BlockingIssue {
    /// Delayed POs are the only hard stop; the rest need follow-up
    pub fn is_severe(&self) -> bool {
        matches!(self, BlockingIssue::DelayedPo(_))
    }
}

impl std::fmt::Display for BlockingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockingIssue::StuckInQc(q) => write!(f, "{:.0} units stuck in QC", q),
            BlockingIssue::InGrProcess(q) => write!(f, "{:.0} units in GR process", q),
            BlockingIssue::DelayedPo(q) => write!(f, "{:.0} units on delayed POs", q),
            BlockingIssue::NeedsPr(q) => write!(f, "{:.0} units need PR creation", q),
        }
    }
}

/// Everything known about one item across all projects
#[derive(Debug, Clone, Serialize)]
pub struct MaterialInquiry<'a> {
    pub item: String,
    pub description: String,
    pub total_req: f64,
    pub total_allocated: f64,
    pub total_balance: f64,
    pub by_project: Vec<ProjectAllocation>,
    pub by_source: Vec<SourceAllocation>,
    pub blocking_issues: Vec<BlockingIssue>,
    pub lines: Vec<&'a DemandLine>,
}

/// Inquiry for `item`; `None` when no line carries it
pub fn material_inquiry<'a>(table: &'a StudyTable, item: &'a str) -> Option<MaterialInquiry<'a>> {
    let lines: Vec<&DemandLine> = table.for_item(item).collect();
    let first = lines.first()?;

    let mut by_project: BTreeMap<&str, ProjectAllocation> = BTreeMap::new();
    let mut by_source: BTreeMap<(&str, &str), f64> = BTreeMap::new();

    for line in &lines {
        let entry = by_project
            .entry(line.sec_order.as_str())
            .or_insert_with(|| ProjectAllocation {
                project: line.sec_order.clone(),
                req_qty: 0.0,
                allocated_qty: 0.0,
                balance: 0.0,
            });
        entry.req_qty += line.req_qty;
        entry.allocated_qty += line.allocated_qty;
        entry.balance += line.balance;

        *by_source
            .entry((line.supply_type.label(), line.source_str()))
            .or_insert(0.0) += line.allocated_qty;
    }

    Some(MaterialInquiry {
        item: item.to_string(),
        description: first.description.clone(),
        total_req: lines.iter().map(|l| l.req_qty).sum(),
        total_allocated: lines.iter().map(|l| l.allocated_qty).sum(),
        total_balance: lines.iter().map(|l| l.balance).sum(),
        by_project: by_project.into_values().collect(),
        by_source: by_source
            .into_iter()
            .map(|((supply_type, source), allocated_qty)| SourceAllocation {
                supply_type: supply_type.to_string(),
                source: source.to_string(),
                allocated_qty,
            })
            .collect(),
        blocking_issues: blocking_issues(&lines),
        lines,
    })
}

/// Every applicable rule fires; the rules are independent
pub fn blocking_issues(lines: &[&DemandLine]) -> Vec<BlockingIssue> {
    let mut issues = Vec::new();

    if let Some(q) = sum_matching(lines, |l| l.supply_type == SupplyType::QcHold, |l| l.allocated_qty) {
        issues.push(BlockingIssue::StuckInQc(q));
    }
    if let Some(q) = sum_matching(lines, |l| l.supply_type == SupplyType::GrInProcess, |l| l.allocated_qty) {
        issues.push(BlockingIssue::InGrProcess(q));
    }
    if let Some(q) = sum_matching(
        lines,
        |l| l.supply_type == SupplyType::PurchaseOrder && l.delay.is_late(),
        |l| l.allocated_qty,
    ) {
        issues.push(BlockingIssue::DelayedPo(q));
    }
    if let Some(q) = sum_matching(lines, |l| l.supply_type == SupplyType::PurchaseRequisition, |l| l.balance) {
        issues.push(BlockingIssue::NeedsPr(q));
    }

    issues
}

/// Sum of `qty` over matching lines, `None` when nothing matches
fn sum_matching(
    lines: &[&DemandLine],
    pred: impl Fn(&DemandLine) -> bool,
    qty: impl Fn(&DemandLine) -> f64,
) -> Option<f64> {
    let mut found = false;
    let mut total = 0.0;
    for line in lines.iter().copied() {
        if pred(line) {
            found = true;
            total += qty(line);
        }
    }
    found.then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::demand::Delay;

    #[test]
    fn test_qc_and_pr_both_reported() {
        let table = StudyTable::from_lines(vec![
            DemandLine::new("P1", "ITM1", 3.0, 3.0, SupplyType::QcHold),
            DemandLine::new("P2", "ITM1", 2.0, 0.0, SupplyType::PurchaseRequisition),
        ]);
        let info = material_inquiry(&table, "ITM1").unwrap();

        assert_eq!(
            info.blocking_issues,
            vec![BlockingIssue::StuckInQc(3.0), BlockingIssue::NeedsPr(2.0)]
        );
        assert_eq!(info.blocking_issues[0].to_string(), "3 units stuck in QC");
        assert_eq!(info.blocking_issues[1].to_string(), "2 units need PR creation");
    }

    #[test]
    fn test_all_rules_fire_together() {
        let table = StudyTable::from_lines(vec![
            DemandLine::new("P1", "X", 3.0, 3.0, SupplyType::QcHold),
            DemandLine::new("P1", "X", 4.0, 4.0, SupplyType::GrInProcess),
            DemandLine::new("P1", "X", 6.0, 5.0, SupplyType::PurchaseOrder).with_delay(Delay::Late),
            DemandLine::new("P1", "X", 7.0, 7.0, SupplyType::PurchaseOrder).with_delay(Delay::Days(3.0)),
            DemandLine::new("P1", "X", 1.0, 0.0, SupplyType::PurchaseRequisition),
        ]);
        let info = material_inquiry(&table, "X").unwrap();
        assert_eq!(
            info.blocking_issues,
            vec![
                BlockingIssue::StuckInQc(3.0),
                BlockingIssue::InGrProcess(4.0),
                BlockingIssue::DelayedPo(5.0),
                BlockingIssue::NeedsPr(1.0),
            ]
        );
    }

    #[test]
    fn test_no_issues_for_plain_stock() {
        let table = StudyTable::from_lines(vec![DemandLine::new(
            "P1",
            "X",
            3.0,
            3.0,
            SupplyType::Inventory,
        )]);
        let info = material_inquiry(&table, "X").unwrap();
        assert!(info.blocking_issues.is_empty());
    }

    #[test]
    fn test_breakdowns_grouped_and_sorted() {
        let table = StudyTable::from_lines(vec![
            DemandLine::new("P2", "X", 5.0, 5.0, SupplyType::Inventory)
                .with_source("free_stock")
                .with_description("Gasket"),
            DemandLine::new("P1", "X", 4.0, 1.0, SupplyType::Inventory).with_source("free_stock"),
            DemandLine::new("P2", "X", 2.0, 2.0, SupplyType::PurchaseOrder).with_source("PO-1"),
            DemandLine::new("P1", "Y", 9.0, 9.0, SupplyType::Inventory),
        ]);
        let info = material_inquiry(&table, "X").unwrap();

        assert_eq!(info.description, "Gasket");
        assert_eq!(info.total_req, 11.0);
        assert_eq!(info.total_allocated, 8.0);
        assert_eq!(info.total_balance, 3.0);
        assert_eq!(info.lines.len(), 3);

        assert_eq!(info.by_project.len(), 2);
        assert_eq!(info.by_project[0].project, "P1");
        assert_eq!(info.by_project[1].req_qty, 7.0);

        assert_eq!(info.by_source.len(), 2);
        assert_eq!(info.by_source[0].supply_type, "PO");
        assert_eq!(info.by_source[1].source, "free_stock");
        assert_eq!(info.by_source[1].allocated_qty, 6.0);
    }

    #[test]
    fn test_unknown_item() {
        let table = StudyTable::default();
        assert!(material_inquiry(&table, "X").is_none());
    }
}
