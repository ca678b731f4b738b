//! Production blockers for a selection of projects
//!
//! Splits the selected demand lines into the five action buckets a planner
//! works through before releasing a job: material held in QC, receipts not
//! yet posted, stock already on the WIP floor, inventory tied to other jobs,
//! and lines with nothing allocated at all.

use clap::ValueEnum;
use serde::Serialize;

use super::fulfillment_pct;
use super::sheet::{Field, FieldDef, SheetTable};
use crate::core::config::{Config, DEFAULT_FREE_STOCK, DEFAULT_WIP_LOCATER};
use crate::core::study::{Column, StudyTable};
use crate::entities::demand::{DemandLine, SupplyType};

/// Identifier used to select demand lines
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectBy {
    /// `SEC order`
    #[default]
    Order,
    /// `SEC Number`
    Number,
    /// `product`
    Product,
}

impl SelectBy {
    pub fn column(&self) -> Column {
        match self {
            SelectBy::Order => Column::SecOrder,
            SelectBy::Number => Column::SecNumber,
            SelectBy::Product => Column::Product,
        }
    }

    /// Value of the selecting field on `line`, if set
    pub fn value<'a>(&self, line: &'a DemandLine) -> Option<&'a str> {
        let value = match self {
            SelectBy::Order => Some(line.sec_order.as_str()),
            SelectBy::Number => line.sec_number.as_deref(),
            SelectBy::Product => line.product.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl std::fmt::Display for SelectBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column().header())
    }
}

/// Distinct non-empty values of the selecting field, sorted
pub fn selection_options(table: &StudyTable, by: SelectBy) -> Vec<&str> {
    let mut options: Vec<&str> = table.lines().iter().filter_map(|l| by.value(l)).collect();
    options.sort_unstable();
    options.dedup();
    options
}

/// A set of identifiers to push to production
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub by: SelectBy,
    pub values: Vec<String>,
}

impl Selection {
    /// Selection of `values`; an empty list falls back to the first option
    pub fn resolve(table: &StudyTable, by: SelectBy, values: Vec<String>) -> Self {
        let values = if values.is_empty() {
            selection_options(table, by)
                .first()
                .map(|v| vec![v.to_string()])
                .unwrap_or_default()
        } else {
            values
        };
        Self { by, values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Lines whose selecting field is one of the selected values
    pub fn lines<'a>(&self, table: &'a StudyTable) -> Vec<&'a DemandLine> {
        table
            .lines()
            .iter()
            .filter(|l| self.by.value(l).is_some_and(|v| self.contains(v)))
            .collect()
    }

    /// Name fragment for exported files
    pub fn file_suffix(&self) -> String {
        file_suffix(&self.values)
    }
}

/// One value keeps its name, two or three are joined, more are counted
pub fn file_suffix(selected: &[String]) -> String {
    let raw = match selected.len() {
        0 => "export".to_string(),
        1 => selected[0].clone(),
        2 | 3 => selected.join("_"),
        n => format!("{}_items", n),
    };
    raw.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Sentinels that drive bucket membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockerRules {
    /// Locater code of stock already on the production floor
    pub wip_locater: String,
    /// Source value of unallocated inventory
    pub free_stock: String,
}

impl Default for BlockerRules {
    fn default() -> Self {
        Self {
            wip_locater: DEFAULT_WIP_LOCATER.to_string(),
            free_stock: DEFAULT_FREE_STOCK.to_string(),
        }
    }
}

impl BlockerRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            wip_locater: config.wip_locater().to_string(),
            free_stock: config.free_stock().to_string(),
        }
    }
}

/// Action bucket of the production push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Qc,
    GrPending,
    Wip,
    Reallocation,
    Missing,
}

const QC_FIELDS: &[FieldDef] = &[
    FieldDef::col("Item Code", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Qty in QC", Column::AllocatedQty),
    FieldDef::col("PO-Line", Column::Locater),
    FieldDef::col("Supplier", Column::Supplier),
    FieldDef::col("Received Date", Column::AvailabilityDate),
];

const GR_FIELDS: &[FieldDef] = &[
    FieldDef::col("Item Code", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Qty Pending GR", Column::AllocatedQty),
    FieldDef::col("PO-Line", Column::Locater),
    FieldDef::col("Supplier", Column::Supplier),
    FieldDef::col("Receipt Date", Column::AvailabilityDate),
];

const WIP_FIELDS: &[FieldDef] = &[
    FieldDef::col("Item Code", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Available Qty", Column::AllocatedQty),
    FieldDef::col("Source Job", Column::Source),
    FieldDef::col("Locater", Column::Locater),
];

const REALLOCATION_FIELDS: &[FieldDef] = &[
    FieldDef::col("Item Code", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Qty to Reallocate", Column::AllocatedQty),
    FieldDef::col("Project", Column::SecOrder),
    FieldDef::col("Source Project", Column::Source),
    FieldDef::col("Locater", Column::Locater),
    FieldDef::derived("Action Required", Field::Action),
];

const MISSING_FIELDS: &[FieldDef] = &[
    FieldDef::col("Item Code", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Required Qty", Column::ReqQty),
    FieldDef::col("Missing Qty", Column::Balance),
];

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Qc,
        Bucket::GrPending,
        Bucket::Wip,
        Bucket::Reallocation,
        Bucket::Missing,
    ];

    /// Section heading in terminal output
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Qc => "Materials Stopped at QC",
            Bucket::GrPending => "Materials Pending GR (Goods Receipt)",
            Bucket::Wip => "Materials Available in WIP",
            Bucket::Reallocation => "Materials to Allocate from Other Jobs",
            Bucket::Missing => "Missing Materials - PRs Required",
        }
    }

    /// Worksheet name in the combined report
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Bucket::Qc => "QC Items",
            Bucket::GrPending => "GR Pending",
            Bucket::Wip => "WIP Materials",
            Bucket::Reallocation => "Reallocation Needed",
            Bucket::Missing => "Missing Materials",
        }
    }

    /// File name stem of the per-bucket workbook
    pub fn file_stem(&self) -> &'static str {
        match self {
            Bucket::Qc => "QC_Items",
            Bucket::GrPending => "GR_Pending",
            Bucket::Wip => "WIP_Materials",
            Bucket::Reallocation => "Reallocation_Needed",
            Bucket::Missing => "Missing_Materials",
        }
    }

    /// Category label on the summary sheet
    pub fn category(&self) -> &'static str {
        match self {
            Bucket::Qc => "QC Items",
            Bucket::GrPending => "GR Pending",
            Bucket::Wip => "WIP Items",
            Bucket::Reallocation => "To Reallocate",
            Bucket::Missing => "Missing Materials",
        }
    }

    /// Message shown when the bucket is empty
    pub fn empty_message(&self) -> &'static str {
        match self {
            Bucket::Qc => "No items stuck in QC",
            Bucket::GrPending => "No items pending GR",
            Bucket::Wip => "No items in WIP locater",
            Bucket::Reallocation => "No reallocation needed",
            Bucket::Missing => "No missing materials",
        }
    }

    /// Headline for a non-empty bucket of `n` lines
    pub fn headline(&self, n: usize) -> String {
        match self {
            Bucket::Qc => format!("{} items stuck in QC - priority action required", n),
            Bucket::GrPending => format!("{} items pending GR processing", n),
            Bucket::Wip => format!("{} items available in WIP - issue from production", n),
            Bucket::Reallocation => format!("{} items need reallocation from other jobs", n),
            Bucket::Missing => format!("{} items completely missing - create PRs", n),
        }
    }

    /// QC, GR and missing lines hold up the release; the others do not
    pub fn is_blocking(&self) -> bool {
        matches!(self, Bucket::Qc | Bucket::GrPending | Bucket::Missing)
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        match self {
            Bucket::Qc => QC_FIELDS,
            Bucket::GrPending => GR_FIELDS,
            Bucket::Wip => WIP_FIELDS,
            Bucket::Reallocation => REALLOCATION_FIELDS,
            Bucket::Missing => MISSING_FIELDS,
        }
    }
}

/// What it takes to move inventory from another job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReallocationAction {
    /// Source is unassigned (`-`)
    CanReallocate,
    /// Source is another project
    NeedsApproval,
}

impl ReallocationAction {
    pub fn for_line(line: &DemandLine) -> Self {
        if line.source_str() == "-" {
            ReallocationAction::CanReallocate
        } else {
            ReallocationAction::NeedsApproval
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReallocationAction::CanReallocate => "Can Reallocate",
            ReallocationAction::NeedsApproval => "Needs Approval",
        }
    }
}

/// Release verdict for the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AllClear,
    AlmostReady,
    NotReady,
}

impl Verdict {
    pub fn assess(blockers: usize, fulfillment_pct: f64) -> Self {
        if blockers == 0 && fulfillment_pct >= 100.0 {
            Verdict::AllClear
        } else if blockers <= 3 && fulfillment_pct >= 90.0 {
            Verdict::AlmostReady
        } else {
            Verdict::NotReady
        }
    }

    pub fn message(&self, blockers: usize) -> String {
        match self {
            Verdict::AllClear => "ALL CLEAR! Ready to push to production".to_string(),
            Verdict::AlmostReady => {
                format!("ALMOST READY: clear {} blocking items to proceed", blockers)
            }
            Verdict::NotReady => format!("NOT READY: {} critical blockers need resolution", blockers),
        }
    }
}

/// Bucketed view of the selected lines
#[derive(Debug, Clone, Serialize)]
pub struct ProductionBlockers<'a> {
    pub selection: Selection,
    pub total_items: usize,
    pub fulfillment_pct: f64,
    pub qc: Vec<&'a DemandLine>,
    pub gr_pending: Vec<&'a DemandLine>,
    pub wip: Vec<&'a DemandLine>,
    pub reallocation: Vec<&'a DemandLine>,
    pub missing: Vec<&'a DemandLine>,
}

impl<'a> ProductionBlockers<'a> {
    pub fn bucket(&self, bucket: Bucket) -> &[&'a DemandLine] {
        match bucket {
            Bucket::Qc => &self.qc,
            Bucket::GrPending => &self.gr_pending,
            Bucket::Wip => &self.wip,
            Bucket::Reallocation => &self.reallocation,
            Bucket::Missing => &self.missing,
        }
    }

    /// Lines counted against the release: QC + GR + missing
    pub fn blocker_count(&self) -> usize {
        Bucket::ALL
            .iter()
            .filter(|b| b.is_blocking())
            .map(|b| self.bucket(*b).len())
            .sum()
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::assess(self.blocker_count(), self.fulfillment_pct)
    }

    /// Category and count of every bucket, in bucket order
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        Bucket::ALL
            .iter()
            .map(|b| (b.category(), self.bucket(*b).len()))
            .collect()
    }

    /// Display table of one bucket
    pub fn sheet(&self, bucket: Bucket, study: &StudyTable) -> SheetTable {
        SheetTable::build(bucket.sheet_name(), study, self.bucket(bucket), bucket.fields())
    }
}

/// Bucket the lines selected by `selection`
pub fn production_blockers<'a>(
    table: &'a StudyTable,
    selection: Selection,
    rules: &BlockerRules,
) -> ProductionBlockers<'a> {
    let lines = selection.lines(table);

    let total_req: f64 = lines.iter().map(|l| l.req_qty).sum();
    let total_allocated: f64 = lines.iter().map(|l| l.allocated_qty).sum();

    let qc = pick(&lines, |l| l.supply_type == SupplyType::QcHold);
    let gr_pending = pick(&lines, |l| l.supply_type == SupplyType::GrInProcess);
    let wip = pick(&lines, |l| l.locater.as_deref() == Some(rules.wip_locater.as_str()));
    let reallocation = pick(&lines, |l| {
        l.supply_type == SupplyType::Inventory
            && l.source_str() != rules.free_stock
            && !selection.contains(l.source_str())
    });
    let missing = pick(&lines, |l| l.balance > 0.0 && l.allocated_qty == 0.0);

    ProductionBlockers {
        total_items: lines.len(),
        fulfillment_pct: fulfillment_pct(total_allocated, total_req),
        selection,
        qc,
        gr_pending,
        wip,
        reallocation,
        missing,
    }
}

fn pick<'a>(lines: &[&'a DemandLine], pred: impl Fn(&DemandLine) -> bool) -> Vec<&'a DemandLine> {
    lines.iter().copied().filter(|l| pred(l)).collect()
}
