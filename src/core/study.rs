//! The loaded study table and its column set

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::entities::demand::DemandLine;

/// Known columns of the Material Study sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    SecOrder,
    SecNumber,
    Product,
    Item,
    Description,
    ReqQty,
    AllocatedQty,
    Balance,
    SupplyType,
    Source,
    Locater,
    Supplier,
    Delay,
    AvailabilityDate,
    RohDelivery,
    SecDelivery,
    AsnExpectedDate,
    AsnCreationDate,
}

impl Column {
    pub const ALL: [Column; 18] = [
        Column::SecOrder,
        Column::SecNumber,
        Column::Product,
        Column::Item,
        Column::Description,
        Column::ReqQty,
        Column::AllocatedQty,
        Column::Balance,
        Column::SupplyType,
        Column::Source,
        Column::Locater,
        Column::Supplier,
        Column::Delay,
        Column::AvailabilityDate,
        Column::RohDelivery,
        Column::SecDelivery,
        Column::AsnExpectedDate,
        Column::AsnCreationDate,
    ];

    /// Columns without which no view can be computed
    pub const REQUIRED: [Column; 6] = [
        Column::SecOrder,
        Column::Item,
        Column::ReqQty,
        Column::AllocatedQty,
        Column::Balance,
        Column::SupplyType,
    ];

    /// Header text in the study sheet
    pub fn header(&self) -> &'static str {
        match self {
            Column::SecOrder => "SEC order",
            Column::SecNumber => "SEC Number",
            Column::Product => "product",
            Column::Item => "item",
            Column::Description => "description",
            Column::ReqQty => "req_qty",
            Column::AllocatedQty => "allocated_qty",
            Column::Balance => "balance",
            Column::SupplyType => "supply_type",
            Column::Source => "source",
            Column::Locater => "locater",
            Column::Supplier => "supplier",
            Column::Delay => "delay",
            Column::AvailabilityDate => "availability_date",
            Column::RohDelivery => "ROH delivery",
            Column::SecDelivery => "SEC delivery",
            Column::AsnExpectedDate => "Asn Expected Date",
            Column::AsnCreationDate => "Asn Creation Date",
        }
    }

    /// Match a sheet header, ignoring case and surrounding whitespace
    pub fn from_header(header: &str) -> Option<Column> {
        let h = header.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.header().eq_ignore_ascii_case(h))
    }

    pub fn is_date(&self) -> bool {
        matches!(
            self,
            Column::AvailabilityDate
                | Column::RohDelivery
                | Column::SecDelivery
                | Column::AsnExpectedDate
                | Column::AsnCreationDate
        )
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// Immutable in-memory study: every view is computed from this
#[derive(Debug, Clone, Default)]
pub struct StudyTable {
    lines: Vec<DemandLine>,
    columns: BTreeSet<Column>,
    source: Option<PathBuf>,
}

impl StudyTable {
    pub fn new(lines: Vec<DemandLine>, columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            lines,
            columns: columns.into_iter().collect(),
            source: None,
        }
    }

    /// Table where every known column counts as present
    pub fn from_lines(lines: Vec<DemandLine>) -> Self {
        Self::new(lines, Column::ALL)
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn lines(&self) -> &[DemandLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the source carried this column
    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Distinct project identifiers in first-appearance order
    pub fn project_ids(&self) -> Vec<&str> {
        distinct(self.lines.iter().map(|l| l.sec_order.as_str()))
    }

    /// Distinct item codes, sorted
    pub fn item_codes(&self) -> Vec<&str> {
        let mut items = distinct(self.lines.iter().map(|l| l.item.as_str()));
        items.sort_unstable();
        items
    }

    pub fn for_project<'a>(&'a self, project: &'a str) -> impl Iterator<Item = &'a DemandLine> + 'a {
        self.lines.iter().filter(move |l| l.sec_order == project)
    }

    pub fn for_item<'a>(&'a self, item: &'a str) -> impl Iterator<Item = &'a DemandLine> + 'a {
        self.lines.iter().filter(move |l| l.item == item)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::demand::SupplyType;

    #[test]
    fn test_column_from_header() {
        assert_eq!(Column::from_header("SEC order"), Some(Column::SecOrder));
        assert_eq!(Column::from_header(" sec ORDER "), Some(Column::SecOrder));
        assert_eq!(Column::from_header("ROH delivery"), Some(Column::RohDelivery));
        assert_eq!(Column::from_header("unknown"), None);
    }

    #[test]
    fn test_every_column_header_resolves_to_itself() {
        for col in Column::ALL {
            assert_eq!(Column::from_header(col.header()), Some(col));
        }
    }

    #[test]
    fn test_project_ids_first_appearance() {
        let table = StudyTable::from_lines(vec![
            DemandLine::new("P2", "A", 1.0, 1.0, SupplyType::Inventory),
            DemandLine::new("P1", "B", 1.0, 1.0, SupplyType::Inventory),
            DemandLine::new("P2", "C", 1.0, 1.0, SupplyType::Inventory),
        ]);
        assert_eq!(table.project_ids(), vec!["P2", "P1"]);
        assert_eq!(table.item_codes(), vec!["A", "B", "C"]);
        assert_eq!(table.for_project("P2").count(), 2);
        assert_eq!(table.for_item("B").count(), 1);
    }
}
