//! Tabular projection of demand lines
//!
//! Views pick demand-line fields under display headers. Fields backed by a
//! column the study did not carry are dropped, so a sparse study narrows a
//! table instead of failing it. The same projection feeds terminal output
//! and workbook export.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::study::{Column, StudyTable};
use crate::entities::demand::{Delay, DemandLine, LineStatus};

/// What a sheet column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// A study column, as loaded
    Col(Column),
    /// Derived per-line status
    Status,
    /// Derived reallocation action
    Action,
}

/// Header plus field of one sheet column
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub header: &'static str,
    pub field: Field,
}

impl FieldDef {
    pub const fn col(header: &'static str, column: Column) -> Self {
        Self {
            header,
            field: Field::Col(column),
        }
    }

    pub const fn derived(header: &'static str, field: Field) -> Self {
        Self { header, field }
    }
}

/// A typed cell of a sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SheetCell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Delay(Delay),
    Status(LineStatus),
    Empty,
}

/// Named table ready for display or export
#[derive(Debug, Clone, Serialize)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<SheetCell>>,
}

impl SheetTable {
    /// Project `lines` onto the fields the study can supply
    pub fn build(
        name: impl Into<String>,
        study: &StudyTable,
        lines: &[&DemandLine],
        fields: &[FieldDef],
    ) -> Self {
        let shown: Vec<&FieldDef> = fields
            .iter()
            .filter(|f| match f.field {
                Field::Col(c) => study.has(c),
                Field::Status => true,
                Field::Action => study.has(Column::Source),
            })
            .collect();

        Self {
            name: name.into(),
            headers: shown.iter().map(|f| f.header).collect(),
            rows: lines
                .iter()
                .map(|line| shown.iter().map(|f| field_cell(line, f.field)).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn text(value: &str) -> SheetCell {
    if value.is_empty() {
        SheetCell::Empty
    } else {
        SheetCell::Text(value.to_string())
    }
}

fn opt_text(value: &Option<String>) -> SheetCell {
    value.as_deref().map_or(SheetCell::Empty, text)
}

fn date(value: Option<NaiveDate>) -> SheetCell {
    value.map_or(SheetCell::Empty, SheetCell::Date)
}

/// Cell for one field of a demand line
pub fn field_cell(line: &DemandLine, field: Field) -> SheetCell {
    match field {
        Field::Status => SheetCell::Status(line.status()),
        Field::Action => text(super::blockers::ReallocationAction::for_line(line).label()),
        Field::Col(column) => match column {
            Column::SecOrder => text(&line.sec_order),
            Column::SecNumber => opt_text(&line.sec_number),
            Column::Product => opt_text(&line.product),
            Column::Item => text(&line.item),
            Column::Description => text(&line.description),
            Column::ReqQty => SheetCell::Number(line.req_qty),
            Column::AllocatedQty => SheetCell::Number(line.allocated_qty),
            Column::Balance => SheetCell::Number(line.balance),
            Column::SupplyType => text(line.supply_type.label()),
            Column::Source => opt_text(&line.source),
            Column::Locater => opt_text(&line.locater),
            Column::Supplier => opt_text(&line.supplier),
            Column::Delay => SheetCell::Delay(line.delay),
            Column::AvailabilityDate => date(line.availability_date),
            Column::RohDelivery => date(line.roh_delivery),
            Column::SecDelivery => date(line.sec_delivery),
            Column::AsnExpectedDate => date(line.asn_expected_date),
            Column::AsnCreationDate => date(line.asn_creation_date),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::demand::SupplyType;

    const FIELDS: [FieldDef; 4] = [
        FieldDef::col("Item Code", Column::Item),
        FieldDef::col("Qty", Column::AllocatedQty),
        FieldDef::col("Supplier", Column::Supplier),
        FieldDef::derived("Status", Field::Status),
    ];

    #[test]
    fn test_build_drops_absent_columns() {
        let line = DemandLine::new("P1", "ITM1", 4.0, 4.0, SupplyType::Inventory);
        let study = StudyTable::new(vec![line.clone()], Column::REQUIRED);
        let sheet = SheetTable::build("x", &study, &[&line], &FIELDS);

        assert_eq!(sheet.headers, vec!["Item Code", "Qty", "Status"]);
        assert_eq!(
            sheet.rows[0],
            vec![
                SheetCell::Text("ITM1".into()),
                SheetCell::Number(4.0),
                SheetCell::Status(LineStatus::Ready)
            ]
        );
    }

    #[test]
    fn test_build_keeps_present_columns() {
        let line = DemandLine::new("P1", "ITM1", 4.0, 0.0, SupplyType::PurchaseOrder)
            .with_supplier("ACME");
        let study = StudyTable::from_lines(vec![line.clone()]);
        let sheet = SheetTable::build("x", &study, &[&line], &FIELDS);

        assert_eq!(sheet.headers.len(), 4);
        assert_eq!(sheet.rows[0][2], SheetCell::Text("ACME".into()));
        assert_eq!(sheet.rows[0][3], SheetCell::Status(LineStatus::Missing));
    }

    #[test]
    fn test_empty_optional_is_empty_cell() {
        let line = DemandLine::new("P1", "ITM1", 1.0, 1.0, SupplyType::Inventory);
        assert_eq!(field_cell(&line, Field::Col(Column::Locater)), SheetCell::Empty);
        assert_eq!(field_cell(&line, Field::Col(Column::SecDelivery)), SheetCell::Empty);
    }
}
