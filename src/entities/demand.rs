//! Demand line - one row of the Material Study sheet

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Where the allocated quantity of a demand line comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// On-hand inventory
    Inventory,
    /// Open purchase order
    PurchaseOrder,
    /// Purchase requisition (no order placed yet)
    PurchaseRequisition,
    /// Received, held for quality inspection
    QcHold,
    /// Received, goods receipt not yet posted
    GrInProcess,
    /// Any other label, kept verbatim
    Other(String),
}

impl SupplyType {
    /// Label as it appears in the study sheet
    pub fn label(&self) -> &str {
        match self {
            SupplyType::Inventory => "inventory",
            SupplyType::PurchaseOrder => "PO",
            SupplyType::PurchaseRequisition => "PR",
            SupplyType::QcHold => "QC",
            SupplyType::GrInProcess => "GR_in_process",
            SupplyType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for SupplyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for SupplyType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed {
            "inventory" => SupplyType::Inventory,
            "PO" => SupplyType::PurchaseOrder,
            "PR" => SupplyType::PurchaseRequisition,
            "QC" => SupplyType::QcHold,
            "GR_in_process" => SupplyType::GrInProcess,
            other => SupplyType::Other(other.to_string()),
        })
    }
}

/// How late a demand line's supply is
///
/// The study sheet mixes day counts with a textual `late` marker for supply
/// that is known to be late without a quantified date. Both are kept apart
/// here instead of overloading a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "days")]
pub enum Delay {
    /// Zero or blank
    #[default]
    OnTime,
    /// Quantified number of days late
    Days(f64),
    /// Known late, unquantified
    Late,
}

impl Delay {
    pub fn is_delayed(&self) -> bool {
        !matches!(self, Delay::OnTime)
    }

    pub fn is_late(&self) -> bool {
        matches!(self, Delay::Late)
    }

    /// Day count, if the delay is quantified
    pub fn days(&self) -> Option<f64> {
        match self {
            Delay::Days(d) => Some(*d),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Delay::OnTime => 0,
            Delay::Days(_) => 1,
            Delay::Late => 2,
        }
    }
}

// OnTime < Days(n) < Late; day counts compare numerically.
impl PartialOrd for Delay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Delay::Days(a), Delay::Days(b)) => a.partial_cmp(b),
            _ => Some(self.rank().cmp(&other.rank())),
        }
    }
}

impl std::fmt::Display for Delay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delay::OnTime => write!(f, "0"),
            Delay::Days(d) if d.fract() == 0.0 => write!(f, "{:.0} days", d),
            Delay::Days(d) => write!(f, "{:.1} days", d),
            Delay::Late => write!(f, "late"),
        }
    }
}

impl std::str::FromStr for Delay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Delay::OnTime);
        }
        if trimmed.eq_ignore_ascii_case("late") {
            return Ok(Delay::Late);
        }
        match trimmed.parse::<f64>() {
            Ok(d) if d == 0.0 => Ok(Delay::OnTime),
            Ok(d) if d.is_finite() => Ok(Delay::Days(d)),
            _ => Err(format!(
                "Invalid delay: {}. Use a number of days or 'late'",
                s
            )),
        }
    }
}

/// Fulfillment state of a single demand line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Ready,
    Partial,
    Missing,
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineStatus::Ready => write!(f, "ready"),
            LineStatus::Partial => write!(f, "partial"),
            LineStatus::Missing => write!(f, "missing"),
        }
    }
}

/// One demand line of the study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandLine {
    /// Project / order identifier (`SEC order`)
    pub sec_order: String,

    /// Project number (`SEC Number`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sec_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,

    /// Item code
    pub item: String,

    #[serde(default)]
    pub description: String,

    pub req_qty: f64,
    pub allocated_qty: f64,
    pub balance: f64,

    pub supply_type: SupplyType,

    /// Source job, project or stock pool the allocation comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Storage location code (PO-line for received material)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locater: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(default)]
    pub delay: Delay,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_date: Option<NaiveDate>,

    /// Required-on-hand date (`ROH delivery`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roh_delivery: Option<NaiveDate>,

    /// Scheduled project delivery (`SEC delivery`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sec_delivery: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_expected_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_creation_date: Option<NaiveDate>,
}

impl DemandLine {
    /// Create a line with the quantity fields set and everything else empty
    pub fn new(
        sec_order: impl Into<String>,
        item: impl Into<String>,
        req_qty: f64,
        allocated_qty: f64,
        supply_type: SupplyType,
    ) -> Self {
        Self {
            sec_order: sec_order.into(),
            sec_number: None,
            product: None,
            item: item.into(),
            description: String::new(),
            req_qty,
            allocated_qty,
            balance: req_qty - allocated_qty,
            supply_type,
            source: None,
            locater: None,
            supplier: None,
            delay: Delay::OnTime,
            availability_date: None,
            roh_delivery: None,
            sec_delivery: None,
            asn_expected_date: None,
            asn_creation_date: None,
        }
    }

    /// Ready when nothing is outstanding, Missing when nothing is allocated,
    /// Partial otherwise.
    pub fn status(&self) -> LineStatus {
        if self.balance == 0.0 {
            LineStatus::Ready
        } else if self.allocated_qty == 0.0 {
            LineStatus::Missing
        } else {
            LineStatus::Partial
        }
    }

    pub fn source_str(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }

    pub fn locater_str(&self) -> &str {
        self.locater.as_deref().unwrap_or("")
    }

    pub fn with_sec_number(mut self, number: impl Into<String>) -> Self {
        self.sec_number = Some(number.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_locater(mut self, locater: impl Into<String>) -> Self {
        self.locater = Some(locater.into());
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_sec_delivery(mut self, date: NaiveDate) -> Self {
        self.sec_delivery = Some(date);
        self
    }

    pub fn with_roh_delivery(mut self, date: NaiveDate) -> Self {
        self.roh_delivery = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_type_roundtrip_labels() {
        for label in ["inventory", "PO", "PR", "QC", "GR_in_process"] {
            let st: SupplyType = label.parse().unwrap();
            assert_eq!(st.to_string(), label);
            assert!(!matches!(st, SupplyType::Other(_)));
        }
    }

    #[test]
    fn test_supply_type_other_kept_verbatim() {
        let st: SupplyType = " WO ".parse().unwrap();
        assert_eq!(st, SupplyType::Other("WO".to_string()));
        assert_eq!(st.label(), "WO");
    }

    #[test]
    fn test_delay_parse() {
        assert_eq!("".parse::<Delay>().unwrap(), Delay::OnTime);
        assert_eq!("0".parse::<Delay>().unwrap(), Delay::OnTime);
        assert_eq!("0.0".parse::<Delay>().unwrap(), Delay::OnTime);
        assert_eq!("12".parse::<Delay>().unwrap(), Delay::Days(12.0));
        assert_eq!("late".parse::<Delay>().unwrap(), Delay::Late);
        assert_eq!("LATE".parse::<Delay>().unwrap(), Delay::Late);
        assert!("soon".parse::<Delay>().is_err());
    }

    #[test]
    fn test_delay_ordering() {
        assert!(Delay::OnTime < Delay::Days(1.0));
        assert!(Delay::Days(1.0) < Delay::Days(30.0));
        assert!(Delay::Days(365.0) < Delay::Late);
        assert!(Delay::OnTime < Delay::Late);
    }

    #[test]
    fn test_delay_display() {
        assert_eq!(Delay::Days(5.0).to_string(), "5 days");
        assert_eq!(Delay::Days(2.5).to_string(), "2.5 days");
        assert_eq!(Delay::Late.to_string(), "late");
    }

    #[test]
    fn test_line_status() {
        let ready = DemandLine::new("P1", "A", 10.0, 10.0, SupplyType::Inventory);
        assert_eq!(ready.status(), LineStatus::Ready);

        let partial = DemandLine::new("P1", "B", 10.0, 4.0, SupplyType::PurchaseOrder);
        assert_eq!(partial.status(), LineStatus::Partial);

        let missing = DemandLine::new("P1", "C", 5.0, 0.0, SupplyType::PurchaseRequisition);
        assert_eq!(missing.status(), LineStatus::Missing);
    }

    #[test]
    fn test_zero_requirement_line_is_ready() {
        let line = DemandLine::new("P1", "D", 0.0, 0.0, SupplyType::Inventory);
        assert_eq!(line.status(), LineStatus::Ready);
    }
}
