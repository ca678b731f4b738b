//! Supplier delay ranking

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::core::StudyTable;
use crate::entities::demand::DemandLine;

/// Delay statistics of one supplier over its delayed lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierStats {
    pub supplier: String,
    /// Lines with any delay, quantified or not
    pub delayed_items: usize,
    /// Lines marked late without a day count
    pub late_items: usize,
    /// Mean over quantified delays; `None` when every delay is unquantified
    pub avg_delay_days: Option<f64>,
    pub max_delay_days: Option<f64>,
    pub total_qty_delayed: f64,
}

/// Suppliers with at least one delayed line, worst average first
///
/// Suppliers whose delays are all unquantified sort after every supplier
/// with a day count.
pub fn supplier_performance(table: &StudyTable) -> Vec<SupplierStats> {
    let mut groups: BTreeMap<&str, Vec<&DemandLine>> = BTreeMap::new();
    for line in table.lines() {
        if let Some(supplier) = line.supplier.as_deref() {
            if line.delay.is_delayed() {
                groups.entry(supplier).or_default().push(line);
            }
        }
    }

    let mut stats: Vec<SupplierStats> = groups
        .into_iter()
        .map(|(supplier, lines)| {
            let days: Vec<f64> = lines.iter().filter_map(|l| l.delay.days()).collect();
            let avg = (!days.is_empty()).then(|| days.iter().sum::<f64>() / days.len() as f64);
            let max = days.iter().copied().reduce(f64::max);
            SupplierStats {
                supplier: supplier.to_string(),
                delayed_items: lines.len(),
                late_items: lines.iter().filter(|l| l.delay.is_late()).count(),
                avg_delay_days: avg,
                max_delay_days: max,
                total_qty_delayed: lines.iter().map(|l| l.allocated_qty).sum(),
            }
        })
        .collect();

    stats.sort_by(|a, b| match (a.avg_delay_days, b.avg_delay_days) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    stats
}

/// Delayed lines of one supplier, in study order
pub fn delayed_lines_for<'a>(table: &'a StudyTable, supplier: &str) -> Vec<&'a DemandLine> {
    table
        .lines()
        .iter()
        .filter(|l| l.supplier.as_deref() == Some(supplier) && l.delay.is_delayed())
        .collect()
}
