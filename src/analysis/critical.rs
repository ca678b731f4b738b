//! Critical projects and their problem lines

use chrono::NaiveDate;
use serde::Serialize;

use super::status::{project_status, Status};
use crate::core::StudyTable;
use crate::entities::demand::{Delay, DemandLine};

/// A project in Critical status with its delivery countdown
#[derive(Debug, Clone, Serialize)]
pub struct CriticalProject {
    pub project: String,
    pub missing_items: usize,
    pub total_items: usize,
    pub fulfillment_pct: f64,
    pub max_delay: Delay,
    pub sec_delivery: Option<NaiveDate>,
    /// Days from `today` to delivery; negative when already overdue
    pub days_to_delivery: Option<i64>,
}

/// Critical projects, nearest delivery first, then most missing items
pub fn critical_projects(table: &StudyTable, today: NaiveDate) -> Vec<CriticalProject> {
    let mut projects: Vec<CriticalProject> = table
        .project_ids()
        .into_iter()
        .filter_map(|p| project_status(table, p))
        .filter(|s| s.status == Status::Critical)
        .map(|s| CriticalProject {
            days_to_delivery: s.sec_delivery.map(|d| (d - today).num_days()),
            project: s.project,
            missing_items: s.missing_items,
            total_items: s.total_items,
            fulfillment_pct: s.fulfillment_pct,
            max_delay: s.max_delay,
            sec_delivery: s.sec_delivery,
        })
        .collect();

    projects.sort_by(|a, b| {
        let days = match (a.days_to_delivery, b.days_to_delivery) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        days.then_with(|| b.missing_items.cmp(&a.missing_items))
    });
    projects
}

/// Lines of `project` with an outstanding balance or any delay
pub fn problem_lines<'a>(table: &'a StudyTable, project: &'a str) -> Vec<&'a DemandLine> {
    table
        .for_project(project)
        .filter(|l| l.balance > 0.0 || l.delay.is_delayed())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::demand::SupplyType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn missing(project: &str, item: &str) -> DemandLine {
        DemandLine::new(project, item, 5.0, 0.0, SupplyType::PurchaseRequisition)
    }

    #[test]
    fn test_only_critical_sorted_by_days_then_missing() {
        let today = date(2024, 6, 1);
        let table = StudyTable::from_lines(vec![
            missing("FAR", "A").with_sec_delivery(date(2024, 7, 1)),
            missing("NEAR", "A").with_sec_delivery(date(2024, 6, 11)),
            missing("NODATE", "A"),
            missing("NEAR2", "A").with_sec_delivery(date(2024, 6, 11)),
            missing("NEAR2", "B"),
            DemandLine::new("OK", "A", 5.0, 5.0, SupplyType::Inventory),
        ]);
        let crit = critical_projects(&table, today);
        let order: Vec<&str> = crit.iter().map(|c| c.project.as_str()).collect();

        assert_eq!(order, vec!["NEAR2", "NEAR", "FAR", "NODATE"]);
        assert_eq!(crit[0].days_to_delivery, Some(10));
        assert_eq!(crit[0].missing_items, 2);
        assert_eq!(crit[3].days_to_delivery, None);
    }

    #[test]
    fn test_overdue_is_negative() {
        let table = StudyTable::from_lines(vec![missing("P1", "A").with_sec_delivery(date(2024, 5, 30))]);
        let crit = critical_projects(&table, date(2024, 6, 1));
        assert_eq!(crit[0].days_to_delivery, Some(-2));
    }

    #[test]
    fn test_problem_lines() {
        let table = StudyTable::from_lines(vec![
            DemandLine::new("P1", "A", 5.0, 5.0, SupplyType::Inventory),
            DemandLine::new("P1", "B", 5.0, 5.0, SupplyType::PurchaseOrder).with_delay(Delay::Days(2.0)),
            missing("P1", "C"),
            missing("P2", "D"),
        ]);
        let items: Vec<&str> = problem_lines(&table, "P1").iter().map(|l| l.item.as_str()).collect();
        assert_eq!(items, vec!["B", "C"]);
    }
}
