//! Shared helper functions for CLI commands

use chrono::NaiveDate;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Quantity without a trailing `.0` for whole numbers
pub fn format_qty(q: f64) -> String {
    if q.fract() == 0.0 {
        format!("{:.0}", q)
    } else {
        format!("{:.2}", q)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

pub fn format_pct(p: f64) -> String {
    format!("{:.1}%", p)
}

pub fn format_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Days until a date: "in 5 days", "today", "3 days overdue"
pub fn format_countdown(days: Option<i64>) -> String {
    match days {
        None => "no date".to_string(),
        Some(0) => "today".to_string(),
        Some(1) => "in 1 day".to_string(),
        Some(d) if d > 0 => format!("in {} days", d),
        Some(-1) => "1 day overdue".to_string(),
        Some(d) => format!("{} days overdue", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a longer description", 10), "a longe...");
        assert_eq!(truncate_str("äöüäöüäöü", 6), "äöü...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_qty() {
        assert_eq!(format_qty(10.0), "10");
        assert_eq!(format_qty(2.5), "2.5");
        assert_eq!(format_qty(0.126), "0.13");
        assert_eq!(format_qty(-3.0), "-3");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(None), "no date");
        assert_eq!(format_countdown(Some(0)), "today");
        assert_eq!(format_countdown(Some(12)), "in 12 days");
        assert_eq!(format_countdown(Some(-4)), "4 days overdue");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 3, 9)), "2024-03-09");
        assert_eq!(format_date(None), "-");
    }
}
