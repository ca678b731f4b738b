//! `mstudy readiness` command - Projects ranked by fulfillment

use console::style;
use miette::Result;

use crate::analysis::{production_readiness, ReadinessFilter, ReadinessRow};
use crate::cli::commands::utils::{print_info, print_json, print_title, StudyContext};
use crate::cli::table::{CellValue, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct ReadinessArgs {
    /// Show projects at or above this fulfillment percentage (default: only 100%)
    #[arg(long, value_parser = parse_pct)]
    pub min: Option<f64>,
}

fn parse_pct(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{}' is not a percentage", s))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0-100", value))
    }
}

pub fn run(args: ReadinessArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = StudyContext::load(global)?;

    let filter = args
        .min
        .map_or(ReadinessFilter::FullyReady, ReadinessFilter::AtLeast);
    let all = production_readiness(&ctx.table);
    let ready_count = all.iter().filter(|r| r.is_fully_ready()).count();
    let rows: Vec<&ReadinessRow> = all.iter().filter(|r| filter.keeps(r)).collect();

    if ctx.format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "ready_count": ready_count,
            "projects": rows,
        }));
    }
    if ctx.is_report() {
        print_title("Production Readiness");
        ctx.print_source();
        println!();
        if rows.is_empty() {
            print_info("No projects match the readiness threshold");
            return Ok(());
        }
    }

    let headers = ["SEC order", "Status", "Fulfillment", "Missing", "Max Delay", "SEC delivery"];
    let cells: Vec<Vec<CellValue>> = rows
        .iter()
        .map(|r| {
            vec![
                CellValue::Key(r.project.clone()),
                CellValue::Status(r.status),
                CellValue::Pct(r.fulfillment_pct),
                CellValue::Count(r.missing_items),
                CellValue::Delay(r.max_delay),
                CellValue::opt_date(r.sec_delivery),
            ]
        })
        .collect();
    TableFormatter::new(&headers, "project").output(&cells, ctx.format);

    if ctx.is_report() {
        println!(
            "{} {} projects ready to start production",
            style("✓").green(),
            style(ready_count).green().bold()
        );
    }
    Ok(())
}
