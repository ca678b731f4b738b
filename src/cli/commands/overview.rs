//! `mstudy overview` command - Dashboard of the whole study

use console::style;
use miette::Result;

use crate::analysis::{dashboard_overview, FieldDef, SheetTable};
use crate::cli::commands::utils::{
    kv_table, print_json, print_metric, print_section, print_success, print_title, StudyContext,
};
use crate::cli::helpers::{format_pct, format_qty};
use crate::cli::table::{output_sheet, CellValue, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Column;

#[derive(clap::Args, Debug)]
pub struct OverviewArgs {
    /// Number of delayed lines to list
    #[arg(long, default_value_t = 10)]
    pub delayed: usize,
}

const DELAYED_FIELDS: &[FieldDef] = &[
    FieldDef::col("SEC order", Column::SecOrder),
    FieldDef::col("Item", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Supply Type", Column::SupplyType),
    FieldDef::col("Supplier", Column::Supplier),
    FieldDef::col("Delay", Column::Delay),
    FieldDef::col("Availability", Column::AvailabilityDate),
];

pub fn run(args: OverviewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = StudyContext::load(global)?;
    let overview = dashboard_overview(&ctx.table, args.delayed);

    match ctx.format {
        OutputFormat::Json => print_json(&overview),
        OutputFormat::Auto => {
            print_title("Material Study Overview");
            ctx.print_source();
            println!();

            print_metric("Projects", style(overview.total_projects).cyan());
            print_metric("Line items", overview.total_items);
            print_metric("Fulfillment", format_pct(overview.fulfillment_pct));
            print_metric("Total balance", format_qty(overview.total_balance));

            print_section("Project Status");
            print_metric("Ready", style(overview.ready_projects).green());
            print_metric("Partial", style(overview.partial_projects).yellow());
            print_metric("Critical", style(overview.critical_projects).red().bold());

            print_section("Supply Allocation");
            println!(
                "{}",
                kv_table(
                    ["Supply Type", "Allocated"],
                    overview
                        .supply_breakdown
                        .iter()
                        .map(|(k, v)| (k.as_str(), format_qty(*v))),
                )
            );

            if overview.delayed.is_empty() {
                println!();
                print_success("No delayed items!");
            } else {
                print_section(&format!(
                    "Delayed Items (showing {} of {})",
                    overview.delayed.len(),
                    overview.delayed_count
                ));
                let sheet = SheetTable::build("Delayed", &ctx.table, &overview.delayed, DELAYED_FIELDS);
                output_sheet(&sheet, "delayed line", OutputFormat::Tsv);
            }
            Ok(())
        }
        format => {
            let headers = ["Metric", "Value"];
            let rows = vec![
                vec![CellValue::text("projects"), CellValue::Count(overview.total_projects)],
                vec![CellValue::text("line_items"), CellValue::Count(overview.total_items)],
                vec![CellValue::text("fulfillment_pct"), CellValue::Pct(overview.fulfillment_pct)],
                vec![CellValue::text("total_balance"), CellValue::Qty(overview.total_balance)],
                vec![CellValue::text("ready_projects"), CellValue::Count(overview.ready_projects)],
                vec![CellValue::text("partial_projects"), CellValue::Count(overview.partial_projects)],
                vec![CellValue::text("critical_projects"), CellValue::Count(overview.critical_projects)],
                vec![CellValue::text("delayed_items"), CellValue::Count(overview.delayed_count)],
            ];
            TableFormatter::new(&headers, "metric")
                .without_summary()
                .output(&rows, format);
            Ok(())
        }
    }
}
