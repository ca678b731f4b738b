//! `mstudy project` command - Material status of one project

use console::style;
use miette::Result;

use crate::analysis::{
    project_issues, project_status, Field, FieldDef, ProjectStatus, SheetTable, Status,
};
use crate::cli::commands::utils::{
    kv_table, print_failure, print_json, print_metric, print_section, print_success, print_title,
    StudyContext,
};
use crate::cli::helpers::{format_date, format_pct, format_qty};
use crate::cli::table::{output_sheet, CellValue, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Column;
use crate::entities::demand::DemandLine;

#[derive(clap::Args, Debug)]
pub struct ProjectArgs {
    /// Project identifier (SEC order)
    #[arg(required_unless_present = "list")]
    pub sec_order: Option<String>,

    /// List every project with its status
    #[arg(long, short = 'l')]
    pub list: bool,
}

const LINE_FIELDS: &[FieldDef] = &[
    FieldDef::col("Item", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Required", Column::ReqQty),
    FieldDef::col("Allocated", Column::AllocatedQty),
    FieldDef::col("Balance", Column::Balance),
    FieldDef::col("Supply Type", Column::SupplyType),
    FieldDef::col("Source", Column::Source),
    FieldDef::col("Supplier", Column::Supplier),
    FieldDef::col("Delay", Column::Delay),
    FieldDef::derived("Status", Field::Status),
];

pub fn run(args: ProjectArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = StudyContext::load(global)?;

    match args.sec_order {
        Some(id) if !args.list => show_project(&ctx, &id),
        _ => list_projects(&ctx),
    }
}

fn list_projects(ctx: &StudyContext) -> Result<()> {
    let statuses: Vec<ProjectStatus> = ctx
        .table
        .project_ids()
        .into_iter()
        .filter_map(|p| project_status(&ctx.table, p))
        .collect();

    if ctx.format == OutputFormat::Json {
        return print_json(&statuses);
    }

    let headers = ["SEC order", "Status", "Items", "Fulfillment", "Missing", "Balance", "SEC delivery"];
    let rows: Vec<Vec<CellValue>> = statuses
        .iter()
        .map(|s| {
            vec![
                CellValue::Key(s.project.clone()),
                CellValue::Status(s.status),
                CellValue::Count(s.total_items),
                CellValue::Pct(s.fulfillment_pct),
                CellValue::Count(s.missing_items),
                CellValue::Qty(s.total_balance),
                CellValue::opt_date(s.sec_delivery),
            ]
        })
        .collect();
    TableFormatter::new(&headers, "project").output(&rows, ctx.format);
    Ok(())
}

fn show_project(ctx: &StudyContext, id: &str) -> Result<()> {
    let Some(status) = project_status(&ctx.table, id) else {
        return Err(miette::miette!(
            help = "Run 'mstudy project --list' to see the projects in the study",
            "Project '{}' not found in study",
            id
        ));
    };
    let issues = project_issues(&ctx.table, &status);
    let lines: Vec<&DemandLine> = ctx.table.for_project(id).collect();
    let sheet = SheetTable::build(id, &ctx.table, &lines, LINE_FIELDS);

    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": status,
            "issues": issues.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
            "lines": lines,
        })),
        OutputFormat::Auto => {
            print_title(&format!("Project {}", id));
            ctx.print_source();
            println!();

            let styled_status = match status.status {
                Status::Ready => style(status.status.to_string()).green().bold(),
                Status::Partial => style(status.status.to_string()).yellow().bold(),
                Status::Critical => style(status.status.to_string()).red().bold(),
            };
            print_metric("Status", styled_status);
            print_metric("Fulfillment", format_pct(status.fulfillment_pct));
            print_metric(
                "Items",
                format!(
                    "{} ({} ready, {} partial, {} missing)",
                    status.total_items, status.ready_items, status.partial_items, status.missing_items
                ),
            );
            print_metric("Required", format_qty(status.total_req));
            print_metric("Allocated", format_qty(status.total_allocated));
            print_metric("Balance", format_qty(status.total_balance));
            print_metric("Max delay", status.max_delay);
            if ctx.table.has(Column::SecDelivery) {
                print_metric("SEC delivery", format_date(status.sec_delivery));
            }
            if ctx.table.has(Column::RohDelivery) {
                print_metric("ROH delivery", format_date(status.roh_delivery));
            }

            print_section("Supply Breakdown");
            println!(
                "{}",
                kv_table(
                    ["Supply Type", "Allocated"],
                    status
                        .supply_breakdown
                        .iter()
                        .map(|(k, v)| (k.as_str(), format_qty(*v))),
                )
            );

            print_section("Blocking Issues");
            if issues.is_empty() {
                print_success("No blocking issues");
            } else {
                for issue in &issues {
                    print_failure(&issue.to_string());
                }
            }

            print_section("Line Items");
            output_sheet(&sheet, "line", OutputFormat::Tsv);
            Ok(())
        }
        format => {
            output_sheet(&sheet, "line", format);
            Ok(())
        }
    }
}
