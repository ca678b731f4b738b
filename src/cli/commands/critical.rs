//! `mstudy critical` command - Critical projects by delivery urgency

use chrono::Local;
use miette::Result;

use crate::analysis::{critical_projects, problem_lines, Field, FieldDef, SheetTable};
use crate::cli::commands::utils::{print_json, print_success, print_title, StudyContext};
use crate::cli::table::{output_sheet, CellValue, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Column;

#[derive(clap::Args, Debug)]
pub struct CriticalArgs {
    /// Show the problem lines of one project
    #[arg(long, short = 'p')]
    pub project: Option<String>,
}

const PROBLEM_FIELDS: &[FieldDef] = &[
    FieldDef::col("Item", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Required", Column::ReqQty),
    FieldDef::col("Allocated", Column::AllocatedQty),
    FieldDef::col("Balance", Column::Balance),
    FieldDef::col("Supply Type", Column::SupplyType),
    FieldDef::col("Supplier", Column::Supplier),
    FieldDef::col("Delay", Column::Delay),
    FieldDef::derived("Status", Field::Status),
];

pub fn run(args: CriticalArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = StudyContext::load(global)?;

    if let Some(project) = args.project {
        return show_problems(&ctx, &project);
    }

    let today = Local::now().date_naive();
    let projects = critical_projects(&ctx.table, today);

    if ctx.format == OutputFormat::Json {
        return print_json(&projects);
    }
    if ctx.is_report() {
        print_title("Critical Projects");
        ctx.print_source();
        println!();
        if projects.is_empty() {
            print_success("No critical projects! Everything is on track.");
            return Ok(());
        }
    }

    let headers = ["SEC order", "Missing", "Items", "Fulfillment", "Max Delay", "SEC delivery", "Due"];
    let rows: Vec<Vec<CellValue>> = projects
        .iter()
        .map(|p| {
            vec![
                CellValue::Key(p.project.clone()),
                CellValue::Count(p.missing_items),
                CellValue::Count(p.total_items),
                CellValue::Pct(p.fulfillment_pct),
                CellValue::Delay(p.max_delay),
                CellValue::opt_date(p.sec_delivery),
                CellValue::Countdown(p.days_to_delivery),
            ]
        })
        .collect();
    TableFormatter::new(&headers, "critical project").output(&rows, ctx.format);
    Ok(())
}

fn show_problems(ctx: &StudyContext, project: &str) -> Result<()> {
    if ctx.table.for_project(project).next().is_none() {
        return Err(miette::miette!(
            help = "Run 'mstudy critical' to list critical projects",
            "Project '{}' not found in study",
            project
        ));
    }
    let lines = problem_lines(&ctx.table, project);

    if ctx.format == OutputFormat::Json {
        return print_json(&lines);
    }
    if ctx.is_report() {
        print_title(&format!("Problem Lines: {}", project));
        ctx.print_source();
        println!();
        if lines.is_empty() {
            print_success("No outstanding or delayed lines");
            return Ok(());
        }
    }

    let sheet = SheetTable::build(project, &ctx.table, &lines, PROBLEM_FIELDS);
    output_sheet(&sheet, "problem line", ctx.format);
    Ok(())
}
