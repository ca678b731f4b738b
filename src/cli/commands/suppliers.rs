//! `mstudy suppliers` command - Supplier delay ranking

use miette::Result;

use crate::analysis::{delayed_lines_for, supplier_performance, FieldDef, SheetTable};
use crate::cli::commands::utils::{print_info, print_json, print_title, StudyContext};
use crate::cli::table::{output_sheet, CellValue, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Column;

#[derive(clap::Args, Debug)]
pub struct SuppliersArgs {
    /// Show the delayed lines of one supplier
    #[arg(long, short = 's')]
    pub supplier: Option<String>,
}

const DELAYED_FIELDS: &[FieldDef] = &[
    FieldDef::col("SEC order", Column::SecOrder),
    FieldDef::col("Item", Column::Item),
    FieldDef::col("Description", Column::Description),
    FieldDef::col("Allocated", Column::AllocatedQty),
    FieldDef::col("Delay", Column::Delay),
    FieldDef::col("Availability", Column::AvailabilityDate),
    FieldDef::col("ASN Expected", Column::AsnExpectedDate),
];

pub fn run(args: SuppliersArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = StudyContext::load(global)?;

    if !ctx.table.has(Column::Supplier) {
        return Err(miette::miette!(
            help = "Add a 'supplier' column to the study to rank suppliers",
            "The study has no supplier column"
        ));
    }

    match args.supplier {
        Some(name) => show_supplier(&ctx, &name),
        None => rank_suppliers(&ctx),
    }
}

fn rank_suppliers(ctx: &StudyContext) -> Result<()> {
    let stats = supplier_performance(&ctx.table);

    if ctx.format == OutputFormat::Json {
        return print_json(&stats);
    }
    if ctx.is_report() {
        print_title("Supplier Delay Performance");
        ctx.print_source();
        println!();
        if stats.is_empty() {
            print_info("No supplier delay data available");
            return Ok(());
        }
    }

    let headers = ["Supplier", "Delayed", "Late", "Avg Delay", "Max Delay", "Qty Delayed"];
    let rows: Vec<Vec<CellValue>> = stats
        .iter()
        .map(|s| {
            vec![
                CellValue::Key(s.supplier.clone()),
                CellValue::Count(s.delayed_items),
                CellValue::Count(s.late_items),
                s.avg_delay_days.map_or(CellValue::Empty, CellValue::Qty),
                s.max_delay_days.map_or(CellValue::Empty, CellValue::Qty),
                CellValue::Qty(s.total_qty_delayed),
            ]
        })
        .collect();
    TableFormatter::new(&headers, "supplier").output(&rows, ctx.format);
    Ok(())
}

fn show_supplier(ctx: &StudyContext, name: &str) -> Result<()> {
    let lines = delayed_lines_for(&ctx.table, name);

    if ctx.format == OutputFormat::Json {
        return print_json(&lines);
    }
    if ctx.is_report() {
        print_title(&format!("Delayed Lines: {}", name));
        ctx.print_source();
        println!();
        if lines.is_empty() {
            print_info(&format!("No delayed lines for supplier '{}'", name));
            return Ok(());
        }
    }

    let sheet = SheetTable::build(name, &ctx.table, &lines, DELAYED_FIELDS);
    output_sheet(&sheet, "delayed line", ctx.format);
    Ok(())
}
