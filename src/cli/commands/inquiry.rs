//! `mstudy inquiry` command - Where an item is allocated and what blocks it

use console::style;
use miette::Result;

use crate::analysis::{material_inquiry, FieldDef, SheetTable};
use crate::cli::commands::utils::{
    print_json, print_metric, print_section, print_success, print_title, StudyContext,
};
use crate::cli::helpers::format_qty;
use crate::cli::table::{output_sheet, CellValue, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Column;

#[derive(clap::Args, Debug)]
pub struct InquiryArgs {
    /// Item code
    pub item: String,
}

const LINE_FIELDS: &[FieldDef] = &[
    FieldDef::col("SEC order", Column::SecOrder),
    FieldDef::col("Supply Type", Column::SupplyType),
    FieldDef::col("Source", Column::Source),
    FieldDef::col("Locater", Column::Locater),
    FieldDef::col("Supplier", Column::Supplier),
    FieldDef::col("Required", Column::ReqQty),
    FieldDef::col("Allocated", Column::AllocatedQty),
    FieldDef::col("Balance", Column::Balance),
    FieldDef::col("Delay", Column::Delay),
    FieldDef::col("Availability", Column::AvailabilityDate),
];

pub fn run(args: InquiryArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = StudyContext::load(global)?;

    let Some(info) = material_inquiry(&ctx.table, &args.item) else {
        let known = ctx.table.item_codes();
        let hint = if known.is_empty() {
            "The study has no items".to_string()
        } else {
            let sample: Vec<&str> = known.iter().take(5).copied().collect();
            format!("Known items include: {}", sample.join(", "))
        };
        return Err(miette::miette!(help = hint, "Item '{}' not found in study", args.item));
    };

    let sheet = SheetTable::build(&info.item, &ctx.table, &info.lines, LINE_FIELDS);

    match ctx.format {
        OutputFormat::Json => print_json(&info),
        OutputFormat::Auto => {
            print_title(&format!("Material Inquiry: {}", info.item));
            ctx.print_source();
            println!();

            if !info.description.is_empty() {
                print_metric("Description", &info.description);
            }
            print_metric("Total required", format_qty(info.total_req));
            print_metric("Total allocated", format_qty(info.total_allocated));
            print_metric("Total balance", format_qty(info.total_balance));

            print_section("By Project");
            let headers = ["SEC order", "Required", "Allocated", "Balance"];
            let rows: Vec<Vec<CellValue>> = info
                .by_project
                .iter()
                .map(|p| {
                    vec![
                        CellValue::Key(p.project.clone()),
                        CellValue::Qty(p.req_qty),
                        CellValue::Qty(p.allocated_qty),
                        CellValue::Qty(p.balance),
                    ]
                })
                .collect();
            TableFormatter::new(&headers, "project")
                .without_summary()
                .output(&rows, OutputFormat::Tsv);

            print_section("By Source");
            let headers = ["Supply Type", "Source", "Allocated"];
            let rows: Vec<Vec<CellValue>> = info
                .by_source
                .iter()
                .map(|s| {
                    vec![
                        CellValue::text(s.supply_type.clone()),
                        CellValue::text(s.source.clone()),
                        CellValue::Qty(s.allocated_qty),
                    ]
                })
                .collect();
            TableFormatter::new(&headers, "source")
                .without_summary()
                .output(&rows, OutputFormat::Tsv);

            print_section("Blocking Issues");
            if info.blocking_issues.is_empty() {
                print_success("No blocking issues - material is available!");
            } else {
                for issue in &info.blocking_issues {
                    if issue.is_severe() {
                        println!("{} {}", style("✗").red(), style(issue).red().bold());
                    } else {
                        println!("{} {}", style("!").yellow(), style(issue).yellow());
                    }
                }
            }

            print_section("Demand Lines");
            output_sheet(&sheet, "line", OutputFormat::Tsv);
            Ok(())
        }
        format => {
            output_sheet(&sheet, "line", format);
            Ok(())
        }
    }
}
