//! `mstudy push` command - Production action plan for selected projects
//!
//! Buckets the selected demand lines into QC holds, pending receipts, WIP
//! stock, reallocations and missing material, gives a release verdict and
//! optionally exports the plan as workbooks.

use console::style;
use miette::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::analysis::{
    production_blockers, selection_options, BlockerRules, Bucket, ProductionBlockers, SelectBy,
    Selection, SheetTable, Verdict,
};
use crate::cli::commands::utils::{
    kv_table, print_failure, print_info, print_json, print_metric, print_section, print_success,
    print_title, print_warning, StudyContext,
};
use crate::cli::helpers::format_pct;
use crate::cli::table::{output_sheet, CellValue, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::export::export_blockers;

#[derive(clap::Args, Debug)]
pub struct PushArgs {
    /// Field the values select on
    #[arg(long, value_enum, default_value_t = SelectBy::Order)]
    pub by: SelectBy,

    /// Values to push (default: first value in sorted order)
    pub values: Vec<String>,

    /// Write the action plan workbooks into this directory
    #[arg(long, short = 'e')]
    pub export: Option<PathBuf>,
}

pub fn run(args: PushArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = StudyContext::load(global)?;

    if !ctx.table.has(args.by.column()) {
        return Err(miette::miette!(
            help = "Select with --by order, or add the column to the study",
            "The study has no '{}' column",
            args.by
        ));
    }

    let selection = Selection::resolve(&ctx.table, args.by, args.values);
    if selection.is_empty() {
        return Err(miette::miette!("The study has no {} values to select", args.by));
    }
    if selection.lines(&ctx.table).is_empty() {
        let options = selection_options(&ctx.table, args.by);
        let sample: Vec<&str> = options.iter().take(10).copied().collect();
        return Err(miette::miette!(
            help = format!("Available: {}", sample.join(", ")),
            "No demand lines match {} {}",
            args.by,
            selection.values.join(", ")
        ));
    }

    let rules = BlockerRules::from_config(&ctx.config);
    let blockers = production_blockers(&ctx.table, selection, &rules);
    let sheets: Vec<(Bucket, SheetTable)> = Bucket::ALL
        .iter()
        .map(|b| (*b, blockers.sheet(*b, &ctx.table)))
        .collect();

    match ctx.format {
        OutputFormat::Json => print_json(&json_report(&blockers, &sheets))?,
        OutputFormat::Auto => print_report(&ctx, &blockers, &sheets),
        OutputFormat::Md => {
            for (bucket, sheet) in &sheets {
                println!("## {}", bucket.sheet_name());
                println!();
                if sheet.is_empty() {
                    println!("{}", bucket.empty_message());
                } else {
                    output_sheet(sheet, "line", OutputFormat::Md);
                }
                println!();
            }
            println!("## Summary");
            println!();
            print_summary_table(&blockers, OutputFormat::Md);
        }
        format => print_summary_table(&blockers, format),
    }

    if let Some(dir) = args.export {
        let written = export_blockers(&dir, &blockers, &ctx.table)?;
        if !ctx.quiet {
            eprintln!();
            for path in &written {
                eprintln!("{} Exported {}", style("✓").green(), style(path.display()).cyan());
            }
        }
    }

    Ok(())
}

fn json_report(blockers: &ProductionBlockers<'_>, sheets: &[(Bucket, SheetTable)]) -> serde_json::Value {
    let buckets: BTreeMap<&str, &SheetTable> = sheets.iter().map(|(b, s)| (b.sheet_name(), s)).collect();
    let summary: Vec<serde_json::Value> = blockers
        .summary()
        .into_iter()
        .map(|(category, count)| serde_json::json!({ "category": category, "count": count }))
        .collect();
    serde_json::json!({
        "selection": blockers.selection,
        "total_items": blockers.total_items,
        "fulfillment_pct": blockers.fulfillment_pct,
        "blocker_count": blockers.blocker_count(),
        "verdict": blockers.verdict(),
        "summary": summary,
        "buckets": buckets,
    })
}

fn print_summary_table(blockers: &ProductionBlockers<'_>, format: OutputFormat) {
    let headers = ["Category", "Count"];
    let rows: Vec<Vec<CellValue>> = blockers
        .summary()
        .into_iter()
        .map(|(category, count)| vec![CellValue::text(category), CellValue::Count(count)])
        .collect();
    TableFormatter::new(&headers, "category")
        .without_summary()
        .output(&rows, format);
}

fn print_report(ctx: &StudyContext, blockers: &ProductionBlockers<'_>, sheets: &[(Bucket, SheetTable)]) {
    print_title(&format!(
        "Production Action Plan: {}",
        blockers.selection.values.join(", ")
    ));
    ctx.print_source();
    println!();
    print_metric("Selected by", blockers.selection.by);
    print_metric("Total items", blockers.total_items);
    print_metric("Fulfillment", format_pct(blockers.fulfillment_pct));

    for (bucket, sheet) in sheets {
        print_section(bucket.title());
        if sheet.is_empty() {
            match bucket {
                Bucket::Wip => print_info(bucket.empty_message()),
                _ => print_success(bucket.empty_message()),
            }
            continue;
        }
        let headline = bucket.headline(sheet.len());
        match bucket {
            Bucket::Qc | Bucket::Missing => print_failure(&headline),
            Bucket::Wip => print_info(&headline),
            Bucket::GrPending | Bucket::Reallocation => print_warning(&headline),
        }
        output_sheet(sheet, "line", OutputFormat::Tsv);
    }

    print_section("Action Summary");
    println!(
        "{}",
        kv_table(["Category", "Count"], blockers.summary())
    );
    println!();

    let blocking = blockers.blocker_count();
    let verdict = blockers.verdict();
    let message = verdict.message(blocking);
    match verdict {
        Verdict::AllClear => println!("{} {}", style("✓").green(), style(message).green().bold()),
        Verdict::AlmostReady => println!("{} {}", style("!").yellow(), style(message).yellow().bold()),
        Verdict::NotReady => println!("{} {}", style("✗").red(), style(message).red().bold()),
    }
}
