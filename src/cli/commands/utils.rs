//! Shared utilities for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fmt::Display;
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{open_study, Config, StudyTable};

/// Everything a reporting command needs: config, the loaded study, the
/// effective output format
pub struct StudyContext {
    pub config: Config,
    pub table: StudyTable,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl StudyContext {
    /// Load config and study according to the global flags
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let config = Config::load();
        let table = open_study(
            global.file.as_deref(),
            global.dir.as_deref(),
            global.sheet.as_deref(),
            &config,
        )?;
        let format = global.format.or_config(config.default_format.as_deref());
        Ok(Self {
            config,
            table,
            format,
            quiet: global.quiet,
        })
    }

    /// Text report mode (as opposed to machine-readable output)
    pub fn is_report(&self) -> bool {
        self.format == OutputFormat::Auto
    }

    /// Dim "Source: <file>" line under a report title
    pub fn print_source(&self) {
        if self.quiet {
            return;
        }
        if let Some(path) = self.table.source() {
            println!("{}", style(format!("Source: {}", path.display())).dim());
        }
    }
}

/// Pretty-printed JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

pub fn print_title(title: &str) {
    println!("{}", style(title).bold().underlined());
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", style(title).bold());
}

pub fn print_metric(label: &str, value: impl Display) {
    println!("  {:<20} {}", style(label).dim(), value);
}

pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green(), style(msg).green());
}

pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").cyan(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", style("!").yellow(), style(msg).yellow());
}

pub fn print_failure(msg: &str) {
    println!("{} {}", style("✗").red(), style(msg).red().bold());
}

/// Markdown-style key/value table for report sections
pub fn kv_table<K: Display, V: Display>(headers: [&str; 2], rows: impl IntoIterator<Item = (K, V)>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for (k, v) in rows {
        builder.push_record([k.to_string(), v.to_string()]);
    }
    builder.build().with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_table() {
        let out = kv_table(["Category", "Count"], [("QC Items", 2), ("GR Pending", 0)]);
        assert!(out.contains("| Category"));
        assert!(out.contains("QC Items"));
        assert!(out.lines().count() >= 4);
    }
}
