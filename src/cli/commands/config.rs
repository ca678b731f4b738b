//! `mstudy config` command - Configuration inspection
//!
//! Shows the effective configuration, where it is read from, and the keys
//! that can be set in `mstudy.yaml` or `~/.config/mstudy/config.yaml`.

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::Path;

use crate::cli::commands::utils::print_json;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::LOCAL_CONFIG_FILE;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
pub const VALID_KEYS: &[(&str, &str)] = &[
    ("study_file", "Study file to use instead of auto-detection"),
    ("sheet", "Worksheet holding the demand lines (default: Study)"),
    (
        "file_prefix",
        "File name prefix for auto-detection (default: MV_Material_Study-)",
    ),
    ("wip_locater", "Locater code of WIP floor stock (default: 1-1-1-1)"),
    ("free_stock", "Source label of free stock (default: free_stock)"),
    ("default_format", "Default output format (tsv, csv, md, json)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        if !VALID_KEYS.iter().any(|(k, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                help = "Run 'mstudy config keys' to list the keys",
                "Unknown config key '{}'",
                key
            ));
        }
        return match config.get(key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if global.format == OutputFormat::Json {
        return print_json(&config);
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        print_config_value(key, config.get(key).as_deref());
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--file, --sheet, --format)");
    println!("  2. Environment variables (MSTUDY_FILE, MSTUDY_SHEET)");
    println!("  3. Local config (./{})", LOCAL_CONFIG_FILE);
    println!("  4. Global config (~/.config/mstudy/config.yaml)");
    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => print_path("Global:", &path),
        None => println!(
            "  {} {}",
            style("Global:").cyan(),
            style("(no home directory)").dim()
        ),
    }

    let local = std::env::current_dir()
        .map(|d| d.join(LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| Path::new(LOCAL_CONFIG_FILE).to_path_buf());
    println!();
    print_path("Local:", &local);
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<16} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style(format!("Set keys in ./{} as 'key: value'.", LOCAL_CONFIG_FILE)).dim()
    );
    Ok(())
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn print_path(label: &str, path: &Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("         {}", style("(exists)").green());
    } else {
        println!("         {}", style("(not created)").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys_resolve() {
        let config = Config::default();
        for key in ["sheet", "file_prefix", "wip_locater", "free_stock"] {
            assert!(VALID_KEYS.iter().any(|(k, _)| *k == key));
            assert!(config.get(key).is_some(), "{} has a default", key);
        }
        assert!(config.get("study_file").is_none());
        assert!(config.get("bogus").is_none());
    }
}
