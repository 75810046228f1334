//! Column matching command handler

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Args;
use colored::*;

use crate::config::Config;
use crate::import::{ImportMapping, read_columns};
use crate::metadata::load_object_metadata;
use crate::tui::AppRuntime;
use crate::tui::apps::MatchColumnsApp;
use crate::tui::apps::match_columns::InitParams;

#[derive(Args, Debug)]
pub struct MatchColumnsArgs {
    /// Object metadata JSON file
    #[arg(long)]
    pub metadata: PathBuf,
    /// Spreadsheet to import (csv, xlsx, xls, ods)
    #[arg(long)]
    pub file: PathBuf,
    /// Where to write the mapping (defaults to <file>.mapping.json)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn handle_match_columns_command(args: MatchColumnsArgs, config: &Config) -> Result<()> {
    let metadata = load_object_metadata(&args.metadata)?;
    let columns = read_columns(&args.file)?;
    if columns.is_empty() {
        bail!("No columns found in {}", args.file.display());
    }

    let fields = metadata.importable_fields();
    if fields.is_empty() {
        bail!("Object '{}' has no importable fields", metadata.object);
    }

    log::info!(
        "Starting column matching: {} columns from {}",
        columns.len(),
        args.file.display()
    );

    let state = AppRuntime::<MatchColumnsApp>::new(InitParams {
        object: metadata.object.clone(),
        fields,
        columns,
        import_config: config.import.clone(),
    })
    .run()?;

    if !state.confirmed {
        println!("{}", "Matching cancelled, no mapping written".yellow());
        return Ok(());
    }

    let mapping = state.matches.to_mapping(&state.object);
    let output = args.output.unwrap_or_else(|| default_output_path(&args.file));
    mapping.write(&output)?;

    print_summary(&mapping, &output);
    Ok(())
}

/// `people.csv` -> `people.mapping.json` next to the input
fn default_output_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("import");
    file.with_file_name(format!("{}.mapping.json", stem))
}

fn print_summary(mapping: &ImportMapping, output: &Path) {
    let mapped = mapping.columns.iter().filter(|c| c.target.is_some()).count();
    let skipped = mapping.columns.iter().filter(|c| c.skipped).count();
    let unmatched = mapping.columns.len() - mapped - skipped;

    println!("{} {}", "Mapping for".bold(), mapping.object.cyan().bold());
    for column in &mapping.columns {
        let target = match (&column.target, column.skipped) {
            (Some(target), _) => target.green().to_string(),
            (None, true) => "do not import".dimmed().to_string(),
            (None, false) => "unmatched".yellow().to_string(),
        };
        println!("  {:>3}  {:<24} → {}", column.index, column.header, target);
    }
    println!(
        "{} mapped, {} skipped, {} unmatched",
        mapped.to_string().green(),
        skipped.to_string().dimmed(),
        unmatched.to_string().yellow()
    );
    println!("Written to {}", output.display().to_string().cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/people.csv")),
            PathBuf::from("/tmp/people.mapping.json")
        );
        assert_eq!(
            default_output_path(Path::new("leads.xlsx")),
            PathBuf::from("leads.mapping.json")
        );
    }
}
