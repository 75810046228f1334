//! Record editor command handler

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use colored::*;

use crate::metadata::load_object_metadata;
use crate::records::Record;
use crate::tui::AppRuntime;
use crate::tui::apps::RecordApp;
use crate::tui::apps::record::InitParams;

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Object metadata JSON file
    #[arg(long)]
    pub metadata: PathBuf,
    /// Record JSON file, saved in place
    #[arg(long)]
    pub record: PathBuf,
}

pub fn handle_record_command(args: RecordArgs) -> Result<()> {
    let metadata = load_object_metadata(&args.metadata)?;
    let record = Record::load(&args.record)?;

    let fields = metadata.active_fields();
    if fields.is_empty() {
        bail!("Object '{}' has no active fields", metadata.object);
    }

    let runtime_config = crate::global_runtime_config();
    let state = AppRuntime::<RecordApp>::new(InitParams {
        object: metadata.object.clone(),
        fields,
        record,
        record_path: args.record.clone(),
        label_width: runtime_config.label_width,
        show_labels: runtime_config.show_labels,
    })
    .run()?;

    if state.dirty {
        println!(
            "{} {}",
            "Unsaved changes discarded for record".yellow(),
            state.record.id.bold()
        );
    } else if state.saved {
        println!(
            "Saved record {} to {}",
            state.record.id.green().bold(),
            args.record.display().to_string().cyan()
        );
    }
    Ok(())
}
