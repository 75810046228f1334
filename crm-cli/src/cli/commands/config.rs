//! Config command handler

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::*;

use crate::config::{Config, config_path};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Print the config file location
    Path,
    /// Width of the label column in the record editor
    SetLabelWidth { width: u16 },
    /// Show labels next to values (false turns them into tooltips)
    SetShowLabels {
        #[arg(action = clap::ArgAction::Set)]
        show: bool,
    },
}

pub fn handle_config_command(command: ConfigCommands, mut config: Config) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("{}", config_path().display().to_string().dimmed());
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Path => {
            println!("{}", config_path().display());
        }
        ConfigCommands::SetLabelWidth { width } => {
            if width == 0 {
                bail!("Label width must be at least 1");
            }
            config.ui.label_width = width;
            config.save()?;
            println!("{} label_width = {}", "Updated".green(), width);
        }
        ConfigCommands::SetShowLabels { show } => {
            config.ui.show_labels = show;
            config.save()?;
            println!("{} show_labels = {}", "Updated".green(), show);
        }
    }
    Ok(())
}
