pub mod commands;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::match_columns::MatchColumnsArgs;
use commands::record::RecordArgs;

#[derive(Parser)]
#[command(name = "crm-cli")]
#[command(about = "Match spreadsheet columns to CRM fields and edit records inline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Map the columns of a CSV or workbook file to object fields
    MatchColumns(MatchColumnsArgs),
    /// Edit a record's fields in place
    Record(RecordArgs),
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_match_columns() {
        let cli = Cli::try_parse_from([
            "crm-cli",
            "match-columns",
            "--metadata",
            "person.json",
            "--file",
            "people.csv",
        ])
        .unwrap();

        let Commands::MatchColumns(args) = cli.command else {
            panic!("expected match-columns");
        };
        assert_eq!(args.file.to_str(), Some("people.csv"));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_parse_config_set_show_labels() {
        let cli = Cli::try_parse_from(["crm-cli", "config", "set-show-labels", "false"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::SetShowLabels { show: false }
            }
        ));
    }
}
