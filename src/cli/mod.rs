// src/cli/mod.rs
use std::path::PathBuf;
use clap::Parser;

pub mod commands;
pub mod handlers;
pub mod menu;
pub mod render;

pub use commands::CliCommand;

#[derive(Parser, Debug)]
#[command(author, version, about = "Password audit client", long_about = None)]
pub struct Args {
    /// Print raw results as JSON instead of formatted output
    #[arg(long)]
    pub json: bool,

    /// Log at debug level
    #[arg(long, short)]
    pub verbose: bool,

    /// Directory where downloaded reports are saved
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Command to execute; the interactive menu opens when omitted
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::ReportSource;

    #[test]
    fn parses_global_flags_and_subcommand() {
        let args = Args::try_parse_from([
            "passaudit", "--json", "--download-dir", "/tmp/reports", "bulk", "list.csv", "--download",
        ])
        .unwrap();

        assert!(args.json);
        assert_eq!(args.download_dir, Some(PathBuf::from("/tmp/reports")));
        match args.command {
            Some(CliCommand::Bulk { file, download }) => {
                assert_eq!(file, PathBuf::from("list.csv"));
                assert!(download);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn passphrase_needs_at_least_one_phrase() {
        assert!(Args::try_parse_from(["passaudit", "passphrase"]).is_err());

        let args = Args::try_parse_from(["passaudit", "passphrase", "blue whale", "1987"]).unwrap();
        assert!(matches!(args.command, Some(CliCommand::Passphrase { phrases }) if phrases.len() == 2));
    }

    #[test]
    fn download_kind_defaults_to_bulk() {
        let args = Args::try_parse_from(["passaudit", "download", "/download/a.csv"]).unwrap();
        assert!(matches!(
            args.command,
            Some(CliCommand::Download { kind: ReportSource::Bulk, .. })
        ));

        let args = Args::try_parse_from(["passaudit", "download", "x.csv", "--kind", "pii"]).unwrap();
        assert!(matches!(
            args.command,
            Some(CliCommand::Download { kind: ReportSource::Pii, .. })
        ));
    }

    #[test]
    fn no_subcommand_means_menu() {
        let args = Args::try_parse_from(["passaudit"]).unwrap();
        assert!(args.command.is_none());
    }
}
