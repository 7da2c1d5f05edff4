// src/cli/commands.rs
use std::path::PathBuf;
use clap::{Subcommand, ValueEnum};

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Analyze a single password
    Analyze {
        /// Password to analyze (prompted for, hidden, when omitted)
        password: Option<String>,
    },

    /// Generate a passphrase from memorable phrases
    Passphrase {
        /// Phrases to build the passphrase from
        #[arg(required = true)]
        phrases: Vec<String>,
    },

    /// Upload a CSV or Excel password list for strength analysis
    Bulk {
        /// File to upload
        #[arg(required = true)]
        file: PathBuf,

        /// Save the report once the analysis completes
        #[arg(long)]
        download: bool,
    },

    /// Upload a CSV password list for PII analysis
    BulkPii {
        /// File to upload
        #[arg(required = true)]
        file: PathBuf,

        /// Save the report once the analysis completes
        #[arg(long)]
        download: bool,
    },

    /// Show security insights
    Insights,

    /// Download a report by link
    Download {
        /// Download link returned by an earlier analysis
        #[arg(required = true)]
        reference: String,

        /// Which analysis produced the report
        #[arg(long, value_enum, default_value_t = ReportSource::Bulk)]
        kind: ReportSource,
    },
}

/// Service a download link belongs to.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    Bulk,
    Pii,
}
