use clap::Parser;

use super::parsers::parse_positive_usize;
use super::types::{CharacterSet, FileEncoding, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Throughput harness for a CRDP data-protection service: protect then reveal a generated or file-sourced workload, one record at a time or in bulk.",
    next_help_heading = "Workload Options"
)]
pub struct StressArgs {
    /// CRDP endpoint host (hostname or IP, optional :port)
    #[arg(long, short = 'e', env = "CRDP_ENDPOINT", help_heading = "Common Options")]
    pub endpoint: Option<String>,

    /// Protection policy name
    #[arg(long, short = 'p', env = "CRDP_POLICY", help_heading = "Common Options")]
    pub policy: Option<String>,

    /// Number of records to protect and reveal
    #[arg(
        long,
        short = 'b',
        default_value = "1",
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub batch: PositiveUsize,

    /// Username presented on reveal
    #[arg(long, short = 'u', env = "CRDP_USERNAME", help_heading = "Common Options")]
    pub username: Option<String>,

    /// Submit all records in one bulk call instead of one call per record
    #[arg(long, help_heading = "Common Options")]
    pub bulk: bool,

    /// Read the payload from a file (forces bulk mode)
    #[arg(long, short = 'f')]
    pub file: Option<String>,

    /// How file bytes are made JSON-safe
    #[arg(long = "file-encoding", default_value = "ascii", value_enum)]
    pub file_encoding: FileEncoding,

    /// Character set for generated payloads
    #[arg(long, short = 'c', default_value = "alphanumeric", value_enum)]
    pub charset: CharacterSet,

    /// Length of generated payloads
    #[arg(
        long,
        short = 'l',
        default_value = "64",
        value_parser = parse_positive_usize
    )]
    pub length: PositiveUsize,

    /// Generate a fresh payload for every record instead of repeating one
    #[arg(long)]
    pub fresh: bool,

    /// Write the run report as JSON to this path
    #[arg(long = "export-json", help_heading = "Output Options")]
    pub export_json: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by CRDP_STRESS_LOG/RUST_LOG)
    #[arg(long, short = 'v', alias = "debug", help_heading = "Output Options")]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./crdp-stress.toml or ./crdp-stress.json if present.
    #[arg(long, help_heading = "Common Options")]
    pub config: Option<String>,
}

impl StressArgs {
    /// A source file always runs in bulk mode.
    #[must_use]
    pub const fn bulk_effective(&self) -> bool {
        self.bulk || self.file.is_some()
    }
}
