//! The command-line arguments accepted by the `tyreg` binary.

use clap::{ArgAction, Parser};

/// Prints the type trait table that the compiler backend would use for a
/// target.
#[derive(Debug, Parser)]
#[command(name = "tyreg", version, about)]
pub struct Arguments {
    /// The target to build the table for, as a `-`-separated description such
    /// as `a:x64-p64-v`.
    ///
    /// Unspecified parts are defaulted from the architecture, and the empty
    /// description is a 64-bit x86 target with vectors.
    #[arg(short, long, default_value = "")]
    pub target: String,

    /// Only print the entries for these types, given by name (`ref`) or symbol
    /// (`REF`).
    #[arg(short = 'y', long = "type", value_name = "NAME")]
    pub types: Vec<String>,

    /// Only print the identifier and flags of each entry.
    #[arg(long)]
    pub flags_only: bool,

    /// Increases the logging verbosity, and may be repeated.
    ///
    /// The `RUST_LOG` environment variable takes precedence when it is set.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Arguments {
    /// Gets the default log filter directive for the requested verbosity.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
