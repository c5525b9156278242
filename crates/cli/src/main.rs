//! This is the CLI for inspecting the type trait tables built by the
//! [`tyreg_registry`] crate. For more detail, please see the documentation for
//! that crate.

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming
#![allow(clippy::multiple_crate_versions)] // Enforced by our dependencies

mod args;

use std::process::ExitCode;

use ariadne::{Label, Report, ReportKind, Source};
use clap::Parser;
use itertools::Itertools;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tyreg_errors::registry::Error;
use tyreg_registry::{TargetConfig, TypeTraitTable, VarType};

use crate::args::Arguments;

fn main() -> ExitCode {
    let args = Arguments::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&args.target, &err);
            ExitCode::FAILURE
        }
    }
}

/// Builds the table requested by `args` and renders it, one line per type.
fn run(args: &Arguments) -> Result<String, Error> {
    let config = TargetConfig::parse(&args.target)?;
    debug!(%config, "Parsed target description");

    let table = TypeTraitTable::new(config)?;
    let types = if args.types.is_empty() {
        table.iter().map(|d| d.identifier).collect_vec()
    } else {
        args.types
            .iter()
            .map(|name| name.parse::<VarType>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut lines = vec![format!("# {config}")];
    if !args.flags_only {
        lines.push(format!(
            "{:<8} {:<8} {:<8} {:<6} {:>3} {:>9} {:>9} {:>3} {:>3}  flags",
            "type", "name", "canon", "verify", "sz", "emit", "actual", "st", "al"
        ));
    }

    lines.extend(types.into_iter().map(|ty| match table.try_descriptor_of(ty) {
        Some(desc) if args.flags_only => format!("{:<8} {}", ty.symbol(), desc.flags),
        Some(desc) => desc.to_string(),
        None => format!("{:<8} (not available on this target)", ty.symbol()),
    }));

    Ok(lines.into_iter().map(|line| line + "\n").collect())
}

/// Reports `err` to the user, pointing into the `description` of the target
/// where the error concerns a portion of it.
fn report(description: &str, err: &Error) {
    debug!(?err, "Failed to build the type trait table");

    let Some(span) = err.span() else {
        eprintln!("Error: {err}");
        return;
    };

    // Errors can point one past the end of the description for empty segments.
    let source = format!("{description} ");
    let printed = Report::build(ReportKind::Error, (), span.start)
        .with_message("Invalid target description")
        .with_label(Label::new(span).with_message(err.to_string()))
        .finish()
        .eprint(Source::from(source));

    if printed.is_err() {
        eprintln!("Error: {err}");
    }
}
