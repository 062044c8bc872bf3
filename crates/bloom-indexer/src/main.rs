//! Bloom Indexer
//!
//! ```text
//! bloom-indexer index -i FILE [-f 1,2|all] [-s N] [-e RATE] [-d C] [-r] [-v]
//! bloom-indexer query -i FILE -c COLUMN VALUE...
//! ```
//!
//! Exit codes: 0 success, 2 invalid arguments or configuration, 3 missing
//! input or artifact, 4 malformed artifact, 1 anything else.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use bloom_index::{CsvRowSource, ErrorKind, FileIndexSink, IndexError, IndexingApi, IndexingService};

use crate::cli::{Cli, Command, IndexArgs, QueryArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let sink = match &cli.output_dir {
        Some(dir) => FileIndexSink::with_output_dir(dir),
        None => FileIndexSink::new(),
    };
    let service = IndexingService::new(Arc::new(sink));

    match cli.command {
        Command::Index(args) => index(&service, &args, cli.verbose),
        Command::Query(args) => query(&service, &args),
    }
}

fn index(service: &IndexingService<FileIndexSink>, args: &IndexArgs, verbose: bool) -> Result<()> {
    let config = args.config(verbose)?;
    debug!(?config, "Indexing {}", args.input.display());

    let source = CsvRowSource::open(&args.input, &config)?;
    let report = service
        .build_indexes(source, &config)
        .with_context(|| format!("Failed to index {}", args.input.display()))?;

    for entry in report.iter() {
        println!("{} : {} entries", entry.artifact, entry.distinct_values);
    }
    Ok(())
}

fn query(service: &IndexingService<FileIndexSink>, args: &QueryArgs) -> Result<()> {
    let source_id = args.input.display().to_string();
    let values: Vec<&str> = args.values.iter().map(String::as_str).collect();

    let answers = service
        .query(&source_id, args.column, &values)
        .with_context(|| format!("Failed to query column {} of {}", args.column, source_id))?;

    for (value, found) in values.iter().zip(answers) {
        println!("{}\t{}", value, if found { "maybe" } else { "no" });
    }
    Ok(())
}

/// Map the first `IndexError` in the chain to a process exit code
fn exit_code(err: &anyhow::Error) -> u8 {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<IndexError>())
        .map(IndexError::kind);

    match kind {
        Some(ErrorKind::InvalidConfiguration) => 2,
        Some(ErrorKind::MissingInput) => 3,
        Some(ErrorKind::Format) => 4,
        Some(ErrorKind::Io) | None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_index::{FormatError, SinkError};

    #[test]
    fn test_exit_codes() {
        let invalid = anyhow::Error::from(IndexError::InvalidColumn("0".into()));
        assert_eq!(exit_code(&invalid), 2);

        let missing = anyhow::Error::from(IndexError::from(SinkError::NotFound("x".into())))
            .context("Failed to query column 1 of x");
        assert_eq!(exit_code(&missing), 3);

        let malformed = anyhow::Error::from(IndexError::Format {
            artifact: "x.csv.1.bfindex".into(),
            source: FormatError::ZeroHashCount,
        });
        assert_eq!(exit_code(&malformed), 4);

        assert_eq!(exit_code(&anyhow::anyhow!("something else")), 1);
    }

    #[test]
    fn test_index_then_query_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        std::fs::write(&input, "name;host\nada;mail.example.com\ngrace;\n").unwrap();
        let input = input.display().to_string();

        let cli = Cli::parse_from(["bloom-indexer", "index", "-i", &input, "-r"]);
        run(cli).unwrap();
        assert!(dir.path().join("people.csv.1.bfindex").exists());
        assert!(dir.path().join("people.csv.2.bfindex").exists());

        let service = IndexingService::new(Arc::new(FileIndexSink::new()));
        let hits = service
            .query(&input, 2, &["mail.example.com", "example.com", "com"])
            .unwrap();
        assert_eq!(hits, vec![true, true, true]);
    }

    #[test]
    fn test_query_missing_artifact_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.csv").display().to_string();

        let cli = Cli::parse_from(["bloom-indexer", "query", "-i", &input, "-c", "1", "x"]);
        let err = run(cli).unwrap_err();
        assert_eq!(exit_code(&err), 3);
    }
}
