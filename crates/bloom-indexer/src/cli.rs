//! Command-line arguments

use std::path::PathBuf;

use bloom_index::domain::config::{
    DEFAULT_DELIMITER, DEFAULT_FALSE_POSITIVE_RATE, DEFAULT_SKIP_LINES,
};
use bloom_index::{ColumnFilter, IndexConfig, IndexConfigBuilder, IndexError};
use clap::{Args, Parser, Subcommand};

/// Bloom Indexer: per-column Bloom filter indexes for CSV files
#[derive(Parser, Debug)]
#[command(name = "bloom-indexer", version)]
#[command(about = "Build and query per-column Bloom filter indexes for CSV files")]
pub struct Cli {
    /// Log every inserted value and the filter parameters
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write and read artifacts in this directory instead of next to the input
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build one .bfindex artifact per selected column
    Index(IndexArgs),
    /// Test values against a previously built artifact
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Input CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Columns to index, e.g. "1,2" or "all"
    #[arg(short, long, default_value = "all", value_parser = ColumnFilter::parse)]
    pub fields: ColumnFilter,

    /// Header lines to skip
    #[arg(short, long, default_value_t = DEFAULT_SKIP_LINES)]
    pub skip: usize,

    /// Target false positive rate, in (0, 1)
    #[arg(short = 'e', long = "error-rate", default_value_t = DEFAULT_FALSE_POSITIVE_RATE)]
    pub error_rate: f64,

    /// Field delimiter (one ASCII character)
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER, value_parser = IndexConfig::parse_delimiter)]
    pub delimiter: char,

    /// Also index every parent domain of domain-name values
    #[arg(short, long)]
    pub recursive: bool,
}

impl IndexArgs {
    /// Validated indexing configuration
    pub fn config(&self, verbose: bool) -> Result<IndexConfig, IndexError> {
        IndexConfigBuilder::new()
            .false_positive_rate(self.error_rate)
            .skip_lines(self.skip)
            .delimiter(self.delimiter)
            .column_filter(self.fields.clone())
            .expand_domains_recursively(self.recursive)
            .verbose(verbose)
            .build()
    }
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// CSV file the index was built from
    #[arg(short, long)]
    pub input: PathBuf,

    /// 1-indexed column to query
    #[arg(short, long)]
    pub column: usize,

    /// Values to test, exactly as given
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn test_index_defaults() {
        let cli = parse(&["bloom-indexer", "index", "-i", "data.csv"]);
        let Command::Index(args) = cli.command else {
            panic!("expected index command");
        };

        let config = args.config(cli.verbose).unwrap();
        assert_eq!(config, IndexConfig::default());
        assert_eq!(args.input, PathBuf::from("data.csv"));
    }

    #[test]
    fn test_index_flags() {
        let cli = parse(&[
            "bloom-indexer", "-v", "index", "-i", "data.csv", "-f", "1,3", "-s", "0", "-e",
            "0.01", "-d", ",", "-r",
        ]);
        let Command::Index(args) = cli.command else {
            panic!("expected index command");
        };

        let config = args.config(cli.verbose).unwrap();
        assert_eq!(config.fields, ColumnFilter::only([1, 3]));
        assert_eq!(config.skip_lines, 0);
        assert_eq!(config.false_positive_rate, 0.01);
        assert_eq!(config.delimiter, ',');
        assert!(config.expand_domains_recursively);
        assert!(config.verbose);
    }

    #[test]
    fn test_rejects_bad_fields_and_delimiter() {
        assert!(Cli::try_parse_from(["bloom-indexer", "index", "-i", "x", "-f", "a,b"]).is_err());
        assert!(Cli::try_parse_from(["bloom-indexer", "index", "-i", "x", "-d", ";;"]).is_err());
    }

    #[test]
    fn test_out_of_range_rate_fails_validation() {
        let cli = parse(&["bloom-indexer", "index", "-i", "x", "-e", "1.5"]);
        let Command::Index(args) = cli.command else {
            panic!("expected index command");
        };
        assert!(matches!(
            args.config(false),
            Err(IndexError::InvalidFalsePositiveRate { .. })
        ));
    }

    #[test]
    fn test_query_requires_values() {
        assert!(Cli::try_parse_from(["bloom-indexer", "query", "-i", "x", "-c", "1"]).is_err());

        let cli = parse(&["bloom-indexer", "query", "-i", "x", "-c", "2", "apple", "a b"]);
        let Command::Query(args) = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.column, 2);
        assert_eq!(args.values, vec!["apple", "a b"]);
    }
}
