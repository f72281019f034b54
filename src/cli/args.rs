//! Command line argument parsing for the bidx CLI using clap.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;

/// bidx - boolean full-text index builder and search
#[derive(Parser, Debug, Clone)]
#[command(name = "bidx")]
#[command(about = "Build a boolean inverted index and run AND/OR/NOT queries against it")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct BidxArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "text", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl BidxArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index from a document list and a metadata table
    Build(BuildArgs),

    /// Run a boolean query against an index
    Search(SearchArgs),

    /// Count how often every term occurs in a corpus
    #[command(name = "term-freq")]
    TermFreq(TermFreqArgs),

    /// Report tokenization statistics for a corpus
    #[command(name = "token-stats")]
    TokenStats(TokenStatsArgs),
}

/// Analysis overrides shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Enable or disable stemming (1/0, true/false)
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub stemming: Option<bool>,

    /// Minimum token length in characters
    #[arg(long, value_name = "CHARS")]
    pub min_len: Option<usize>,
}

impl AnalysisArgs {
    /// Apply the overrides given on the command line.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(stemming) = self.stemming {
            config.stemming = stemming;
        }
        if let Some(min_len) = self.min_len {
            config.tokenizer.min_len = min_len;
        }
    }
}

/// Arguments for building an index
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Newline-delimited list of document paths
    #[arg(value_name = "DOCS_LIST")]
    pub docs_list: PathBuf,

    /// Tab-separated metadata table (header row, id/url/.../title columns)
    #[arg(value_name = "METADATA_TSV")]
    pub metadata: PathBuf,

    /// Output directory for docs.bin, terms.bin and postings.bin
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Pairs buffered in memory before a run is spilled
    #[arg(long, alias = "chunk_pairs", value_name = "N")]
    pub chunk_pairs: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Directory holding docs.bin, terms.bin and postings.bin
    #[arg(value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,

    /// Query using & (and), | (or), ! (not) and parentheses
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results to print
    #[arg(short, long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Print the postfix form of the query to stderr
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for term frequency counting
#[derive(Parser, Debug, Clone)]
pub struct TermFreqArgs {
    /// Newline-delimited list of document paths
    #[arg(value_name = "DOCS_LIST")]
    pub docs_list: PathBuf,

    /// Output file receiving term<TAB>count lines
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Tokens buffered in memory before a run is spilled
    #[arg(long, alias = "chunk", value_name = "N")]
    pub chunk_tokens: Option<usize>,
}

/// Arguments for token statistics
#[derive(Parser, Debug, Clone)]
pub struct TokenStatsArgs {
    /// Newline-delimited list of document paths
    #[arg(value_name = "DOCS_LIST")]
    pub docs_list: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        let args = BidxArgs::try_parse_from(["bidx", "token-stats", "docs.txt"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = BidxArgs::try_parse_from(["bidx", "-vv", "token-stats", "docs.txt"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            BidxArgs::try_parse_from(["bidx", "token-stats", "docs.txt", "--quiet"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args = BidxArgs::try_parse_from([
            "bidx", "--format", "json", "search", "/index", "a & b",
        ])
        .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_build_args() {
        let args = BidxArgs::try_parse_from([
            "bidx",
            "build",
            "docs.txt",
            "meta.tsv",
            "out",
            "--stemming",
            "0",
            "--chunk_pairs",
            "500",
        ])
        .unwrap();

        let Command::Build(build) = args.command else {
            panic!("Expected Build command");
        };
        assert_eq!(build.docs_list, PathBuf::from("docs.txt"));
        assert_eq!(build.out_dir, PathBuf::from("out"));
        assert_eq!(build.analysis.stemming, Some(false));
        assert_eq!(build.chunk_pairs, Some(500));
        assert!(build.config.is_none());
    }

    #[test]
    fn test_search_args() {
        let args = BidxArgs::try_parse_from([
            "bidx",
            "search",
            "/index",
            "(a|b)&!c",
            "--limit",
            "5",
            "--stemming",
            "true",
            "--explain",
        ])
        .unwrap();

        let Command::Search(search) = args.command else {
            panic!("Expected Search command");
        };
        assert_eq!(search.query, "(a|b)&!c");
        assert_eq!(search.limit, Some(5));
        assert_eq!(search.analysis.stemming, Some(true));
        assert!(search.explain);
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(BidxArgs::try_parse_from(["bidx", "build", "docs.txt"]).is_err());
        assert!(BidxArgs::try_parse_from(["bidx", "search", "/index"]).is_err());
        assert!(
            BidxArgs::try_parse_from(["bidx", "search", "/index", "a", "--limit", "x"]).is_err()
        );
    }

    #[test]
    fn test_analysis_overrides() {
        let mut config = AnalysisConfig::default();
        AnalysisArgs {
            stemming: Some(false),
            min_len: Some(1),
        }
        .apply(&mut config);
        assert!(!config.stemming);
        assert_eq!(config.tokenizer.min_len, 1);

        let mut config = AnalysisConfig::default();
        AnalysisArgs::default().apply(&mut config);
        assert_eq!(config, AnalysisConfig::default());
    }
}
