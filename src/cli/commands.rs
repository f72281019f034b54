//! Command implementations for the bidx CLI.

use log::info;

use crate::cli::args::*;
use crate::cli::output::output_result;
use crate::error::{Result, Stage};
use crate::index::source::read_document_list;
use crate::index::{BuildOptions, IndexBuilderConfig, SearchConfig, build_index};
use crate::query::{SearchEngine, format_postfix};
use crate::stats::{TermFreqConfig, compute_token_stats, term_frequencies};

/// Execute a CLI command.
pub fn execute_command(args: BidxArgs) -> Result<()> {
    match &args.command {
        Command::Build(build_args) => build(build_args, &args),
        Command::Search(search_args) => search(search_args, &args),
        Command::TermFreq(term_freq_args) => term_freq(term_freq_args, &args),
        Command::TokenStats(token_stats_args) => token_stats(token_stats_args, &args),
    }
}

/// Resolve the build configuration: config file, then flags.
pub fn build_config(args: &BuildArgs) -> Result<IndexBuilderConfig> {
    let mut config = match &args.config {
        Some(path) => IndexBuilderConfig::from_file(path)?,
        None => IndexBuilderConfig::default(),
    };
    args.analysis.apply(&mut config.analysis);
    if let Some(chunk_pairs) = args.chunk_pairs {
        config.chunk_pairs = chunk_pairs;
    }
    config.validate()?;
    Ok(config)
}

/// Resolve the search configuration: config file, then flags.
pub fn search_config(args: &SearchArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_file(path)?,
        None => SearchConfig::default(),
    };
    args.analysis.apply(&mut config.analysis);
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    Ok(config)
}

/// Whether summary reports of `build` and `term-freq` are printed.
///
/// They print at the default verbosity and are silenced by `--quiet`.
pub fn reports_enabled(args: &BidxArgs) -> bool {
    args.verbosity() > 0
}

/// Build an index.
fn build(args: &BuildArgs, cli_args: &BidxArgs) -> Result<()> {
    let options = BuildOptions {
        docs_list: args.docs_list.clone(),
        metadata: args.metadata.clone(),
        out_dir: args.out_dir.clone(),
        config: build_config(args)?,
    };
    let report = build_index(&options)?;

    if reports_enabled(cli_args) {
        output_result(&report, cli_args)?;
    }
    Ok(())
}

/// Search an index.
fn search(args: &SearchArgs, cli_args: &BidxArgs) -> Result<()> {
    let config = search_config(args)?;
    let mut engine = SearchEngine::open_dir(&args.index_dir, config)?;
    info!(
        "index {}: {} terms, {} documents",
        args.index_dir.display(),
        engine.lexicon().len(),
        engine.documents().doc_count()
    );

    if args.explain {
        let ops = engine.parse(&args.query)?;
        eprintln!("postfix: {}", format_postfix(&ops));
    }

    let results = engine.search_default(&args.query)?;
    info!(
        "query {:?}: {} matches, {} shown",
        args.query,
        results.total_hits,
        results.hits.len()
    );
    output_result(&results, cli_args)
}

/// Count term frequencies.
fn term_freq(args: &TermFreqArgs, cli_args: &BidxArgs) -> Result<()> {
    let mut config = TermFreqConfig::default();
    args.analysis.apply(&mut config.analysis);
    if let Some(chunk_tokens) = args.chunk_tokens {
        config.chunk_tokens = chunk_tokens;
    }

    let report = term_frequencies(&args.docs_list, &args.output, &config)?;
    if reports_enabled(cli_args) {
        output_result(&report, cli_args)?;
    }
    Ok(())
}

/// Report token statistics.
fn token_stats(args: &TokenStatsArgs, cli_args: &BidxArgs) -> Result<()> {
    let mut analysis = TermFreqConfig::default().analysis;
    args.analysis.apply(&mut analysis);

    let paths = read_document_list(&args.docs_list).map_err(|e| e.at(Stage::DocumentList))?;
    let stats = compute_token_stats(&paths, &analysis)?;
    output_result(&stats, cli_args)
}
