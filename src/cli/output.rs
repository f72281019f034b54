//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::args::{BidxArgs, OutputFormat};
use crate::error::Result;
use crate::index::BuildReport;
use crate::query::SearchResults;
use crate::stats::{TermFreqReport, TokenStats};

/// Plain text rendering of a command result.
pub trait TextOutput {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl TextOutput for SearchResults {
    /// One `doc_id<TAB>url<TAB>title` line per hit.
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        for hit in &self.hits {
            writeln!(out, "{}\t{}\t{}", hit.doc_id, hit.url, hit.title)?;
        }
        Ok(())
    }
}

impl TextOutput for BuildReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "documents={}", self.documents)?;
        writeln!(out, "runs={}", self.runs)?;
        writeln!(out, "pairs={}", self.pairs)?;
        writeln!(out, "terms={}", self.terms)?;
        writeln!(out, "postings_bytes={}", self.postings_bytes)?;
        if let Some(metadata) = &self.metadata {
            writeln!(out, "metadata_rows={}", metadata.rows)?;
            writeln!(out, "metadata_skipped={}", metadata.skipped)?;
        }
        Ok(())
    }
}

impl TextOutput for TermFreqReport {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "documents={}", self.documents)?;
        writeln!(out, "tokens={}", self.tokens)?;
        writeln!(out, "runs={}", self.runs)?;
        writeln!(out, "terms={}", self.terms)
    }
}

impl TextOutput for TokenStats {
    fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        for (key, value) in self.key_values() {
            writeln!(out, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Render `result` in `format` into `out`.
pub fn render<T: Serialize + TextOutput>(
    result: &T,
    format: OutputFormat,
    pretty: bool,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Text => result.write_text(out)?,
        OutputFormat::Json => {
            let json = if pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

/// Output a result to stdout in the format selected on the command line.
pub fn output_result<T: Serialize + TextOutput>(result: &T, args: &BidxArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(result, args.output_format, args.pretty, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Hit;

    fn rendered<T: Serialize + TextOutput>(result: &T, format: OutputFormat) -> String {
        let mut out = Vec::new();
        render(result, format, false, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn results() -> SearchResults {
        SearchResults {
            total_hits: 2,
            hits: vec![
                Hit {
                    doc_id: 0,
                    url: "https://a".to_string(),
                    title: "Кот и пёс".to_string(),
                },
                Hit {
                    doc_id: 2,
                    url: "https://c".to_string(),
                    title: "https://c".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_search_results_text() {
        assert_eq!(
            rendered(&results(), OutputFormat::Text),
            "0\thttps://a\tКот и пёс\n2\thttps://c\thttps://c\n"
        );
    }

    #[test]
    fn test_search_results_json() {
        let json = rendered(&results(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_hits"], 2);
        assert_eq!(value["hits"][1]["doc_id"], 2);
        assert_eq!(value["hits"][0]["title"], "Кот и пёс");
    }

    #[test]
    fn test_build_report_text() {
        let report = BuildReport {
            documents: 3,
            runs: 1,
            pairs: 5,
            terms: 4,
            postings_bytes: 20,
            metadata: None,
        };
        assert_eq!(
            rendered(&report, OutputFormat::Text),
            "documents=3\nruns=1\npairs=5\nterms=4\npostings_bytes=20\n"
        );
    }

    #[test]
    fn test_empty_results_print_nothing() {
        assert_eq!(rendered(&SearchResults::default(), OutputFormat::Text), "");
    }
}
