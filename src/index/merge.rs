//! Final merge of spill runs into the lexicon and postings stores.

use log::debug;

use crate::error::{BidxError, Result};
use crate::index::lexicon::{Lexicon, LexiconEntry};
use crate::index::postings::PostingsWriter;
use crate::index::run::RunReader;
use crate::index::{DocId, POSTINGS_FILE, TERMS_FILE, TermDoc};
use crate::sort::KWayMerge;
use crate::storage::Storage;

/// Totals of one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Distinct `(term, doc)` pairs written.
    pub pairs: u64,
    /// Distinct terms written.
    pub terms: u64,
    /// Size of the postings store in bytes.
    pub postings_bytes: u64,
}

/// Postings of the term currently being accumulated.
struct TermGroup {
    term: String,
    docs: Vec<DocId>,
}

/// Merge the named runs into `terms.bin` and `postings.bin`.
///
/// Pairs repeated across runs are written once. With no runs both stores are
/// written empty.
pub fn merge_runs(storage: &dyn Storage, runs: &[String]) -> Result<MergeReport> {
    let readers = runs
        .iter()
        .map(|name| RunReader::open(storage, name))
        .collect::<Result<Vec<_>>>()?;
    let merge = KWayMerge::new(readers)?;

    let mut postings = PostingsWriter::create(storage, POSTINGS_FILE)?;
    let mut entries: Vec<LexiconEntry> = Vec::new();
    let mut group: Option<TermGroup> = None;
    let mut pairs = 0u64;

    for pair in merge {
        let TermDoc { term, doc } = pair?;

        match group.as_mut() {
            Some(current) if current.term == term => {
                match current.docs.last() {
                    Some(&last) if last == doc => continue,
                    Some(&last) if last > doc => {
                        return Err(BidxError::index(format!(
                            "run order violated for term {term:?}: doc {doc} after {last}"
                        )));
                    }
                    _ => current.docs.push(doc),
                }
            }
            _ => {
                if let Some(done) = group.take() {
                    flush_group(&mut postings, &mut entries, done)?;
                }
                group = Some(TermGroup {
                    term,
                    docs: vec![doc],
                });
            }
        }
        pairs += 1;
    }
    if let Some(done) = group.take() {
        flush_group(&mut postings, &mut entries, done)?;
    }

    let postings_bytes = postings.offset();
    postings.close()?;

    let lexicon = Lexicon::from_entries(entries)?;
    lexicon.write(storage, TERMS_FILE)?;
    debug!(
        "merged {} runs: {pairs} pairs, {} terms, {postings_bytes} postings bytes",
        runs.len(),
        lexicon.len()
    );

    Ok(MergeReport {
        pairs,
        terms: lexicon.len() as u64,
        postings_bytes,
    })
}

fn flush_group(
    postings: &mut PostingsWriter,
    entries: &mut Vec<LexiconEntry>,
    group: TermGroup,
) -> Result<()> {
    let offset = postings.write_list(&group.docs)?;
    entries.push(LexiconEntry {
        term: group.term,
        postings_offset: offset,
        doc_freq: group.docs.len() as u32,
    });
    Ok(())
}
