//! Projection of the tab-separated metadata table into a [`DocumentStore`].
//!
//! The table has a header row followed by rows of six tab-separated fields;
//! the last field takes the rest of the line. Field 0 is the document id,
//! field 1 the url and field 4 the title. Rows that do not split into six
//! fields, whose id is not an integer, or whose id is outside the document id
//! space are skipped and only counted. A later row for the same id replaces
//! an earlier one.
//!
//! Rows are decoded as UTF-8; invalid byte sequences in any field become
//! U+FFFD, so `docs.bin` always holds valid UTF-8.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::error::{BidxError, Result};
use crate::index::docstore::{DocRecord, DocumentStore};

const FIELDS: usize = 6;
const ID_FIELD: usize = 0;
const URL_FIELD: usize = 1;
const TITLE_FIELD: usize = 4;

/// Row counts of one projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetadataStats {
    /// Non-empty data rows seen (header excluded).
    pub rows: u64,
    /// Rows stored into the document store.
    pub accepted: u64,
    /// Rows skipped as malformed or out of range.
    pub skipped: u64,
}

/// Project metadata rows from `reader` into a store of `doc_count` documents.
///
/// Fails when the input is unreadable or has no header row.
pub fn project_metadata<R: BufRead>(
    mut reader: R,
    doc_count: u32,
) -> Result<(DocumentStore, MetadataStats)> {
    let mut store = DocumentStore::with_doc_count(doc_count);
    let mut stats = MetadataStats::default();

    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Err(BidxError::index("metadata table has no header row"));
    }

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line);
        let row = text.strip_suffix('\n').unwrap_or(&text);
        if row.is_empty() {
            continue;
        }
        stats.rows += 1;

        match parse_row(row, doc_count) {
            Some((doc_id, record)) => {
                store.set(doc_id, record);
                stats.accepted += 1;
            }
            None => stats.skipped += 1,
        }
    }

    Ok((store, stats))
}

fn parse_row(row: &str, doc_count: u32) -> Option<(u32, DocRecord)> {
    let fields: Vec<&str> = row.splitn(FIELDS, '\t').collect();
    if fields.len() < FIELDS {
        return None;
    }
    let id: i64 = fields[ID_FIELD].trim().parse().ok()?;
    let doc_id = u32::try_from(id).ok().filter(|&id| id < doc_count)?;
    Some((doc_id, DocRecord::new(fields[URL_FIELD], fields[TITLE_FIELD])))
}

/// Read the metadata table at `path` and project it.
pub fn read_metadata_file<P: AsRef<Path>>(
    path: P,
    doc_count: u32,
) -> Result<(DocumentStore, MetadataStats)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        BidxError::index(format!("cannot open metadata {}: {e}", path.display()))
    })?;
    let (store, stats) = project_metadata(BufReader::new(file), doc_count)?;

    info!(
        "metadata {}: {} rows, {} accepted, {} skipped",
        path.display(),
        stats.rows,
        stats.accepted,
        stats.skipped
    );
    if stats.skipped > 0 {
        debug!("{} metadata rows were malformed or out of range", stats.skipped);
    }
    Ok((store, stats))
}
