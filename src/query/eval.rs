//! Stack evaluation of postfix programs.

use std::collections::HashMap;

use crate::error::{BidxError, Result};
use crate::index::DocId;
use crate::query::postfix::PostfixOp;
use crate::query::set_ops::{complement, intersect, union};

/// Supplies postings lists to the evaluator.
pub trait PostingSource {
    /// Size of the document id space; `!` complements against `0..doc_count`.
    fn doc_count(&self) -> u32;

    /// Sorted, duplicate-free postings of `term`; empty when the term is unknown.
    fn postings(&mut self, term: &str) -> Result<Vec<DocId>>;
}

/// Postings held in a map, for tests and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct MemoryPostings {
    doc_count: u32,
    lists: HashMap<String, Vec<DocId>>,
}

impl MemoryPostings {
    pub fn new(doc_count: u32) -> Self {
        MemoryPostings {
            doc_count,
            lists: HashMap::new(),
        }
    }

    /// Set the postings of `term`. `docs` must be strictly increasing.
    pub fn insert<S: Into<String>>(&mut self, term: S, docs: Vec<DocId>) {
        self.lists.insert(term.into(), docs);
    }
}

impl PostingSource for MemoryPostings {
    fn doc_count(&self) -> u32 {
        self.doc_count
    }

    fn postings(&mut self, term: &str) -> Result<Vec<DocId>> {
        Ok(self.lists.get(term).cloned().unwrap_or_default())
    }
}

/// Evaluate `ops` and return the matching ids in ascending order.
///
/// Fails when an operator lacks operands or when the program does not leave
/// exactly one result, which includes the empty program.
pub fn evaluate<P: PostingSource + ?Sized>(ops: &[PostfixOp], source: &mut P) -> Result<Vec<DocId>> {
    let mut stack: Vec<Vec<DocId>> = Vec::new();

    for op in ops {
        match op {
            PostfixOp::Term(term) => stack.push(source.postings(term)?),
            PostfixOp::Not => {
                let operand = pop_operand(&mut stack, op)?;
                stack.push(complement(source.doc_count(), &operand));
            }
            PostfixOp::And | PostfixOp::Or => {
                let right = pop_operand(&mut stack, op)?;
                let left = pop_operand(&mut stack, op)?;
                stack.push(match op {
                    PostfixOp::And => intersect(&left, &right),
                    _ => union(&left, &right),
                });
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(result), true) => Ok(result),
        (None, _) => Err(BidxError::evaluation("empty query")),
        (Some(_), false) => Err(BidxError::evaluation(format!(
            "{} operands left without an operator",
            stack.len() + 1
        ))),
    }
}

fn pop_operand(stack: &mut Vec<Vec<DocId>>, op: &PostfixOp) -> Result<Vec<DocId>> {
    stack
        .pop()
        .ok_or_else(|| BidxError::evaluation(format!("missing operand for '{op}'")))
}
