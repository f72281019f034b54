//! Boolean query processing.
//!
//! A query string goes through three steps:
//!
//! 1. [`lexer`]: split into terms and operators, inserting implicit ANDs
//! 2. [`postfix`]: reorder into postfix form by operator precedence
//! 3. [`eval`]: evaluate on a stack of sorted id lists with [`set_ops`]
//!
//! [`SearchEngine`] ties these to a loaded index.

pub mod engine;
pub mod eval;
pub mod lexer;
pub mod postfix;
pub mod set_ops;

pub use engine::{Hit, SearchEngine, SearchResults};
pub use eval::{MemoryPostings, PostingSource, evaluate};
pub use lexer::{QueryLexer, QueryToken};
pub use postfix::{PostfixOp, format_postfix, to_postfix};
