//! Infix to postfix conversion (shunting-yard).
//!
//! Precedence from tightest to loosest: `!` (unary, right-associative), `&`,
//! `|`. Parentheses group.

use std::fmt;

use crate::error::{BidxError, Result};
use crate::query::lexer::QueryToken;

/// One step of a postfix program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixOp {
    /// Push the postings of a term.
    Term(String),
    /// Pop two operands, push their intersection.
    And,
    /// Pop two operands, push their union.
    Or,
    /// Pop one operand, push its complement.
    Not,
}

impl fmt::Display for PostfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostfixOp::Term(term) => f.write_str(term),
            PostfixOp::And => f.write_str("&"),
            PostfixOp::Or => f.write_str("|"),
            PostfixOp::Not => f.write_str("!"),
        }
    }
}

/// Render a postfix program as space-separated steps.
pub fn format_postfix(ops: &[PostfixOp]) -> String {
    ops.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Not,
    And,
    Or,
}

impl Operator {
    fn precedence(self) -> u8 {
        match self {
            Operator::Not => 3,
            Operator::And => 2,
            Operator::Or => 1,
        }
    }

    fn is_unary(self) -> bool {
        self == Operator::Not
    }

    fn into_op(self) -> PostfixOp {
        match self {
            Operator::Not => PostfixOp::Not,
            Operator::And => PostfixOp::And,
            Operator::Or => PostfixOp::Or,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    LeftParen,
    Operator(Operator),
}

/// Convert infix tokens to postfix.
///
/// Fails on a `)` with no matching `(` and on a `(` never closed. Missing
/// operands are not detected here; evaluation reports them.
pub fn to_postfix(tokens: Vec<QueryToken>) -> Result<Vec<PostfixOp>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();

    for token in tokens {
        let operator = match token {
            QueryToken::Term(term) => {
                output.push(PostfixOp::Term(term));
                continue;
            }
            QueryToken::LeftParen => {
                stack.push(Pending::LeftParen);
                continue;
            }
            QueryToken::RightParen => {
                loop {
                    match stack.pop() {
                        Some(Pending::LeftParen) => break,
                        Some(Pending::Operator(op)) => output.push(op.into_op()),
                        None => return Err(BidxError::parse("unmatched ')'")),
                    }
                }
                continue;
            }
            QueryToken::And => Operator::And,
            QueryToken::Or => Operator::Or,
            QueryToken::Not => Operator::Not,
        };

        while let Some(&Pending::Operator(top)) = stack.last() {
            let pops = top.precedence() > operator.precedence()
                || (top.precedence() == operator.precedence() && !operator.is_unary());
            if !pops {
                break;
            }
            stack.pop();
            output.push(top.into_op());
        }
        stack.push(Pending::Operator(operator));
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::LeftParen => return Err(BidxError::parse("unmatched '('")),
            Pending::Operator(op) => output.push(op.into_op()),
        }
    }

    Ok(output)
}
