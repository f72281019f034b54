//! Query tokenization.
//!
//! `(`, `)`, `&`, `|` and `!` are operators wherever they appear, even inside
//! a word. Whitespace separates words. Every other character is collected
//! into a word, which is then run through the [`Analyzer`]; a word may yield
//! several terms or none. An implicit AND is inserted between two adjacent
//! operands, so `a b`, `a (b | c)` and `a !b` are all conjunctions.

use std::fmt;

use crate::analysis::Analyzer;

/// A token of the infix query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    Term(String),
    And,
    Or,
    Not,
    LeftParen,
    RightParen,
}

impl QueryToken {
    /// Whether an operand can start with this token.
    fn starts_operand(&self) -> bool {
        matches!(
            self,
            QueryToken::Term(_) | QueryToken::Not | QueryToken::LeftParen
        )
    }

    /// Whether an operand can end with this token.
    fn ends_operand(&self) -> bool {
        matches!(self, QueryToken::Term(_) | QueryToken::RightParen)
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryToken::Term(term) => f.write_str(term),
            QueryToken::And => f.write_str("&"),
            QueryToken::Or => f.write_str("|"),
            QueryToken::Not => f.write_str("!"),
            QueryToken::LeftParen => f.write_str("("),
            QueryToken::RightParen => f.write_str(")"),
        }
    }
}

/// Splits a query string into [`QueryToken`]s.
#[derive(Debug)]
pub struct QueryLexer<'a> {
    analyzer: &'a Analyzer,
}

impl<'a> QueryLexer<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        QueryLexer { analyzer }
    }

    pub fn tokenize(&self, query: &str) -> Vec<QueryToken> {
        let mut tokens = Vec::new();
        let mut word = String::new();

        for c in query.chars() {
            let operator = match c {
                '(' => Some(QueryToken::LeftParen),
                ')' => Some(QueryToken::RightParen),
                '&' => Some(QueryToken::And),
                '|' => Some(QueryToken::Or),
                '!' => Some(QueryToken::Not),
                _ => None,
            };

            if let Some(operator) = operator {
                self.flush_word(&mut word, &mut tokens);
                push_token(&mut tokens, operator);
            } else if c.is_whitespace() {
                self.flush_word(&mut word, &mut tokens);
            } else {
                word.push(c);
            }
        }
        self.flush_word(&mut word, &mut tokens);

        tokens
    }

    fn flush_word(&self, word: &mut String, tokens: &mut Vec<QueryToken>) {
        if word.is_empty() {
            return;
        }
        for term in self.analyzer.analyze(word) {
            push_token(tokens, QueryToken::Term(term));
        }
        word.clear();
    }
}

fn push_token(tokens: &mut Vec<QueryToken>, token: QueryToken) {
    if token.starts_operand() && tokens.last().is_some_and(QueryToken::ends_operand) {
        tokens.push(QueryToken::And);
    }
    tokens.push(token);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisConfig;

    use QueryToken::*;

    fn analyzer(stemming: bool) -> Analyzer {
        let mut config = AnalysisConfig {
            stemming,
            ..AnalysisConfig::default()
        };
        config.tokenizer.min_len = 1;
        Analyzer::from_config(&config).unwrap()
    }

    fn term(s: &str) -> QueryToken {
        Term(s.to_string())
    }

    #[test]
    fn test_explicit_operators() {
        let analyzer = analyzer(false);
        let lexer = QueryLexer::new(&analyzer);

        assert_eq!(lexer.tokenize("a & b"), vec![term("a"), And, term("b")]);
        assert_eq!(lexer.tokenize("a&b"), vec![term("a"), And, term("b")]);
        assert_eq!(
            lexer.tokenize("(a|b)&!c"),
            vec![
                LeftParen,
                term("a"),
                Or,
                term("b"),
                RightParen,
                And,
                Not,
                term("c")
            ]
        );
    }

    #[test]
    fn test_implicit_and() {
        let analyzer = analyzer(false);
        let lexer = QueryLexer::new(&analyzer);

        assert_eq!(lexer.tokenize("a b"), vec![term("a"), And, term("b")]);
        assert_eq!(lexer.tokenize("a !b"), vec![term("a"), And, Not, term("b")]);
        assert_eq!(
            lexer.tokenize("(a) (b)"),
            vec![
                LeftParen,
                term("a"),
                RightParen,
                And,
                LeftParen,
                term("b"),
                RightParen
            ]
        );
        // No implicit AND next to an explicit operator.
        assert_eq!(lexer.tokenize("a | b"), vec![term("a"), Or, term("b")]);
    }

    #[test]
    fn test_word_splits_into_several_terms() {
        let analyzer = analyzer(false);
        let lexer = QueryLexer::new(&analyzer);

        assert_eq!(
            lexer.tokenize("кот,пёс"),
            vec![term("кот"), And, term("пес")]
        );
    }

    #[test]
    fn test_normalization_and_stemming() {
        let analyzer = analyzer(true);
        let lexer = QueryLexer::new(&analyzer);

        assert_eq!(
            lexer.tokenize("Собака | КНИГАМИ"),
            vec![term("собак"), Or, term("книг")]
        );
    }

    #[test]
    fn test_word_without_terms() {
        let analyzer = analyzer(false);
        let lexer = QueryLexer::new(&analyzer);

        assert_eq!(lexer.tokenize("a & ..."), vec![term("a"), And]);
        assert!(lexer.tokenize("   ").is_empty());
    }

    #[test]
    fn test_display() {
        let rendered: Vec<String> = [LeftParen, term("a"), Or, Not, RightParen, And]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered.concat(), "(a|!)&");
    }
}
