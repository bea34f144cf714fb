//! OData-style `$filter` parsing and compilation
//!
//! Filter strings are lexed, grouped, parsed into a small AST and compiled
//! into a document-store predicate using the `$eq`/`$in`/`$regex`/`$and`/`$or`
//! operator vocabulary.
//!
//! # Syntax
//!
//! ```text
//! name eq 'Bob'                         comparison (eq ne lt le gt ge)
//! startswith(title,'A')                 method (contains startswith endswith in notin)
//! a eq 1 and b eq 2                     one connective per level
//! (a eq 1 or b eq 2) and c ne 3         parentheses to combine and/or
//! ```
//!
//! # Literals
//!
//! - `'text'` - string, `''` inside is a literal quote
//! - `42` - integer
//! - `true` / `false` - boolean
//! - `2024-01-31T10:20:30.123Z` - date
//! - `null` - string literal without a value
//!
//! Any other word is a property path (`author/name`, `meta.tags`).

pub mod ast;
pub mod compiler;
pub mod error;
pub mod grouping;
pub mod lexer;
pub(crate) mod parser;

pub use ast::{
    BooleanGroup, Comparison, ComparisonOp, Connective, Literal, MethodCall, MethodName, Node,
    NodeKind, Operand, PropertyRef,
};
pub use compiler::{Condition, Predicate, PredicateValue, QueryOperator, compile, escape_regex};
pub use error::{FilterError, LexError, ParseError};
pub use lexer::{Token, TokenKind, quote_string, tokenize};

use log::debug;

/// Nesting limit applied when no configuration is given
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Parse a filter string into its AST
pub fn parse(filter: &str) -> Result<BooleanGroup, FilterError> {
    parse_with_depth(filter, DEFAULT_MAX_DEPTH)
}

/// Parse a filter string, rejecting groups nested deeper than `max_depth`
pub fn parse_with_depth(filter: &str, max_depth: usize) -> Result<BooleanGroup, FilterError> {
    let tokens = tokenize(filter)?;
    debug!("Tokenized filter into {} tokens", tokens.len());
    Ok(grouping::resolve(tokens, max_depth)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reports_lex_errors() {
        assert!(matches!(
            parse("name eq 'Bob"),
            Err(FilterError::Lex(LexError::UnterminatedString { .. }))
        ));
    }

    #[test]
    fn test_parse_reports_parse_errors() {
        assert!(matches!(
            parse("name eq 'Bob' or stars gt 2 and stars lt 1"),
            Err(FilterError::Parse(
                ParseError::MixedOperatorsWithoutGrouping { .. }
            ))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = parse("a eq 1 b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid filter expression: Expected logical operator (and, or) but got 'b' at position 7"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_error_chain_renders_message_once() {
        let err = parse("a eq").unwrap_err();
        assert!(std::error::Error::source(&err).is_none());

        let rendered = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(
            rendered,
            "Invalid filter expression: Unexpected end of expression"
        );
    }
}
