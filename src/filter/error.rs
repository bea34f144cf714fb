use thiserror::Error;

/// Errors raised while splitting a filter string into tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("Unterminated quoted string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Number '{text}' at position {position} does not fit in a 64-bit integer")]
    NumberOutOfRange { text: String, position: usize },

    #[error("Invalid date '{text}' at position {position}")]
    InvalidDate { text: String, position: usize },
}

/// Errors raised while building the AST from tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected end of expression")]
    UnexpectedEndOfExpression,

    #[error("Expected word but got '{found}' at position {position}")]
    ExpectedWord { found: String, position: usize },

    #[error("Expected logical operator (and, or) but got '{found}' at position {position}")]
    ExpectedLogicalOperator { found: String, position: usize },

    #[error(
        "Expected comparison operator (eq, ne, lt, le, gt, ge) but got '{found}' at position {position}"
    )]
    ExpectedComparisonOperator { found: String, position: usize },

    #[error(
        "Cannot mix 'and' and 'or' at position {position} without grouping; use parentheses"
    )]
    MixedOperatorsWithoutGrouping { position: usize },

    #[error("Missing arguments for method '{method}' at position {position}")]
    MissingMethodArguments { method: String, position: usize },

    #[error("Missing separator between method arguments, got '{found}' at position {position}")]
    MissingArgumentSeparator { found: String, position: usize },

    #[error("Unexpected token '{found}' at position {position} (expected {expected_kind})")]
    UnexpectedToken {
        expected_kind: &'static str,
        found: String,
        position: usize,
    },

    #[error(
        "Method '{method}' at position {position} takes {expected} arguments but {found} were given"
    )]
    WrongArgumentCount {
        method: String,
        expected: usize,
        found: usize,
        position: usize,
    },

    #[error("Grouping at position {position} is nested deeper than the limit of {limit}")]
    NestingTooDeep { limit: usize, position: usize },
}

/// Any failure to turn a filter string into a predicate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid filter expression: {0}")]
    Lex(LexError),

    #[error("Invalid filter expression: {0}")]
    Parse(ParseError),
}

impl From<LexError> for FilterError {
    fn from(err: LexError) -> Self {
        FilterError::Lex(err)
    }
}

impl From<ParseError> for FilterError {
    fn from(err: ParseError) -> Self {
        FilterError::Parse(err)
    }
}

impl FilterError {
    /// Filter errors always stem from client input and are never transient.
    pub fn is_client_error(&self) -> bool {
        true
    }
}
