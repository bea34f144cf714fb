use super::error::LexError;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").expect("valid date regex")
});

pub const COMPARISONS: [&str; 6] = ["eq", "ne", "lt", "le", "gt", "ge"];
pub const LOGICALS: [&str; 2] = ["and", "or"];
pub const METHODS: [&str; 5] = ["contains", "startswith", "endswith", "in", "notin"];

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    QuotedString,
    Word,
    Number,
    Date,
    OpenParen,
    CloseParen,
    Symbol,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::QuotedString => "string",
            TokenKind::Word => "word",
            TokenKind::Number => "number",
            TokenKind::Date => "date",
            TokenKind::OpenParen => "open-paren",
            TokenKind::CloseParen => "close-paren",
            TokenKind::Symbol => "symbol",
        };
        f.write_str(name)
    }
}

/// A single lexed token.
///
/// For quoted strings `text` holds the decoded value, without the surrounding
/// quotes and with every `''` collapsed to `'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Character offset of the token in the filter string
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn is_logical(&self) -> bool {
        self.kind == TokenKind::Word && LOGICALS.contains(&self.text.as_str())
    }

    pub fn is_method(&self) -> bool {
        self.kind == TokenKind::Word && METHODS.contains(&self.text.as_str())
    }

    pub fn is_comparison(&self) -> bool {
        self.kind == TokenKind::Word && COMPARISONS.contains(&self.text.as_str())
    }

    /// Text as it would appear in the source, used in error messages
    pub fn display_text(&self) -> String {
        match self.kind {
            TokenKind::QuotedString => quote_string(&self.text),
            _ => self.text.clone(),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '*' | '-' | ':')
}

/// Split a filter string into tokens, keeping whitespace runs as tokens
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut current = 0;

    while current < chars.len() {
        let c = chars[current];
        match c {
            ' ' => {
                let end = read_while(&chars, current, |c| c == ' ');
                tokens.push(Token::new(TokenKind::Whitespace, collect(&chars, current, end), current));
                current = end;
            }
            '\'' => {
                let (value, end) = read_quoted_string(&chars, current)?;
                tokens.push(Token::new(TokenKind::QuotedString, value, current));
                current = end;
            }
            c if c.is_ascii_digit() => {
                let (token, end) = read_number_or_date(&chars, current)?;
                tokens.push(token);
                current = end;
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '*' => {
                let end = read_while(&chars, current, is_word_char);
                tokens.push(Token::new(TokenKind::Word, collect(&chars, current, end), current));
                current = end;
            }
            '(' => {
                tokens.push(Token::new(TokenKind::OpenParen, "(", current));
                current += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::CloseParen, ")", current));
                current += 1;
            }
            ',' | '.' | '+' | '=' => {
                tokens.push(Token::new(TokenKind::Symbol, c.to_string(), current));
                current += 1;
            }
            _ => {
                return Err(LexError::UnexpectedCharacter {
                    character: c,
                    position: current,
                });
            }
        }
    }

    Ok(tokens)
}

/// Wrap text in single quotes, doubling any embedded quote
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Parse the strict `YYYY-MM-DDTHH:MM:SS.mmmZ` date form
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if !DATE_RE.is_match(text) {
        return None;
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn read_while(chars: &[char], start: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = start;
    while end < chars.len() && pred(chars[end]) {
        end += 1;
    }
    end
}

fn collect(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}

/// Returns the decoded string and the index just past the closing quote
fn read_quoted_string(chars: &[char], start: usize) -> Result<(String, usize), LexError> {
    let mut value = String::new();
    let mut i = start + 1;

    loop {
        match chars.get(i) {
            None => return Err(LexError::UnterminatedString { position: start }),
            Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                value.push('\'');
                i += 2;
            }
            Some('\'') => return Ok((value, i + 1)),
            Some(&c) => {
                value.push(c);
                i += 1;
            }
        }
    }
}

fn read_number_or_date(chars: &[char], start: usize) -> Result<(Token, usize), LexError> {
    let word_end = read_while(chars, start, is_word_char);
    let word = collect(chars, start, word_end);
    if DATE_RE.is_match(&word) {
        if parse_date(&word).is_none() {
            return Err(LexError::InvalidDate {
                text: word,
                position: start,
            });
        }
        return Ok((Token::new(TokenKind::Date, word, start), word_end));
    }

    let digits_end = read_while(chars, start, |c| c.is_ascii_digit());
    let digits = collect(chars, start, digits_end);
    if digits.parse::<i64>().is_err() {
        return Err(LexError::NumberOutOfRange {
            text: digits,
            position: start,
        });
    }
    Ok((Token::new(TokenKind::Number, digits, start), digits_end))
}
