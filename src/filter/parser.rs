use super::ast::{
    BooleanGroup, Comparison, ComparisonOp, Connective, Literal, MethodCall, MethodName, Node,
    Operand,
};
use super::error::ParseError;
use super::lexer::{Token, TokenKind, parse_date};
use std::iter::Peekable;
use std::vec::IntoIter;

/// An entry in the working buffer: a raw token or an already reduced group
#[derive(Debug, Clone)]
pub(crate) enum Item {
    Token(Token),
    Group { group: BooleanGroup, position: usize },
}

impl Item {
    pub(crate) fn position(&self) -> usize {
        match self {
            Item::Token(token) => token.position,
            Item::Group { position, .. } => *position,
        }
    }

    pub(crate) fn is_whitespace(&self) -> bool {
        matches!(self, Item::Token(token) if token.kind == TokenKind::Whitespace)
    }

    pub(crate) fn is_kind(&self, kind: TokenKind) -> bool {
        matches!(self, Item::Token(token) if token.kind == kind)
    }

    fn display(&self) -> String {
        match self {
            Item::Token(token) => token.display_text(),
            Item::Group { .. } => "(...)".to_string(),
        }
    }
}

/// Forward cursor that skips whitespace between significant items
struct Cursor {
    items: Peekable<IntoIter<Item>>,
}

impl Cursor {
    fn new(items: Vec<Item>) -> Self {
        Self {
            items: items.into_iter().peekable(),
        }
    }

    fn next_significant(&mut self) -> Option<Item> {
        while self.items.next_if(Item::is_whitespace).is_some() {}
        self.items.next()
    }

    fn expect_significant(&mut self) -> Result<Item, ParseError> {
        self.next_significant()
            .ok_or(ParseError::UnexpectedEndOfExpression)
    }
}

/// Parse a flat run of items (no unresolved grouping parentheses) into a group.
///
/// Members are joined by a single connective; mixing `and` and `or` at one level
/// is rejected, which is why grouping must be resolved first.
pub(crate) fn parse_clause(items: Vec<Item>) -> Result<BooleanGroup, ParseError> {
    let mut cursor = Cursor::new(items);
    let mut group = BooleanGroup::default();

    loop {
        let item = cursor.expect_significant()?;
        group.members.push(parse_unit(&mut cursor, item)?);

        let Some(next) = cursor.next_significant() else {
            break;
        };
        let connective = match &next {
            Item::Token(token) if token.is_logical() => Connective::from_word(&token.text),
            _ => None,
        }
        .ok_or_else(|| ParseError::ExpectedLogicalOperator {
            found: next.display(),
            position: next.position(),
        })?;

        match group.connective {
            None => group.connective = Some(connective),
            Some(existing) if existing != connective => {
                return Err(ParseError::MixedOperatorsWithoutGrouping {
                    position: next.position(),
                });
            }
            Some(_) => {}
        }
    }

    Ok(group)
}

fn parse_unit(cursor: &mut Cursor, item: Item) -> Result<Node, ParseError> {
    match item {
        Item::Group { group, .. } => Ok(Node::Group(group)),
        Item::Token(token) if token.kind == TokenKind::Word => {
            match MethodName::from_word(&token.text) {
                Some(method) => parse_method(cursor, method, token.position),
                None => parse_comparison(cursor, token),
            }
        }
        Item::Token(token) => Err(ParseError::ExpectedWord {
            found: token.display_text(),
            position: token.position,
        }),
    }
}

fn parse_method(
    cursor: &mut Cursor,
    method: MethodName,
    position: usize,
) -> Result<Node, ParseError> {
    let open = cursor.expect_significant()?;
    if !open.is_kind(TokenKind::OpenParen) {
        return Err(ParseError::UnexpectedToken {
            expected_kind: "'('",
            found: open.display(),
            position: open.position(),
        });
    }

    let mut args = Vec::new();
    let mut positions = Vec::new();
    loop {
        let item = cursor.expect_significant()?;
        if args.is_empty() && item.is_kind(TokenKind::CloseParen) {
            return Err(ParseError::MissingMethodArguments {
                method: method.as_str().to_string(),
                position,
            });
        }
        positions.push(item.position());
        args.push(cast_simple(item)?);

        let separator = cursor.expect_significant()?;
        match &separator {
            Item::Token(token) if token.kind == TokenKind::CloseParen => break,
            Item::Token(token) if token.kind == TokenKind::Symbol && token.text == "," => {}
            _ => {
                return Err(ParseError::MissingArgumentSeparator {
                    found: separator.display(),
                    position: separator.position(),
                });
            }
        }
    }

    if args[0].as_property().is_none() {
        return Err(ParseError::UnexpectedToken {
            expected_kind: "property",
            found: operand_text(&args[0]),
            position,
        });
    }
    if let Some(expected) = method.arity()
        && args.len() != expected
    {
        return Err(ParseError::WrongArgumentCount {
            method: method.as_str().to_string(),
            expected,
            found: args.len(),
            position,
        });
    }
    // Regex methods match against text only.
    if method.arity().is_some()
        && !matches!(args[1], Operand::Literal(Literal::String(Some(_))))
    {
        return Err(ParseError::UnexpectedToken {
            expected_kind: "string",
            found: operand_text(&args[1]),
            position: positions[1],
        });
    }

    Ok(Node::Method(MethodCall { name: method, args }))
}

fn parse_comparison(cursor: &mut Cursor, word: Token) -> Result<Node, ParseError> {
    let left = cast_token(&word)?;
    if left.as_property().is_none() {
        return Err(ParseError::UnexpectedToken {
            expected_kind: "property",
            found: word.display_text(),
            position: word.position,
        });
    }

    let op_item = cursor.expect_significant()?;
    let op = match &op_item {
        Item::Token(token) if token.is_comparison() => ComparisonOp::from_word(&token.text),
        _ => None,
    }
    .ok_or_else(|| ParseError::ExpectedComparisonOperator {
        found: op_item.display(),
        position: op_item.position(),
    })?;

    let right = cast_simple(cursor.expect_significant()?)?;
    Ok(Node::Comparison(Comparison { left, right, op }))
}

fn cast_simple(item: Item) -> Result<Operand, ParseError> {
    match item {
        Item::Token(token) => cast_token(&token),
        Item::Group { position, .. } => Err(ParseError::UnexpectedToken {
            expected_kind: "simple value",
            found: "(...)".to_string(),
            position,
        }),
    }
}

fn cast_token(token: &Token) -> Result<Operand, ParseError> {
    let unexpected = |expected_kind| ParseError::UnexpectedToken {
        expected_kind,
        found: token.display_text(),
        position: token.position,
    };

    match token.kind {
        TokenKind::QuotedString => Ok(Operand::Literal(Literal::String(Some(token.text.clone())))),
        TokenKind::Number => token
            .text
            .parse::<i64>()
            .map(|n| Operand::Literal(Literal::Number(n)))
            .map_err(|_| unexpected("number")),
        TokenKind::Date => parse_date(&token.text)
            .map(|dt| Operand::Literal(Literal::Date(dt)))
            .ok_or_else(|| unexpected("date")),
        TokenKind::Word => Ok(match token.text.as_str() {
            "true" => Operand::Literal(Literal::Boolean(true)),
            "false" => Operand::Literal(Literal::Boolean(false)),
            "null" => Operand::Literal(Literal::String(None)),
            name => Operand::property(name),
        }),
        _ => Err(unexpected("simple value")),
    }
}

fn operand_text(operand: &Operand) -> String {
    match operand {
        Operand::Property(prop) => prop.name.clone(),
        Operand::Literal(Literal::String(None)) => "null".to_string(),
        Operand::Literal(lit) => lit.to_text(),
    }
}
