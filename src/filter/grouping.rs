use super::ast::BooleanGroup;
use super::error::ParseError;
use super::lexer::{Token, TokenKind};
use super::parser::{Item, parse_clause};
use log::debug;

/// Reduce every parenthesized group to a single item, innermost first, then
/// parse what remains as the top level.
///
/// The buffer is rescanned from scratch after every splice. A blank filter
/// yields an empty root group.
pub fn resolve(tokens: Vec<Token>, max_depth: usize) -> Result<BooleanGroup, ParseError> {
    let mut items: Vec<Item> = tokens.into_iter().map(Item::Token).collect();
    if items.iter().all(Item::is_whitespace) {
        return Ok(BooleanGroup::default());
    }

    while let Some((open, close)) = find_innermost(&items)? {
        let position = items[open].position();
        let mut span: Vec<Item> = items.drain(open..=close).collect();
        span.pop();
        span.remove(0);

        let group = parse_clause(span)?;
        let depth = group.depth();
        if depth > max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: max_depth,
                position,
            });
        }
        debug!(
            "Reduced group at position {} ({} members, depth {})",
            position,
            group.members.len(),
            depth
        );
        items.insert(open, Item::Group { group, position });
    }

    parse_clause(items)
}

/// Locate the innermost grouping pair as `(open, close)` indices.
///
/// The innermost pair is the last `(` seen before the first `)`. Method calls
/// are skipped whole since their parentheses are not groups.
fn find_innermost(items: &[Item]) -> Result<Option<(usize, usize)>, ParseError> {
    let mut open = None;
    let mut i = 0;

    while i < items.len() {
        if let Item::Token(token) = &items[i] {
            match token.kind {
                TokenKind::Word if token.is_method() => {
                    i = skip_method(items, i)?;
                    continue;
                }
                TokenKind::OpenParen => open = Some(i),
                TokenKind::CloseParen => {
                    return match open {
                        Some(start) => Ok(Some((start, i))),
                        None => Err(ParseError::UnexpectedToken {
                            expected_kind: "'('",
                            found: ")".to_string(),
                            position: token.position,
                        }),
                    };
                }
                _ => {}
            }
        }
        i += 1;
    }

    match open {
        Some(_) => Err(ParseError::UnexpectedEndOfExpression),
        None => Ok(None),
    }
}

/// Returns the index just past the method's closing parenthesis
fn skip_method(items: &[Item], start: usize) -> Result<usize, ParseError> {
    let mut i = start + 1;
    while i < items.len() && items[i].is_whitespace() {
        i += 1;
    }
    if !items.get(i).is_some_and(|item| item.is_kind(TokenKind::OpenParen)) {
        return Err(ParseError::UnexpectedEndOfExpression);
    }

    items[i + 1..]
        .iter()
        .position(|item| item.is_kind(TokenKind::CloseParen))
        .map(|offset| i + 1 + offset + 1)
        .ok_or(ParseError::UnexpectedEndOfExpression)
}
