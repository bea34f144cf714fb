use crate::filter::{Token, TokenKind};
use comfy_table::{Cell, Table};

/// Render tokens as a table with kind, text and position columns
pub fn format_tokens_table(tokens: &[Token]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Kind", "Text", "Position"]);

    for (idx, token) in tokens.iter().enumerate() {
        let text = match token.kind {
            // Make whitespace and quoted text visible as-is
            TokenKind::Whitespace | TokenKind::QuotedString => format!("{:?}", token.text),
            _ => token.text.clone(),
        };
        table.add_row(vec![
            Cell::new(idx),
            Cell::new(token.kind),
            Cell::new(text),
            Cell::new(token.position),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tokenize;

    #[test]
    fn test_tokens_table_lists_every_token() {
        let tokens = tokenize("name eq 'Bob'").unwrap();
        let table = format_tokens_table(&tokens);
        assert!(table.contains("Kind"));
        assert!(table.contains("whitespace"));
        assert!(table.contains("\"Bob\""));
        assert!(table.contains("word"));
    }
}
