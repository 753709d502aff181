//! Statement splitting.
//!
//! A candidate may hold several `;`-separated statements. Only the first is
//! prepared and run, so each candidate yields exactly one result set.

use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Returns the first statement of `sql`, without its terminating `;`.
///
/// Text that does not tokenize (unterminated quotes, prose) is returned
/// trimmed and unchanged so the database reports the error.
pub fn first_statement(sql: &str) -> String {
    let dialect = SQLiteDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize() {
        Ok(tokens) => tokens,
        Err(_) => return sql.trim().to_string(),
    };

    let mut statement = String::new();
    let mut has_content = false;

    for token in &tokens {
        match token {
            Token::EOF => break,
            Token::SemiColon if has_content => break,
            // Empty statement before any content.
            Token::SemiColon => statement.clear(),
            Token::Whitespace(_) => statement.push_str(&token.to_string()),
            _ => {
                has_content = true;
                statement.push_str(&token.to_string());
            }
        }
    }

    if has_content {
        statement.trim().to_string()
    } else {
        sql.trim().to_string()
    }
}
