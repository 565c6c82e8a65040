//! Statement routing.
//!
//! The pure-Rust driver does not report the prepared statement type, so the
//! driver adapter picks the cursor path, the singleton-output path or the
//! plain execute path from the statement's keywords. Comments, literals and
//! whitespace are skipped by tokenizing with
//! [sqlparser](https://docs.rs/sqlparser/).

use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// How a statement's result is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementShape {
    /// Produces a result set: fetch all rows.
    Rows,
    /// Produces a single output row: execute, commit and return that row.
    Returning,
    /// Produces no result set: execute, commit and report affected rows.
    Affected,
}

/// Classify a statement by its keywords.
///
/// `SELECT`, `WITH` and `EXECUTE BLOCK ... RETURNS (...) AS` produce rows.
/// DML with a `RETURNING` clause and `EXECUTE PROCEDURE` produce one output
/// row. Everything else is executed for its effect.
pub fn classify(sql: &str) -> StatementShape {
    let words = keywords(sql);
    let mut iter = words.iter().map(String::as_str);

    match iter.next() {
        Some("SELECT") | Some("WITH") => StatementShape::Rows,
        Some("EXECUTE") => match iter.next() {
            // Output parameters are declared before the AS that opens the body
            Some("BLOCK") if iter.by_ref().take_while(|w| *w != "AS").any(|w| w == "RETURNS") => {
                StatementShape::Rows
            }
            Some("PROCEDURE") => StatementShape::Returning,
            _ => StatementShape::Affected,
        },
        Some("INSERT") | Some("UPDATE") | Some("DELETE") | Some("MERGE")
            if iter.any(|w| w == "RETURNING") =>
        {
            StatementShape::Returning
        }
        _ => StatementShape::Affected,
    }
}

/// Upper-cased words, ignoring comments, literals, whitespace and punctuation.
fn keywords(sql: &str) -> Vec<String> {
    let dialect = GenericDialect {};
    match Tokenizer::new(&dialect, sql).tokenize() {
        Ok(tokens) => tokens
            .into_iter()
            .filter_map(|token| match token {
                Token::Word(word) => Some(word.value.to_uppercase()),
                _ => None,
            })
            .collect(),
        // Let the engine report the syntax error; route by the bare words
        Err(_) => sql
            .split_whitespace()
            .map(|w| {
                w.trim_start_matches('(')
                    .trim_end_matches(|c: char| !c.is_alphanumeric())
                    .to_uppercase()
            })
            .collect(),
    }
}
