//! Construction-time SQL shape checks.
//!
//! The validator only ever needs to answer two questions about a query:
//! is it a `SELECT` returning exactly one column, and is it an `INSERT` or
//! `UPDATE`. Placeholders are masked with `?` before inspection so that
//! `!{key}` fragments never confuse the tokenization.

use crate::placeholders;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlShapeError {
    NotASelect,
    NotSingleColumn,
    NotAWrite,
    Malformed,
}

/// Checks that `query` is a `SELECT` with exactly one select item.
/// `select *` is rejected: the read state stores a single column's values.
pub fn expect_single_column_select(query: &str) -> Result<(), SqlShapeError> {
    let masked = placeholders::mask(query, "?");
    let trimmed = masked.trim();
    if trimmed.is_empty() {
        return Err(SqlShapeError::Malformed);
    }

    let lowered = trimmed.to_ascii_lowercase();
    let Some(rest) = lowered.strip_prefix("select") else {
        return Err(SqlShapeError::NotASelect);
    };
    if !rest.starts_with(char::is_whitespace) {
        return Err(SqlShapeError::NotASelect);
    }

    let select_list = match rest.find(" from ") {
        Some(position) => &rest[..position],
        None => rest,
    };
    let select_list = select_list.trim();
    if select_list.is_empty() {
        return Err(SqlShapeError::Malformed);
    }
    if select_list.contains('*') {
        return Err(SqlShapeError::NotSingleColumn);
    }
    if split_top_level_commas(select_list).len() != 1 {
        return Err(SqlShapeError::NotSingleColumn);
    }
    Ok(())
}

/// Checks that `query` is an `INSERT` or `UPDATE` statement.
pub fn expect_write_statement(query: &str) -> Result<(), SqlShapeError> {
    let masked = placeholders::mask(query, "?");
    let lowered = masked.trim().to_ascii_lowercase();
    let mut tokens = lowered.split_whitespace();

    match tokens.next() {
        Some("insert") => {
            if tokens.next() != Some("into") {
                return Err(SqlShapeError::Malformed);
            }
            Ok(())
        }
        Some("update") => {
            if !lowered.contains(" set ") {
                return Err(SqlShapeError::Malformed);
            }
            Ok(())
        }
        Some(_) => Err(SqlShapeError::NotAWrite),
        None => Err(SqlShapeError::Malformed),
    }
}

/// Splits a select list on commas that sit outside parentheses, so that
/// function calls like `coalesce(a, b)` count as one item.
fn split_top_level_commas(list: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (position, character) in list.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(list[start..position].trim());
                start = position + 1;
            }
            _ => {}
        }
    }
    items.push(list[start..].trim());
    items
}
