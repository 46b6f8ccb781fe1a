//! Command-line item classification (`key:value` headers, `key=value` data)

use crate::constants::{SEP_COMMON, SEP_DATA};
use crate::error::ItemError;
use crate::models::Token;

/// Separators accepted for `--auth` and `--proxy`
pub const COMMON_SEPARATORS: &[char] = &[SEP_COMMON];

/// Separators accepted for positional request items
pub const ITEM_SEPARATORS: &[char] = &[SEP_COMMON, SEP_DATA];

/// Split `input` at the earliest occurrence of any of `separators`.
///
/// Only the first split counts; later separators stay in the value verbatim.
pub fn classify(input: &str, separators: &[char]) -> Result<Token, ItemError> {
    let (position, separator) = input
        .char_indices()
        .find(|(_, c)| separators.contains(c))
        .ok_or_else(|| ItemError::InvalidToken(input.to_string()))?;

    Ok(Token {
        key: input[..position].to_string(),
        value: input[position + separator.len_utf8()..].to_string(),
        separator,
    })
}

/// Value parser for positional items
pub fn parse_item(input: &str) -> Result<Token, ItemError> {
    classify(input, ITEM_SEPARATORS)
}

/// Value parser for `key:value` options
pub fn parse_common(input: &str) -> Result<Token, ItemError> {
    classify(input, COMMON_SEPARATORS)
}
