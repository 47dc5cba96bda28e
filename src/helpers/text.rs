//! Text folding used when matching free-form labels

use unicode_normalization::UnicodeNormalization;

/// Decomposes `text` (NFKD), drops every non-ASCII code point and upper-cases
/// the rest, so "Março" and "MARCO" compare equal.
pub(crate) fn fold_ascii_upper(text: &str) -> String {
    text.nfkd()
        .filter(char::is_ascii)
        .map(|character| character.to_ascii_uppercase())
        .collect()
}
