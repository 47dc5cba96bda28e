//! Month cues in free text: month names and abbreviations (Portuguese and
//! English) or a `dd/mm` date range.

use crate::grid::CellValue;
use crate::helpers::text::fold_ascii_upper;
use regex::Regex;
use std::sync::LazyLock;

/// Aliases are matched as substrings of the folded text, first hit wins.
const MONTH_ALIASES: [(&str, u32); 20] = [
    ("JAN", 1),
    ("FEV", 2),
    ("FEB", 2),
    ("MAR", 3),
    ("ABR", 4),
    ("APR", 4),
    ("MAI", 5),
    ("MAIO", 5),
    ("MAY", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("AGO", 8),
    ("AUG", 8),
    ("SET", 9),
    ("SEP", 9),
    ("OUT", 10),
    ("OCT", 10),
    ("NOV", 11),
    ("DEZ", 12),
    ("DEC", 12),
];

static DATE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,2})/([0-9]{1,2})").expect("Hardcode regex pattern"));

/// Resolves the month a cell refers to. Only text cells carry month cues.
pub fn resolve_month(value: &CellValue) -> Option<u32> {
    value.as_text().and_then(month_from_text)
}

/// Resolves the month named in `text`, e.g. "FEVEREIRO" or "18/02 A 28/02".
///
/// A month alias anywhere in the text wins over a date range; for a date
/// range the month of the first `dd/mm` pair is used.
pub fn month_from_text(text: &str) -> Option<u32> {
    let folded = fold_ascii_upper(text);
    if let Some((_, month)) = MONTH_ALIASES.iter().find(|(alias, _)| folded.contains(alias)) {
        return Some(*month);
    }
    DATE_RANGE
        .captures(&folded)
        .and_then(|captures| captures.get(2))
        .and_then(|matcher| matcher.as_str().parse::<u32>().ok())
        .filter(|month| (1..=12).contains(month))
}

/// The first month cue among `cells`, scanning left to right.
pub fn first_month(cells: &[CellValue]) -> Option<u32> {
    cells.iter().find_map(resolve_month)
}
