//! The raw cell grid handed from the spreadsheet reader to the plan parser.

use std::fmt::Display;

/// A cell value after type coercion at the reader boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[default]
    Empty,
}

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    /// The text of a `Text` cell; numbers and empty cells have none.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Number of insertions a day cell stands for.
    ///
    /// Numbers are truncated toward zero; text counts only when it holds a
    /// whole number. Anything else, or a value not above zero, counts 0.
    /// Numbers beyond `u64::MAX` saturate; bounding the count is up to the caller.
    pub fn insertion_count(&self) -> u64 {
        match self {
            CellValue::Number(value) if value.is_finite() && *value > 0.0 => value.trunc() as u64,
            CellValue::Text(text) => text
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|count| *count > 0)
                .map(|count| count as u64)
                .unwrap_or(0),
            _ => 0,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// An immutable, row-major table of cells addressed from A1 = (0, 0).
/// Rows may be ragged; anything outside the stored cells reads as `Empty`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    table: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(table: Vec<Vec<CellValue>>) -> Self {
        Self { table }
    }

    pub fn rows(&self) -> usize {
        self.table.len()
    }


    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.table
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

    /// The stored cells of `row`, empty when the row is out of range.
    pub fn row(&self, row: usize) -> &[CellValue] {
        self.table.get(row).map(Vec::as_slice).unwrap_or(&[])
    }
}
