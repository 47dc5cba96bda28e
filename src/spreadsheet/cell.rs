use crate::grid::CellValue;
use crate::spreadsheet::reference::index_to_reference;

/// Types of cell data found in a worksheet part.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 0/1
    Boolean,
    /// Plain numeric values
    Number,
    /// Numbers carrying a date, time or datetime number format
    NumberDateTime,
    /// ISO 8601 date/time strings (`t="d"`)
    IsoDateTime,
    /// Inline or formula string values
    InlineString,
    /// Index into the shared string table
    SharedString,
    /// Error values such as `#N/A`
    Error,
}

impl CellType {
    /// Maps built-in number format IDs that render dates or times.
    pub(crate) fn parse_builtin_number_format_id(id: &str) -> Option<Self> {
        match id {
            "14" | "15" | "16" | "17" | "18" | "19" | "20" | "21" | "22" | "45" | "46" | "47" => {
                Some(Self::NumberDateTime)
            }
            _ => None,
        }
    }

    /// Classifies a custom number format code: any date or time token outside
    /// literals, escapes and bracketed sections makes it a date/time format.
    pub(crate) fn parse_custom_number_format(format: &str) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date_or_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' | 'H' | 'h' | 'S' | 's' => is_date_or_time = true,
                _ => (),
            }
        }

        if is_date_or_time {
            Self::NumberDateTime
        } else {
            Self::Number
        }
    }
}

/// A single non-empty cell read from a worksheet.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw value text; for `SharedString` the table index until resolved
    pub(crate) value: String,
}

impl Cell {
    /// Returns the A1-style reference of the cell.
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Coerces the raw cell into the grid's closed value type.
    ///
    /// Dates, times and error cells become `Empty`: they are neither labels
    /// nor counts for the media plan parser.
    pub(crate) fn to_value(&self) -> CellValue {
        match self.kind {
            CellType::InlineString | CellType::SharedString if !self.value.is_empty() => {
                CellValue::Text(self.value.to_owned())
            }
            CellType::Number => self
                .value
                .trim()
                .parse::<f64>()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Empty),
            CellType::Boolean => CellValue::Number(if self.value == "1" { 1.0 } else { 0.0 }),
            CellType::NumberDateTime | CellType::IsoDateTime | CellType::Error => {
                log::trace!("{} holds {:?} '{}', read as empty", self.reference(), self.kind, self.value);
                CellValue::Empty
            }
            _ => CellValue::Empty,
        }
    }
}
