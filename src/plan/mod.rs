//! # Media Plan Parsing
//!
//! A media plan sheet is a sequence of blocks. Each block starts at a header
//! row carrying the REGION, CHANNEL, TV SHOW and DAYTIME labels followed by
//! one column per day of the month; the month itself is written somewhere
//! around the header. Every data row below a header gives a channel, a show
//! and a time slot, and each day cell counts how many times the slot airs on
//! that day.
use crate::grid::Grid;
use thiserror::Error;

pub mod header;
pub mod month;
pub mod parser;
pub mod record;

pub use header::DayColumn;
pub use parser::parse_sheet;
pub use record::InsertionRecord;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("No header row with REGION, CHANNEL, TV SHOW and DAYTIME found")]
    NoHeaderRow,

    #[error("No insertions found")]
    NoInsertions,
}

/// Extracts the insertions of a plan sheet in sheet order.
///
/// A sheet without any header row, or whose blocks yield no record, is an
/// error: it most likely is the wrong sheet.
pub fn extract_insertions(grid: &Grid, year: i32) -> Result<Vec<InsertionRecord>, PlanError> {
    if header::find_headers(grid).len() < 2 {
        return Err(PlanError::NoHeaderRow);
    }
    let records = parse_sheet(grid, year);
    if records.is_empty() {
        return Err(PlanError::NoInsertions);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;

    fn header() -> Vec<CellValue> {
        vec![
            CellValue::Empty,
            "REGION".into(),
            "CHANNEL".into(),
            "TV SHOW".into(),
            "DAYTIME".into(),
            "S01".into(),
        ]
    }

    #[test]
    fn empty_grid_has_no_header() {
        assert_eq!(extract_insertions(&Grid::default(), 2025), Err(PlanError::NoHeaderRow));
    }

    #[test]
    fn header_without_counts_has_no_insertions() {
        let grid = Grid::new(vec![
            vec![CellValue::Empty, "JAN".into()],
            header(),
            vec![CellValue::Empty, "SP".into(), "GLOBO".into(), "Jornal".into(), "12:00 - 12:30".into()],
        ]);
        assert_eq!(extract_insertions(&grid, 2025), Err(PlanError::NoInsertions));
    }

    #[test]
    fn extracts_records() {
        let grid = Grid::new(vec![
            vec![CellValue::Empty, "JAN".into()],
            header(),
            vec![
                CellValue::Empty,
                "SP".into(),
                "GLOBO".into(),
                "Jornal".into(),
                "12:00 - 12:30".into(),
                2.0.into(),
            ],
        ]);
        let records = extract_insertions(&grid, 2024).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
