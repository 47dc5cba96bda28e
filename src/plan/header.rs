//! Header rows and the day columns they announce.

use crate::grid::CellValue;
use crate::grid::Grid;
use regex::Regex;
use std::sync::LazyLock;

/// Labels a header row must carry, in any column.
const HEADER_LABELS: [&str; 4] = ["REGION", "CHANNEL", "TV SHOW", "DAYTIME"];

/// Columns from here on hold plan metrics (insertions, GRP, cost), never days.
pub const METRICS_BOUNDARY: usize = 42;

static DAY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,2})\s*$").expect("Hardcode regex pattern"));

/// A column of the block that counts insertions for one day of the month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayColumn {
    pub col: usize,
    pub day: u32,
}

/// Returns true when the text cells of `row` contain every header label.
pub fn is_header(row: &[CellValue]) -> bool {
    HEADER_LABELS.iter().all(|label| {
        row.iter()
            .filter_map(CellValue::as_text)
            .any(|text| text.trim().to_uppercase() == *label)
    })
}

/// Indices of the header rows of `grid`, in order, followed by `grid.rows()`
/// so that consecutive pairs delimit the blocks.
pub fn find_headers(grid: &Grid) -> Vec<usize> {
    let mut headers: Vec<usize> = (0..grid.rows()).filter(|&row| is_header(grid.row(row))).collect();
    headers.push(grid.rows());
    headers
}

/// Day columns of a header row: text labels ending in a one or two digit day
/// ("S05", "QUI 6"), left of [`METRICS_BOUNDARY`].
pub fn day_columns(header: &[CellValue]) -> Vec<DayColumn> {
    header
        .iter()
        .enumerate()
        .take(METRICS_BOUNDARY)
        .filter_map(|(col, value)| {
            let label = value.as_text()?.trim();
            let day = DAY_SUFFIX.captures(label)?.get(1)?.as_str().parse::<u32>().ok()?;
            (1..=31).contains(&day).then_some(DayColumn { col, day })
        })
        .collect()
}
