//! Block parser: walks the blocks of a sheet in order, keeps the month
//! context and expands day counts into insertion records.
use crate::grid::CellValue;
use crate::grid::Grid;
use crate::plan::header::day_columns;
use crate::plan::header::find_headers;
use crate::plan::header::DayColumn;
use crate::plan::month::first_month;
use crate::plan::month::resolve_month;
use crate::plan::record::InsertionRecord;
use chrono::NaiveDate;

/// Rows above a header searched for a month label.
pub const MONTH_LOOKBACK_ROWS: usize = 5;

/// Most insertions one day cell may plan; larger counts are typos and skipped.
pub const MAX_INSERTIONS_PER_CELL: u32 = 1000;

const COL_MARKER: usize = 1;
const COL_CHANNEL: usize = 2;
const COL_SHOW: usize = 3;
const COL_DAYTIME: usize = 4;

/// Month of the block being parsed and the last month seen in the sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct MonthContext {
    block: Option<u32>,
    last: Option<u32>,
}

impl MonthContext {
    fn promote(&mut self, month: u32) {
        self.block = Some(month);
        self.last = Some(month);
    }

    /// Takes `month` only while the block month is unknown.
    fn adopt_if_unknown(&mut self, month: Option<u32>) {
        if let (None, Some(month)) = (self.block, month) {
            self.promote(month);
        }
    }
}

/// Channel, show and time range of a data row.
#[derive(Debug, PartialEq, Eq)]
struct Slot {
    channel: String,
    show: String,
    start_time: String,
    end_time: String,
}

impl Slot {
    fn parse(cells: &[CellValue]) -> Option<Self> {
        let channel = field(cells, COL_CHANNEL)?;
        let show = field(cells, COL_SHOW)?;
        let daytime = cells.get(COL_DAYTIME)?.as_text()?;
        if !daytime.contains('-') {
            return None;
        }
        let mut parts = daytime.split('-').map(str::trim);
        let start_time = parts.next().filter(|part| !part.is_empty())?;
        let end_time = parts.next().filter(|part| !part.is_empty())?;
        Some(Self {
            channel,
            show,
            start_time: start_time.to_owned(),
            end_time: end_time.to_owned(),
        })
    }
}

/// Text of a required cell; blank cells are missing.
fn field(cells: &[CellValue], col: usize) -> Option<String> {
    let value = cells.get(col)?.to_string();
    (!value.trim().is_empty()).then_some(value)
}

fn is_total_marker(value: &CellValue) -> bool {
    value
        .as_text()
        .map(|text| text.trim().to_uppercase().starts_with("TOTAL"))
        .unwrap_or(false)
}

/// Month label closest above the header: rows are searched upwards and the
/// first row with a cue decides. Within that row the leftmost cue is taken,
/// so "FEV | MAR" on one line reads as February.
fn lookback_month(grid: &Grid, header: usize) -> Option<u32> {
    (header.saturating_sub(MONTH_LOOKBACK_ROWS)..header)
        .rev()
        .find_map(|row| first_month(grid.row(row)))
}

/// Parses the block whose header is at row `header` and whose data rows end
/// before `end`. `last_month` is the month carried over from the previous
/// blocks; the month carried to the next block is returned with the records.
pub fn parse_block(
    grid: &Grid,
    header: usize,
    end: usize,
    year: i32,
    last_month: Option<u32>,
) -> (Vec<InsertionRecord>, Option<u32>) {
    let mut months = MonthContext {
        block: None,
        last: last_month,
    };
    if let Some(month) = lookback_month(grid, header) {
        months.last = Some(month);
    }
    if let Some(month) = first_month(grid.row(header)) {
        months.last = Some(month);
    }
    months.block = months.last;

    let rows = header + 1..end;
    if months.block.is_none() {
        if let Some(month) = rows.clone().find_map(|row| first_month(grid.row(row))) {
            months.promote(month);
        }
    }

    let days = day_columns(grid.row(header));
    if days.is_empty() || months.block.is_none() {
        log::debug!(
            "Skip block at row {}: {} day columns, month {:?}",
            header + 1,
            days.len(),
            months.block
        );
        return (Vec::new(), months.last);
    }

    let mut records = Vec::new();
    for row in rows {
        let cells = grid.row(row);
        if months.block.is_none() {
            if let Some(month) = first_month(cells) {
                months.promote(month);
            }
        }

        let marker = grid.get(row, COL_MARKER);
        if is_total_marker(marker) {
            months.adopt_if_unknown(resolve_month(marker));
            log::trace!("Row {} is a total row", row + 1);
            continue;
        }

        let Some(slot) = Slot::parse(cells) else {
            log::trace!("Row {} has no channel, show or time range", row + 1);
            continue;
        };
        let Some(month) = months.block else {
            log::trace!("Row {} has no month", row + 1);
            continue;
        };
        expand_row(&mut records, cells, &slot, &days, year, month);
    }
    log::debug!(
        "Block at row {} (month {:?}) produced {} records",
        header + 1,
        months.block,
        records.len()
    );
    (records, months.last)
}

/// Appends one record per insertion counted in the day columns of a row.
fn expand_row(
    records: &mut Vec<InsertionRecord>,
    cells: &[CellValue],
    slot: &Slot,
    days: &[DayColumn],
    year: i32,
    month: u32,
) {
    for day in days {
        let raw_count = cells.get(day.col).map(CellValue::insertion_count).unwrap_or(0);
        if raw_count == 0 {
            continue;
        }
        let Some(count) = u32::try_from(raw_count)
            .ok()
            .filter(|count| *count <= MAX_INSERTIONS_PER_CELL)
        else {
            log::debug!(
                "Skip count {} in column {} (day {}): above {}",
                raw_count,
                day.col + 1,
                day.day,
                MAX_INSERTIONS_PER_CELL
            );
            continue;
        };
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day.day) else {
            log::debug!("Skip {} insertions on invalid date {}-{:02}-{:02}", count, year, month, day.day);
            continue;
        };
        let record = InsertionRecord {
            channel: slot.channel.clone(),
            show: slot.show.clone(),
            date,
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
        };
        records.extend(std::iter::repeat(record).take(count as usize));
    }
}

/// Parses every block of `grid` in order, threading the last known month from
/// one block into the next. Records come out in sheet order.
pub fn parse_sheet(grid: &Grid, year: i32) -> Vec<InsertionRecord> {
    let headers = find_headers(grid);
    let (records, _) = headers
        .windows(2)
        .fold((Vec::new(), None), |(mut records, last_month), bounds| {
            let (block, last_month) = parse_block(grid, bounds[0], bounds[1], year, last_month);
            records.extend(block);
            (records, last_month)
        });
    records
}
