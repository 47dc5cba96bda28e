use crate::grid::CellValue;
use crate::grid::Grid;
use crate::spreadsheet::cell::Cell;

/// The non-empty cells of one worksheet, in document order.
pub struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell, widening the data range.
    pub(super) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Lays the cells out as a dense grid anchored at A1. Cells absent from the
    /// worksheet, and cells whose value coerces to nothing, are `Empty`.
    pub(crate) fn to_grid(&self) -> Grid {
        let (rows, cols) = match self.row_upper_bound.zip(self.col_upper_bound) {
            Some((row_upper_bound, col_upper_bound)) => (row_upper_bound + 1, col_upper_bound + 1),
            None => return Grid::default(),
        };
        let mut table = vec![vec![CellValue::Empty; cols]; rows];
        for cell in &self.cells {
            table[cell.row][cell.col] = cell.to_value();
        }
        Grid::new(table)
    }
}
