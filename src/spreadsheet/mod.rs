//! # Spreadsheet Reading Module
//!
//! Reads Excel 2007+ workbooks (`.xlsx`, `.xlsm`) straight from their zip
//! container: sheet enumeration, shared strings, number formats and the raw
//! cell stream of a worksheet. A worksheet is handed to the plan parser as a
//! [`Grid`] of coerced cell values.
use crate::error::MediaPlanError;
use crate::grid::Grid;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

pub(crate) mod cell;
pub(crate) mod excel;
pub(crate) mod reference;
pub mod sheet;
pub mod xlsx;

pub use sheet::Sheet;
pub use xlsx::XlsxSpreadsheet;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Missing workbook part '{0}'")]
    FileError(String),

    #[error("Spreadsheet '{0}' contains no sheets")]
    SpreadsheetEmptyError(String),

    #[error("Sheet '{1}' not found in '{0}'")]
    SheetNotFoundError(String, String),

    #[error("Cannot detect spreadsheet format for '{0}'")]
    UnsupportedFormatError(String),
}

/// A workbook that can list its sheets and read one of them.
pub trait Spreadsheet {
    /// Returns the file name of this spreadsheet
    fn name(&self) -> String;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    fn read_sheet(&mut self, sheet_name: &str) -> Result<Sheet, MediaPlanError>;

    /// Reads a sheet as a dense grid with no header interpretation.
    fn read_grid(&mut self, sheet_name: &str) -> Result<Grid, MediaPlanError> {
        self.read_sheet(sheet_name).map(|sheet| sheet.to_grid())
    }
}

/// Opens a spreadsheet, choosing the reader from the file extension.
pub fn open_spreadsheet(path: &Path) -> Result<Box<dyn Spreadsheet>, MediaPlanError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => {
            let spreadsheet: Box<dyn Spreadsheet> = Box::new(XlsxSpreadsheet::open(path)?);
            Ok(spreadsheet)
        }
        _ => Err(SpreadsheetError::UnsupportedFormatError(path.to_string_lossy().to_string()).into()),
    }
}
