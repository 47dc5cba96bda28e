//! # Media Plan Insertions
//!
//! Reads TV media plans kept as Excel workbooks and lists every planned ad
//! insertion as one CSV row.
//!
//! ## Features
//!
//! - **Workbook reading**: `.xlsx` and `.xlsm` files read straight from their zip
//!   container, with shared strings and number formats resolved
//! - **Moving layouts**: header rows are found by their labels wherever they sit,
//!   and a sheet may hold several blocks, one per month
//! - **Month detection**: month names in Portuguese or English, or `dd/mm` date
//!   ranges, written above a header, in it or inside its block
//! - **Count expansion**: a day cell planning N insertions yields N records
//! - **CSV output**: `Canal,TV_Show,Data,Horario_inicial,Horario_final`, sorted by
//!   date, channel, show and start time
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub(crate) mod helpers;
pub mod output;
pub mod plan;
pub mod spreadsheet;

pub use error::MediaPlanError;
pub use grid::CellValue;
pub use grid::Grid;
pub use plan::extract_insertions;
pub use plan::InsertionRecord;
