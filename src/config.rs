//! Run configuration: where plans are read from, where CSVs go and the
//! defaults applied to values the user leaves blank.
use crate::error::MediaPlanError;
use glob::Pattern;
use std::num::ParseIntError;
use std::path::Path;
use std::path::PathBuf;

pub const DEFAULT_YEAR: i32 = 2025;
pub const DEFAULT_INPUT_DIR: &str = "INPUT";
pub const DEFAULT_OUTPUT_DIR: &str = "OUTPUT";

/// Input and output folders of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directories {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Directories {
    /// Creates both folders if they do not exist yet.
    pub fn create(&self) -> Result<(), MediaPlanError> {
        std::fs::create_dir_all(&self.input)?;
        std::fs::create_dir_all(&self.output)?;
        Ok(())
    }

    /// The `.xlsx` workbooks directly inside the input folder, sorted by name.
    pub fn list_workbooks(&self) -> Result<Vec<PathBuf>, MediaPlanError> {
        let pattern = format!("{}/*.xlsx", Pattern::escape(&self.input.to_string_lossy()));
        let mut files = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
        files.sort();
        Ok(files)
    }

    /// `<output>/insercoes_<file stem>_<sheet>.csv`
    pub fn default_output(&self, file: &Path, sheet: &str) -> PathBuf {
        self.output.join(default_output_name(file, sheet))
    }
}

/// CSV file name for a workbook and sheet: the sheet name is lower-cased and
/// its spaces become underscores.
pub fn default_output_name(file: &Path, sheet: &str) -> String {
    let stem = file.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
    format!("insercoes_{}_{}.csv", stem, sheet.replace(' ', "_").to_lowercase())
}

/// Parses a year answer; blank means [`DEFAULT_YEAR`].
pub fn parse_year(raw: &str) -> Result<i32, ParseIntError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_YEAR);
    }
    raw.parse()
}
