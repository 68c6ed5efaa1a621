//! # Spreadsheet Source
//!
//! Turns a workbook into sheets of plain text rows. The decoder only needs
//! the number of sheets and, per sheet, the cell text of every row, so that
//! is all the [`Spreadsheet`] trait exposes.
//!
//! Office Open XML workbooks are read by [`XlsxSpreadsheet`]; callers that
//! already hold cell data can wrap it in a [`MemorySpreadsheet`].
use crate::error::XlMapperError;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

pub(crate) mod cell;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

pub use xlsx::XlsxSpreadsheet;

/// Errors raised while reading a workbook.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Cannot detect file format for '{0}'")]
    FileFormatError(String),

    #[error("Missing part '{0}' in spreadsheet package")]
    FileError(String),

    #[error("Spreadsheet '{0}' is password protected")]
    SpreadsheetPasswordProtectedError(String),


    #[error("Sheet #{0} not found")]
    SheetNotFoundError(usize),

    #[error("Cell reference '{0}' is outside the worksheet grid")]
    CellReferenceError(String),

    #[error("Invalid cell value '{1}' at {0}")]
    CellValueError(String, String),
}

/// A workbook that can hand out the text of its sheets.
pub trait Spreadsheet {
    /// Returns the file name (or caller supplied name) of this spreadsheet
    fn name(&self) -> String;

    /// Returns the sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Returns the number of sheets
    fn sheet_count(&self) -> usize {
        self.sheet_names().len()
    }

    /// Reads every row of the sheet at `index` (0-based).
    ///
    /// Element `r` of the result is worksheet row `r`; rows without data are
    /// empty vectors. A row is as long as its last populated column, earlier
    /// blank cells are empty strings.
    fn read_rows(&mut self, index: usize) -> Result<Vec<Vec<String>>, XlMapperError>;
}

/// Opens a spreadsheet file, choosing the reader from the file extension.
///
/// Supported: `.xlsx`, `.xlsm`, `.xltx`, `.xltm`, `.xlam`.
pub fn open<P>(path: P) -> Result<Box<dyn Spreadsheet>, XlMapperError>
where
    P: AsRef<Path>,
{
    let extension = path.as_ref()
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xltx") | Some("xltm") | Some("xlam") => {
            Ok(Box::new(XlsxSpreadsheet::open(path)?))
        }
        _ => Err(SpreadsheetError::FileFormatError(path.as_ref().to_string_lossy().to_string()).into()),
    }
}

/// Sheets of text rows held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySpreadsheet {
    name: String,
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl MemorySpreadsheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            sheets: Vec::new(),
        }
    }

    /// Appends a sheet and returns the spreadsheet for chaining.
    pub fn with_sheet<R, C, S>(mut self, name: &str, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.sheets.push((name.to_owned(), rows));
        self
    }
}

impl Spreadsheet for MemorySpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    fn read_rows(&mut self, index: usize) -> Result<Vec<Vec<String>>, XlMapperError> {
        let (_, rows) = self.sheets.get(index).ok_or(SpreadsheetError::SheetNotFoundError(index))?;
        Ok(rows.clone())
    }
}
