//! # Row Decoder
//!
//! Reads one sheet, resolves its header row and hands out the following rows
//! one at a time as [`RowMap`]s or, through the field mapper, as records.
//!
//! ```no_run
//! use xlmapper::{record, Decoder};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     struct Line {
//!         #[header = "Number"] number: i64,
//!         #[header = "Name"] name: String,
//!     }
//! }
//!
//! let mut decoder = Decoder::open("lines.xlsx", 0, 0)?;
//! while decoder.has_next_row() {
//!     let mut line = Line::default();
//!     decoder.unmarshal_next_row(&mut line)?;
//!     println!("{line:?}");
//! }
//! # Ok::<(), xlmapper::XlMapperError>(())
//! ```
use crate::error::XlMapperError;
use crate::mapper::{unmarshal_row, Record};
use crate::spreadsheet::{self, Spreadsheet};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;

mod header;
mod row;

pub use header::HeaderSet;
pub use row::RowMap;

/// Errors raised by the decoder and the field mapper.
#[derive(Error, Debug)]
pub enum DecoderError {
    /// Invalid construction arguments
    #[error("{0}")]
    ConfigurationError(String),

    /// A row was requested after the last one was consumed
    #[error("no more rows to read")]
    ExhaustionError,

    /// A tagged field has a type other than integer or string
    #[error("invalid field type for `{tag}`, must be int or string")]
    InvalidFieldTypeError { tag: String },

    /// A tagged field cannot be written
    #[error("unable to set value for `{tag}`")]
    UnsettableFieldError { tag: String },

    /// A non-empty cell is not a base-10 integer; displays the parse error as is
    #[error("{source}")]
    ConversionError {
        tag: String,
        #[source]
        source: ParseIntError,
    },
}

/// Construction parameters for a [`Decoder`].
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Header row index (0-based)
    pub header_row: usize,

    /// Sheet index (0-based), used unless `sheet_name` is set
    pub sheet_index: usize,

    /// Select the sheet by exact name instead of by index
    pub sheet_name: Option<String>,

    /// Drop data rows whose cells are all empty.
    pub skip_empty_rows: bool,

    /// Stop reading at the first data row whose cells are all empty.
    pub end_at_empty_row: bool,
}

impl Criteria {
    pub fn new(header_row: usize, sheet_index: usize) -> Self {
        Self {
            header_row,
            sheet_index,
            ..Self::default()
        }
    }
}

/// Pull-based reader over the data rows of one sheet.
///
/// The header is parsed once at construction and never changes. Rows are
/// consumed as they are read; there is no rewind.
#[derive(Debug)]
pub struct Decoder {
    header: HeaderSet,
    pending: VecDeque<Vec<String>>,
    skip_empty_rows: bool,
    end_at_empty_row: bool,
}

impl Decoder {
    /// Opens `path` and decodes sheet `sheet_index`, using row `header_row` as the header.
    pub fn open<P: AsRef<Path>>(path: P, header_row: usize, sheet_index: usize) -> Result<Self, XlMapperError> {
        Self::open_with(path, &Criteria::new(header_row, sheet_index))
    }

    /// Opens `path` and decodes the sheet selected by `criteria`.
    pub fn open_with<P: AsRef<Path>>(path: P, criteria: &Criteria) -> Result<Self, XlMapperError> {
        let mut spreadsheet = spreadsheet::open(path)?;
        Self::from_spreadsheet(spreadsheet.as_mut(), criteria)
    }

    /// Decodes a sheet of an already opened spreadsheet.
    pub fn from_spreadsheet(spreadsheet: &mut dyn Spreadsheet, criteria: &Criteria) -> Result<Self, XlMapperError> {
        let sheet_index = match &criteria.sheet_name {
            Some(name) => spreadsheet
                .sheet_names()
                .iter()
                .position(|sheet_name| sheet_name == name)
                .ok_or_else(|| DecoderError::ConfigurationError(format!("sheet '{name}' not found")))?,
            None if criteria.sheet_index >= spreadsheet.sheet_count() => {
                Err(DecoderError::ConfigurationError("invalid sheet index".to_owned()))?
            }
            None => criteria.sheet_index,
        };
        let rows = spreadsheet.read_rows(sheet_index)?;
        tracing::debug!(file = %spreadsheet.name(), sheet = sheet_index, rows = rows.len(), "Loaded sheet");
        Self::from_rows(rows, criteria)
    }

    /// Decodes rows that were read elsewhere. Sheet selection in `criteria` is ignored.
    pub fn from_rows(mut rows: Vec<Vec<String>>, criteria: &Criteria) -> Result<Self, XlMapperError> {
        if criteria.header_row + 1 >= rows.len() {
            Err(DecoderError::ConfigurationError(
                "not enough rows, must be at least header + 1".to_owned(),
            ))?
        }

        let data = rows.split_off(criteria.header_row + 1);
        let header = HeaderSet::resolve(&rows[criteria.header_row]);
        tracing::debug!(names = ?header.names(), skip = header.skip(), rows = data.len(), "Resolved header");

        let mut decoder = Decoder {
            header,
            pending: data.into(),
            skip_empty_rows: criteria.skip_empty_rows,
            end_at_empty_row: criteria.end_at_empty_row,
        };
        decoder.settle();
        Ok(decoder)
    }

    /// Applies the blank-row filters to the front of the queue so that
    /// `has_next_row` reflects what `next_row` will produce.
    fn settle(&mut self) {
        if !self.skip_empty_rows && !self.end_at_empty_row {
            return;
        }
        while let Some(row) = self.pending.front() {
            if !self.is_blank(row) {
                break;
            }
            if self.end_at_empty_row {
                tracing::debug!(dropped = self.pending.len(), "Reached empty row, ending data");
                self.pending.clear();
            } else {
                tracing::debug!("Skipped empty row");
                self.pending.pop_front();
            }
        }
    }

    fn is_blank(&self, row: &[String]) -> bool {
        row.iter().skip(self.header.skip()).all(String::is_empty)
    }

    pub fn header(&self) -> &HeaderSet {
        &self.header
    }

    /// Returns true while at least one data row is left.
    pub fn has_next_row(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of data rows left.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Consumes the next data row.
    ///
    /// Header name `i` receives the cell at column `skip + i`. Reading stops
    /// at the end of a short row, so its missing trailing columns are absent
    /// from the map rather than empty.
    pub fn next_row(&mut self) -> Result<RowMap, XlMapperError> {
        let row = self.pending.pop_front().ok_or(DecoderError::ExhaustionError)?;
        let mut map = RowMap::new();
        for (column, name) in self.header.columns() {
            match row.get(column) {
                Some(value) => map.insert(name, value),
                None => break,
            };
        }
        self.settle();
        tracing::trace!(entries = map.len(), remaining = self.pending.len(), "Decoded row");
        Ok(map)
    }

    /// Reads the next row and assigns it onto `record`.
    pub fn unmarshal_next_row<T: Record>(&mut self, record: &mut T) -> Result<(), XlMapperError> {
        let row = self.next_row()?;
        unmarshal_row(&row, record)
    }

    /// Decodes every remaining row into a fresh `T::default()`.
    ///
    /// The iterator ends after the first error it yields.
    pub fn records<T: Record + Default>(&mut self) -> Records<'_, T> {
        Records {
            decoder: self,
            failed: false,
            record: PhantomData,
        }
    }
}

impl Iterator for Decoder {
    type Item = RowMap;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Blank-row filters may drop rows that are still pending
        (0, Some(self.pending.len()))
    }
}

/// Iterator returned by [`Decoder::records`].
pub struct Records<'a, T> {
    decoder: &'a mut Decoder,
    failed: bool,
    record: PhantomData<T>,
}

impl<T: Record + Default> Iterator for Records<'_, T> {
    type Item = Result<T, XlMapperError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.decoder.has_next_row() {
            return None;
        }
        let mut record = T::default();
        match self.decoder.unmarshal_next_row(&mut record) {
            Ok(()) => Some(Ok(record)),
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::record;
    use crate::spreadsheet::MemorySpreadsheet;

    record! {
        #[derive(Debug, Default, PartialEq)]
        struct SimpleSheetLine {
            #[header = "Number"] number: i64,
            #[header = "Name"] name: String,
            #[header = "Field"] field: String,
        }
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn simple_sheet() -> Vec<Vec<String>> {
        rows(&[
            &["Number", "Name", "Field"],
            &["1", "Ole", "One"],
            &["2", "Dole", "Two"],
        ])
    }

    #[test]
    fn decode_simple_sheet() {
        let mut decoder = Decoder::from_rows(simple_sheet(), &Criteria::default()).unwrap();
        assert!(decoder.has_next_row());

        let mut line = SimpleSheetLine::default();
        decoder.unmarshal_next_row(&mut line).unwrap();
        assert_eq!(line, SimpleSheetLine { number: 1, name: "Ole".to_owned(), field: "One".to_owned() });
        assert!(decoder.has_next_row());

        let row = decoder.next_row().unwrap();
        assert_eq!(row.get("Name"), Some("Dole"));
        assert!(!decoder.has_next_row());
    }

    #[test]
    fn exhaustion_is_monotonic() {
        let mut decoder = Decoder::from_rows(simple_sheet(), &Criteria::default()).unwrap();
        assert_eq!(decoder.remaining(), 2);
        decoder.next_row().unwrap();
        decoder.next_row().unwrap();

        for _ in 0..3 {
            assert!(!decoder.has_next_row());
            let error = decoder.next_row().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Exhaustion);
        }
    }

    #[test]
    fn header_only_sheet_is_rejected() {
        let error = Decoder::from_rows(rows(&[&["Number", "Name"]]), &Criteria::default()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);

        let error = Decoder::from_rows(simple_sheet(), &Criteria::new(2, 0)).unwrap_err();
        assert_eq!(error.to_string(), "not enough rows, must be at least header + 1");

        let error = Decoder::from_rows(simple_sheet(), &Criteria::new(7, 0)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn rows_before_header_are_excluded() {
        let data = rows(&[&["title"], &[], &["", "A", "B"], &["x", "1", "2"]]);
        let mut decoder = Decoder::from_rows(data, &Criteria::new(2, 0)).unwrap();
        assert_eq!(decoder.header().skip(), 1);

        let row = decoder.next_row().unwrap();
        assert_eq!(row.iter().collect::<Vec<_>>(), [("A", "1"), ("B", "2")]);
        assert!(!decoder.has_next_row());
    }

    #[test]
    fn short_row_omits_trailing_columns() {
        let data = rows(&[&["", "A", "B", "C"], &["skipped", "1"], &[]]);
        let mut decoder = Decoder::from_rows(data, &Criteria::default()).unwrap();

        let row = decoder.next_row().unwrap();
        assert_eq!(row.get("A"), Some("1"));
        assert!(!row.contains_key("B"));
        assert!(!row.contains_key("C"));

        let row = decoder.next_row().unwrap();
        assert!(row.is_empty());
    }

    #[test]
    fn duplicate_header_names_overwrite() {
        let data = rows(&[&["A", "B", "A"], &["1", "2", "3"]]);
        let mut decoder = Decoder::from_rows(data, &Criteria::default()).unwrap();
        let row = decoder.next_row().unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("A"), Some("3"));
    }

    #[test]
    fn blank_header_row_yields_empty_maps() {
        let data = rows(&[&["", ""], &["1", "2"]]);
        let mut decoder = Decoder::from_rows(data, &Criteria::default()).unwrap();
        assert!(decoder.header().is_empty());
        assert!(decoder.next_row().unwrap().is_empty());
    }

    #[test]
    fn blank_rows_are_produced_by_default() {
        let data = rows(&[&["A"], &["1"], &[""], &[], &["4"]]);
        let decoder = Decoder::from_rows(data, &Criteria::default()).unwrap();
        let values: Vec<Option<String>> = decoder
            .map(|row| row.get("A").map(str::to_owned))
            .collect();
        assert_eq!(values, vec![Some("1".to_owned()), Some("".to_owned()), None, Some("4".to_owned())]);
    }

    #[test]
    fn skip_empty_rows() {
        let data = rows(&[&["A"], &[""], &["1"], &[], &["", ""], &["4"], &[""]]);
        let criteria = Criteria { skip_empty_rows: true, ..Criteria::default() };
        let mut decoder = Decoder::from_rows(data, &criteria).unwrap();
        assert_eq!(decoder.remaining(), 5);

        assert_eq!(decoder.next_row().unwrap().get("A"), Some("1"));
        assert_eq!(decoder.next_row().unwrap().get("A"), Some("4"));
        assert!(!decoder.has_next_row());
    }

    #[test]
    fn end_at_empty_row() {
        let data = rows(&[&["A"], &["1"], &["2"], &[], &["4"]]);
        let criteria = Criteria { end_at_empty_row: true, ..Criteria::default() };
        let decoder = Decoder::from_rows(data, &criteria).unwrap();
        let values: Vec<String> = decoder.filter_map(|row| row.get("A").map(str::to_owned)).collect();
        assert_eq!(values, vec!["1", "2"]);
    }

    #[test]
    fn blank_check_ignores_skipped_columns() {
        let data = rows(&[&["", "A"], &["note", ""], &["", "2"]]);
        let criteria = Criteria { skip_empty_rows: true, ..Criteria::default() };
        let mut decoder = Decoder::from_rows(data, &criteria).unwrap();
        assert_eq!(decoder.next_row().unwrap().get("A"), Some("2"));
    }

    #[test]
    fn sheet_selection() {
        let mut spreadsheet = MemorySpreadsheet::new("memory")
            .with_sheet("First", [["X"], ["1"]])
            .with_sheet("Second", [["Y"], ["2"]]);

        let mut decoder = Decoder::from_spreadsheet(&mut spreadsheet, &Criteria::new(0, 1)).unwrap();
        assert_eq!(decoder.next_row().unwrap().get("Y"), Some("2"));

        let criteria = Criteria { sheet_name: Some("First".to_owned()), ..Criteria::default() };
        let mut decoder = Decoder::from_spreadsheet(&mut spreadsheet, &criteria).unwrap();
        assert_eq!(decoder.next_row().unwrap().get("X"), Some("1"));

        let error = Decoder::from_spreadsheet(&mut spreadsheet, &Criteria::new(0, 2)).unwrap_err();
        assert_eq!(error.to_string(), "invalid sheet index");
        assert_eq!(error.kind(), ErrorKind::Configuration);

        let criteria = Criteria { sheet_name: Some("Third".to_owned()), ..Criteria::default() };
        let error = Decoder::from_spreadsheet(&mut spreadsheet, &criteria).unwrap_err();
        assert_eq!(error.to_string(), "sheet 'Third' not found");
    }

    #[test]
    fn records_stop_after_first_error() {
        let data = rows(&[&["Number", "Name"], &["1", "a"], &["x", "b"], &["3", "c"]]);
        let mut decoder = Decoder::from_rows(data, &Criteria::default()).unwrap();
        let results: Vec<Result<SimpleSheetLine, XlMapperError>> = decoder.records().collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().number, 1);
        assert_eq!(results[1].as_ref().unwrap_err().kind(), ErrorKind::Conversion);
        assert_eq!(decoder.remaining(), 1);
    }
}
