//! # xlmapper
//!
//! Decodes spreadsheet rows into typed records.
//!
//! One row of a worksheet is treated as the header; its cells name the
//! columns. Every following row is available as a [`RowMap`] (header name to
//! cell text) or, through the field mapper, as a populated record.
//!
//! ## Features
//!
//! - **Header resolution**: leading blank header cells are skipped, and the
//!   first blank cell after the names ends the header
//! - **Pull-based decoding**: rows are read one at a time with
//!   [`Decoder::has_next_row`] / [`Decoder::next_row`], or as an iterator
//! - **Tag-directed mapping**: the [`record!`] macro binds struct fields to
//!   header columns and converts cell text to strings or signed integers
//! - **Pure Rust xlsx reader**: workbooks are read with `zip` and `quick-xml`
//!
//! ## Example
//!
//! ```no_run
//! use xlmapper::{record, Decoder};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     struct SimpleSheetLine {
//!         #[header = "Number"] number: i64,
//!         #[header = "Name"] name: String,
//!         #[header = "Field"] field: String,
//!     }
//! }
//!
//! let mut decoder = Decoder::open("simple_sheet.xlsx", 0, 0)?;
//! for line in decoder.records::<SimpleSheetLine>() {
//!     println!("{:?}", line?);
//! }
//! # Ok::<(), xlmapper::XlMapperError>(())
//! ```
pub mod decoder;
mod error;
pub(crate) mod helpers;
pub mod mapper;
pub mod spreadsheet;

pub use crate::decoder::{Criteria, Decoder, DecoderError, HeaderSet, Records, RowMap};
pub use crate::error::{ErrorKind, XlMapperError};
pub use crate::mapper::{unmarshal_row, FieldDescriptor, FieldKind, FieldValue, Record};
pub use crate::spreadsheet::{MemorySpreadsheet, Spreadsheet, SpreadsheetError, XlsxSpreadsheet};
