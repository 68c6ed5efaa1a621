use crate::error::ResultMessage;
use crate::error::XlMapperError;
use crate::helpers::reader::SourceReader;
use crate::helpers::xml::match_xml_events;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::excel;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::reference::MAX_COLUMNS;
use crate::spreadsheet::reference::MAX_ROWS;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::BufReader;
use std::path::Path;
use zip::read::ZipFile;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// An Office Open XML workbook (`.xlsx`, `.xlsm`, ...).
///
/// The package directory, sheet list and shared string table are read when
/// the workbook is opened; worksheet parts are parsed on demand by
/// [`Spreadsheet::read_rows`].
pub struct XlsxSpreadsheet {
    /// File name of the spreadsheet
    name: String,
    /// ZIP archive containing the package parts
    zip: ZipArchive<SourceReader>,
    /// Worksheets in workbook order as (name, zip_path) pairs
    sheets: Vec<(String, String)>,
    /// Shared string table
    shared_strings: Vec<String>,
}

impl XlsxSpreadsheet {
    /// Opens an xlsx workbook from a local path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<XlsxSpreadsheet, XlMapperError> {
        let name = path.as_ref().to_string_lossy().to_string();
        let reader = SourceReader::open(path.as_ref()).with_prefix(&format!("Open '{name}' failed"))?;
        Self::load(name, reader)
    }

    /// Opens an xlsx workbook from bytes already in memory.
    ///
    /// `name` is only used in error messages.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<XlsxSpreadsheet, XlMapperError> {
        Self::load(name.to_owned(), SourceReader::from_bytes(bytes))
    }

    fn load(name: String, reader: SourceReader) -> Result<XlsxSpreadsheet, XlMapperError> {
        let mut zip = excel::open(&name, reader)?;
        let sheets = load_workbook(&mut zip).with_prefix(&format!("Read workbook '{name}' failed"))?;
        let shared_strings = load_shared_strings(&mut zip)?;
        tracing::debug!(file = %name, sheets = sheets.len(), shared_strings = shared_strings.len(), "Opened xlsx workbook");
        Ok(XlsxSpreadsheet {
            name,
            zip,
            sheets,
            shared_strings,
        })
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Parses the worksheet XML part and lays its cells out as dense rows.
    ///
    /// Cells are positioned by their `r` reference; cells without one take
    /// the next column of the current row, rows without `r` the next row.
    /// Positions outside the worksheet grid fail with `CellReferenceError`.
    fn read_rows(&mut self, index: usize) -> Result<Vec<Vec<String>>, XlMapperError> {
        let (sheet_name, zip_path) = self.sheets
            .get(index)
            .cloned()
            .ok_or(SpreadsheetError::SheetNotFoundError(index))?;

        let mut sheet = Sheet::new(&sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut reader = self.zip.xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                if let Some(number) = event.parse_attribute_value::<usize>("r")? {
                    row_count = number
                        .checked_sub(1)
                        .filter(|row| *row < MAX_ROWS)
                        .ok_or_else(|| SpreadsheetError::CellReferenceError(format!("{number}:{number}")))?;
                }
                col_count = 0;
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = match event.get_attribute_value("r")? {
                    Some(reference) => reference_to_index(&reference)
                        .ok_or_else(|| SpreadsheetError::CellReferenceError(reference.to_string()))?,
                    None if row_count < MAX_ROWS && col_count < MAX_COLUMNS => (row_count, col_count),
                    None => Err(SpreadsheetError::CellReferenceError(index_to_reference(row_count, col_count)))?,
                };
                col_count = col + 1;
                kind = CellType::from_attribute(event.get_attribute_value("t")?.as_deref());
                value.clear();
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.name() == TAG_CELL => {
                if kind != CellType::Empty && !value.is_empty() {
                    sheet.push(Cell {
                        row,
                        col,
                        kind,
                        value: std::mem::take(&mut value),
                    });
                }
                kind = CellType::Empty;
            }
        });

        tracing::debug!(sheet = %sheet.name, cells = sheet.cells.len(), "Read worksheet");
        Ok(sheet.into_rows(&self.shared_strings)?)
    }
}

/// Loads the worksheet list from `xl/workbook.xml`
///
/// # Arguments
/// * `zip` - ZIP archive containing the XLSX file
///
/// # Returns
/// Worksheets in workbook order as (name, zip_path) pairs
fn load_workbook(zip: &mut ZipArchive<SourceReader>) -> Result<Vec<(String, String)>, XlMapperError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Loads the shared string table, an empty table when the part is absent
fn load_shared_strings(zip: &mut ZipArchive<SourceReader>) -> Result<Vec<String>, XlMapperError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
            shared_strings.push(string);
        }
    });
    Ok(shared_strings)
}

/// Reads string value from XML content, handling text and CDATA sections
///
/// Rich text runs are concatenated and phonetic annotations skipped.
///
/// # Arguments
/// * `reader` - XML reader positioned just after the opening tag
/// * `end_tag` - XML tag that marks the end of the string content
/// * `is_text_content` - Whether the element's own text is the value (`<v>`), rather than nested `<t>` elements
fn read_string_value(
    reader: &mut XmlReader<BufReader<ZipFile<'_, SourceReader>>>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, XlMapperError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
