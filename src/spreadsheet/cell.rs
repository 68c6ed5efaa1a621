use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SpreadsheetError;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as "1" / "0"
    Boolean,
    /// Numeric values, kept as the stored text
    Number,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values, including cached formula strings
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as "#N/A"
    Error,
}

impl CellType {
    /// Maps the `t` attribute of a worksheet `<c>` element to a cell type.
    pub(crate) fn from_attribute(t: Option<&str>) -> Self {
        match t {
            Some("inlineStr") | Some("str") => Self::InlineString,
            Some("s") => Self::SharedString,
            Some("d") => Self::IsoDateTime,
            Some("b") => Self::Boolean,
            Some("e") => Self::Error,
            _ => Self::Number,
        }
    }
}

/// A single populated cell with its position, type, and raw value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the worksheet
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Renders the cell as the text a row decoder sees.
    ///
    /// Shared strings are resolved against the workbook's string table,
    /// booleans become `TRUE` / `FALSE`, everything else is passed through.
    pub(crate) fn to_text(&self, shared_strings: &[String]) -> Result<String, SpreadsheetError> {
        match self.kind {
            CellType::Empty => Ok(String::new()),
            CellType::Boolean => Ok(if self.value == "1" { "TRUE" } else { "FALSE" }.to_owned()),
            CellType::SharedString => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index))
                .cloned()
                .ok_or_else(|| SpreadsheetError::CellValueError(self.reference(), self.value.to_owned())),
            CellType::Number | CellType::IsoDateTime | CellType::InlineString | CellType::Error => {
                Ok(self.value.to_owned())
            }
        }
    }
}
