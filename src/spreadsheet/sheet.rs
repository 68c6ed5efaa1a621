use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::SpreadsheetError;

/// Collects the populated cells of one worksheet in document order and
/// lays them out as dense rows of text.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// All populated cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Last row holding a cell
    pub(crate) row_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
        }
    }

    /// Adds a cell to the sheet, updating the row bound.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize) {
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
    }

    /// Converts the cells into one vector per worksheet row, starting at row 0.
    ///
    /// Rows without any cell become empty vectors. Each row is as long as its
    /// last populated column, earlier gaps are filled with empty strings.
    pub(crate) fn into_rows(self, shared_strings: &[String]) -> Result<Vec<Vec<String>>, SpreadsheetError> {
        let row_count = self.row_upper_bound.map(|row| row + 1).unwrap_or(0);
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_count];
        for cell in self.cells {
            let text = cell.to_text(shared_strings)?;
            let record = &mut rows[cell.row];
            if record.len() <= cell.col {
                record.resize(cell.col + 1, String::new());
            }
            record[cell.col] = text;
        }
        Ok(rows)
    }
}
