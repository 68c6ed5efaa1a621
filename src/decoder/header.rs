/// Column names captured from the header row.
///
/// `skip` counts the blank cells in front of the first name; those columns are
/// excluded from every data row. Names are taken up to the first blank cell
/// after that point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderSet {
    names: Vec<String>,
    skip: usize,
}

impl HeaderSet {
    /// Scans a header row left to right.
    ///
    /// Leading blank cells only increase the skip count. Once a non-blank cell
    /// is seen, names are captured until the next blank cell, and anything
    /// after it is ignored even when non-blank.
    pub fn resolve<S: AsRef<str>>(row: &[S]) -> Self {
        let mut header = HeaderSet::default();
        for cell in row.iter().map(AsRef::as_ref) {
            match (cell.is_empty(), header.names.is_empty()) {
                (true, true) => header.skip += 1,
                (true, false) => break,
                (false, _) => header.names.push(cell.to_owned()),
            }
        }
        header
    }

    /// Column names in header order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of leading blank header cells.
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Number of column names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when the header row holds no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Pairs each name with the raw column index it reads from.
    pub fn columns(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(move |(index, name)| (self.skip + index, name.as_str()))
    }
}
