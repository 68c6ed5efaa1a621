//! Conversions between A1-style cell references and 0-based indexes.

/// Number of rows in a worksheet
pub(crate) const MAX_ROWS: usize = 1_048_576;

/// Number of columns in a worksheet ("A" to "XFD")
pub(crate) const MAX_COLUMNS: usize = 16_384;

/// Converts a column name ("A", "Z", "AA", ...) to a 0-based column index.
/// Returns `None` past column "XFD".
pub(crate) fn col_to_index(name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for character in name.chars() {
        if !character.is_ascii_alphabetic() {
            return None;
        }
        let digit = (character.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index * 26 + digit;
        if index > MAX_COLUMNS {
            return None;
        }
    }
    Some(index - 1)
}

/// Converts a 1-based row number to a 0-based row index.
/// Returns `None` for row 0 and past the last worksheet row.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
        .filter(|row| *row < MAX_ROWS)
}

/// Parses a cell reference such as "B3" into (row, col).
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (col, row) = reference.split_at(split);
    Some((row_to_index(row)?, col_to_index(col)?))
}

/// Converts (row, col) to an upper-case cell reference such as "B3".
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut column = col + 1;
    let mut reference = String::new();
    while column > 0 {
        column -= 1;
        reference.insert(0, (b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    reference.push_str(&(row + 1).to_string());
    reference
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names() {
        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("z"), Some(25));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(col_to_index("XFD"), Some(16_383));
        assert_eq!(col_to_index(""), None);
        assert_eq!(col_to_index("A1"), None);
    }

    #[test]
    fn references() {
        assert_eq!(reference_to_index("A1"), Some((0, 0)));
        assert_eq!(reference_to_index("C12"), Some((11, 2)));
        assert_eq!(reference_to_index("A0"), None);
        assert_eq!(reference_to_index("12"), None);
        assert_eq!(index_to_reference(0, 0), "A1");
        assert_eq!(index_to_reference(11, 27), "AB12");
    }

    #[test]
    fn references_outside_the_grid() {
        assert_eq!(reference_to_index("XFD1048576"), Some((MAX_ROWS - 1, MAX_COLUMNS - 1)));
        assert_eq!(reference_to_index("XFE1"), None);
        assert_eq!(reference_to_index("ZZZZZZZ1"), None);
        assert_eq!(reference_to_index("A1048577"), None);
        assert_eq!(reference_to_index("A3000000000"), None);
        assert_eq!(reference_to_index("A99999999999999999999999"), None);
    }
}
