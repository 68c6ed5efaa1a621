/// One decoded data row: header name to raw cell text, in header order.
///
/// Header names are unique keys; when the header row repeats a name, the
/// later column's value replaces the earlier one in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowMap {
    entries: Vec<(String, String)>,
}

impl RowMap {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, returning the previous value if the name was present.
    pub fn insert(&mut self, name: &str, value: &str) -> Option<String> {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, current)) => Some(std::mem::replace(current, value.to_owned())),
            None => {
                self.entries.push((name.to_owned(), value.to_owned()));
                None
            }
        }
    }

    /// Cell text under `name`, `None` when the row has no such column.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if the row has a value under `name`, even an empty one.
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of columns present in the row.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no column is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header names in header order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// (name, text) pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for RowMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RowMap::new();
        for (key, value) in iter {
            row.insert(key.as_ref(), value.as_ref());
        }
        row
    }
}

impl IntoIterator for RowMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
