use crate::error::XlMapperError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

/// A byte source for spreadsheet packages: either a file on disk or a buffer already in memory
#[derive(Debug)]
pub(crate) enum SourceReader {
    /// Local file reader
    File(BufReader<File>),
    /// In-memory buffer
    Memory(Cursor<Vec<u8>>),
}

impl SourceReader {
    /// Opens a local file for reading
    ///
    /// # Arguments
    /// * `path` - Path to the file
    ///
    /// # Returns
    /// * `Result<SourceReader, XlMapperError>` - Reader for the file content
    pub(crate) fn open(path: &Path) -> Result<SourceReader, XlMapperError> {
        let file = File::open(path)?;
        Ok(SourceReader::File(BufReader::new(file)))
    }

    /// Wraps bytes that were loaded by the caller
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> SourceReader {
        SourceReader::Memory(Cursor::new(bytes))
    }

    /// Reads the first `N` bytes and rewinds, for format sniffing.
    /// Returns `None` when the source is shorter than `N` bytes.
    pub(crate) fn peek<const N: usize>(&mut self) -> Result<Option<[u8; N]>, XlMapperError> {
        let mut signature = [0u8; N];
        let result = self.read_exact(&mut signature);
        self.rewind()?;
        match result {
            Ok(()) => Ok(Some(signature)),
            Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(error) => Err(error)?,
        }
    }
}

impl Read for SourceReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            SourceReader::File(reader) => reader.read(buf),
            SourceReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for SourceReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            SourceReader::File(reader) => reader.seek(pos),
            SourceReader::Memory(reader) => reader.seek(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_local_file() {
        // Cargo.toml should exist in the crate root
        let result = SourceReader::open(Path::new("Cargo.toml"));
        assert!(result.is_ok(), "Failed to open local file: {:?}", result.err());

        let result = SourceReader::open(Path::new("non_existent_file.xlsx"));
        assert!(result.is_err(), "Should fail to open non-existent file");
    }

    #[test]
    fn test_peek_rewinds() {
        let mut reader = SourceReader::from_bytes(b"PK\x03\x04rest".to_vec());
        assert_eq!(reader.peek::<4>().unwrap(), Some(*b"PK\x03\x04"));

        let mut content = Vec::new();
        reader.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"PK\x03\x04rest");
    }

    #[test]
    fn test_peek_short_source() {
        let mut reader = SourceReader::from_bytes(b"PK".to_vec());
        assert_eq!(reader.peek::<8>().unwrap(), None);
    }
}
