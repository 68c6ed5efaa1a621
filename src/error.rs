use thiserror::Error;

/// Main error type for the xlmapper crate.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum XlMapperError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(String),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Decoder and mapper errors
    #[error("{0}")]
    DecoderError(#[from] crate::decoder::DecoderError),
}

/// Coarse classification of every error the crate can return.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid construction arguments.
    Configuration,
    /// A row was requested after the last one was consumed.
    Exhaustion,
    /// The destination record or one of its fields cannot receive the value.
    Type,
    /// A non-empty cell could not be parsed into the field's integer type.
    Conversion,
    /// The spreadsheet file could not be read or parsed.
    Source,
}

impl XlMapperError {
    pub fn kind(&self) -> ErrorKind {
        use crate::decoder::DecoderError;
        match self {
            Self::DecoderError(DecoderError::ConfigurationError(_)) => ErrorKind::Configuration,
            Self::DecoderError(DecoderError::ExhaustionError) => ErrorKind::Exhaustion,
            Self::DecoderError(DecoderError::InvalidFieldTypeError { .. })
            | Self::DecoderError(DecoderError::UnsettableFieldError { .. }) => ErrorKind::Type,
            Self::DecoderError(DecoderError::ConversionError { .. }) => ErrorKind::Conversion,
            _ => ErrorKind::Source,
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, XlMapperError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| match e {
            // Keep classified errors intact so callers can still match on them
            XlMapperError::DecoderError(_) => e,
            _ => XlMapperError::WithContextError(format!("{}: {}", message, e)),
        })
    }
}
