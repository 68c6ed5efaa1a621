//! # Field Mapper
//!
//! Assigns the values of a [`RowMap`] onto the fields of a record. A field
//! opts in with a tag naming the header column it receives; the value is
//! converted according to the field's kind.
//!
//! Records usually implement [`Record`] through the [`record!`](crate::record)
//! macro, which only accepts tagged fields whose type implements
//! [`FieldValue`]. Hand-written implementations are checked at mapping time
//! instead.
use crate::decoder::{DecoderError, RowMap};
use crate::error::XlMapperError;
use std::num::ParseIntError;

mod macros;

/// Kind of a record field as seen by the mapper.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integer, parsed from base-10 text
    Integer,
    /// Text, assigned as is
    String,
    /// Anything else; carries the type name
    Other(&'static str),
}

/// Describes one field of a record type, in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Header column bound to this field, `None` when the field is not mapped
    pub tag: Option<&'static str>,
    pub kind: FieldKind,
}

/// A field type the mapper can assign cell text to.
pub trait FieldValue {
    fn kind() -> FieldKind
    where
        Self: Sized;

    /// Replaces the current value with `value` converted to this type.
    fn assign(&mut self, value: &str) -> Result<(), ParseIntError>;
}

impl FieldValue for String {
    fn kind() -> FieldKind {
        FieldKind::String
    }

    fn assign(&mut self, value: &str) -> Result<(), ParseIntError> {
        value.clone_into(self);
        Ok(())
    }
}

macro_rules! integer_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn kind() -> FieldKind {
                    FieldKind::Integer
                }

                fn assign(&mut self, value: &str) -> Result<(), ParseIntError> {
                    *self = value.parse::<$ty>()?;
                    Ok(())
                }
            }
        )*
    };
}

integer_field_value!(i8, i16, i32, i64, i128, isize);

/// A record type whose fields can be filled from a [`RowMap`].
pub trait Record {
    /// Field descriptors in declaration order.
    fn fields() -> Vec<FieldDescriptor>
    where
        Self: Sized;

    /// Mutable access to the field at `index` in [`Record::fields`] order,
    /// `None` when that field cannot be written.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn FieldValue>;
}

/// Assigns `row` onto `record`.
///
/// Fields without a tag, and fields whose column is missing from the row or
/// holds an empty string, keep their current value. Mapping stops at the
/// first error; fields assigned before it keep their new values.
pub fn unmarshal_row<T: Record>(row: &RowMap, record: &mut T) -> Result<(), XlMapperError> {
    for (index, field) in T::fields().into_iter().enumerate() {
        let Some(tag) = field.tag else {
            continue;
        };
        let value = match row.get(tag) {
            Some(value) if !value.is_empty() => value,
            _ => continue,
        };

        if let FieldKind::Other(_) = field.kind {
            Err(DecoderError::InvalidFieldTypeError { tag: tag.to_owned() })?;
        }
        let slot = record
            .field_mut(index)
            .ok_or_else(|| DecoderError::UnsettableFieldError { tag: tag.to_owned() })?;
        slot.assign(value).map_err(|source| DecoderError::ConversionError {
            tag: tag.to_owned(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::record;

    record! {
        #[derive(Debug, Default, PartialEq)]
        struct Line {
            #[header = "Number"] number: i64,
            #[header = "Name"] name: String,
            #[header = "Count"] count: i32,
            comment: Vec<String>,
        }
    }

    fn row(entries: &[(&str, &str)]) -> RowMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn descriptors_follow_declaration_order() {
        let fields = Line::fields();
        assert_eq!(
            vec![
                FieldDescriptor { name: "number", tag: Some("Number"), kind: FieldKind::Integer },
                FieldDescriptor { name: "name", tag: Some("Name"), kind: FieldKind::String },
                FieldDescriptor { name: "count", tag: Some("Count"), kind: FieldKind::Integer },
            ]
            .as_slice(),
            &fields[..3]
        );
        assert_eq!(fields[3].name, "comment");
        assert_eq!(fields[3].tag, None);
        assert!(matches!(fields[3].kind, FieldKind::Other(_)));
    }

    #[test]
    fn assigns_tagged_fields() {
        let mut line = Line::default();
        unmarshal_row(&row(&[("Number", "-12"), ("Name", "Ole"), ("Count", "+3")]), &mut line).unwrap();
        assert_eq!(line.number, -12);
        assert_eq!(line.name, "Ole");
        assert_eq!(line.count, 3);
        assert!(line.comment.is_empty());
    }

    #[test]
    fn empty_and_missing_values_keep_fields() {
        let mut line = Line {
            number: 7,
            name: "kept".to_owned(),
            count: 9,
            comment: vec!["untouched".to_owned()],
        };
        unmarshal_row(&row(&[("Number", ""), ("Name", "")]), &mut line).unwrap();
        assert_eq!(line.number, 7);
        assert_eq!(line.name, "kept");
        assert_eq!(line.count, 9);
        assert_eq!(line.comment, vec!["untouched"]);
    }

    #[test]
    fn conversion_error_keeps_earlier_fields() {
        let mut line = Line::default();
        let error = unmarshal_row(&row(&[("Number", "5"), ("Name", "Ole"), ("Count", "three")]), &mut line)
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Conversion);
        assert_eq!(error.to_string(), "three".parse::<i32>().unwrap_err().to_string());
        assert_eq!(line.number, 5);
        assert_eq!(line.name, "Ole");
        assert_eq!(line.count, 0);
    }

    #[test]
    fn integer_overflow_is_a_conversion_error() {
        let mut line = Line::default();
        let error = unmarshal_row(&row(&[("Count", "99999999999")]), &mut line).unwrap_err();
        assert!(matches!(
            error,
            XlMapperError::DecoderError(DecoderError::ConversionError { ref tag, .. }) if tag == "Count"
        ));
    }

    /// Hand-written record exercising the runtime type checks.
    #[derive(Default)]
    struct Manual {
        price: f64,
        locked: String,
        name: String,
    }

    impl Record for Manual {
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor { name: "name", tag: Some("Name"), kind: FieldKind::String },
                FieldDescriptor { name: "price", tag: Some("Price"), kind: FieldKind::Other("f64") },
                FieldDescriptor { name: "locked", tag: Some("Locked"), kind: FieldKind::String },
            ]
        }

        fn field_mut(&mut self, index: usize) -> Option<&mut dyn FieldValue> {
            match index {
                0 => Some(&mut self.name),
                _ => None,
            }
        }
    }

    #[test]
    fn unsupported_field_type() {
        let mut manual = Manual::default();
        let error = unmarshal_row(&row(&[("Name", "Widget"), ("Price", "1.5")]), &mut manual).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Type);
        assert_eq!(error.to_string(), "invalid field type for `Price`, must be int or string");
        assert_eq!(manual.name, "Widget");
        assert_eq!(manual.price, 0.0);
    }

    #[test]
    fn unsettable_field() {
        let mut manual = Manual::default();
        let error = unmarshal_row(&row(&[("Locked", "x")]), &mut manual).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Type);
        assert_eq!(error.to_string(), "unable to set value for `Locked`");
        assert!(manual.locked.is_empty());
    }
}
