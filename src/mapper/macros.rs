/// Declares a struct and implements [`Record`](crate::Record) for it.
///
/// Fields opt into mapping with `#[header = "Column"]`; the type of a tagged
/// field must implement [`FieldValue`](crate::FieldValue), so only strings and
/// signed integers are accepted. Untagged fields may have any type and are
/// never touched by the mapper.
///
/// ```
/// use xlmapper::{record, unmarshal_row, RowMap};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct SimpleSheetLine {
///         #[header = "Number"] pub number: i64,
///         #[header = "Name"] pub name: String,
///         pub note: Option<String>,
///     }
/// }
///
/// let row: RowMap = [("Number", "1"), ("Name", "Ole")].into_iter().collect();
/// let mut line = SimpleSheetLine::default();
/// unmarshal_row(&row, &mut line).unwrap();
/// assert_eq!(line.number, 1);
/// assert_eq!(line.name, "Ole");
/// ```
#[macro_export]
macro_rules! record {
    (@tag []) => { ::std::option::Option::None };
    (@tag [$tag:literal]) => { ::std::option::Option::Some($tag) };

    (@kind [] $ty:ty) => { $crate::FieldKind::Other(::std::stringify!($ty)) };
    (@kind [$tag:literal] $ty:ty) => { <$ty as $crate::FieldValue>::kind() };

    (@slot [] $place:expr) => { ::std::option::Option::None };
    (@slot [$tag:literal] $place:expr) => {
        ::std::option::Option::Some(&mut $place as &mut dyn $crate::FieldValue)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[header = $tag:literal])?
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($field_vis $field: $ty),*
        }

        impl $crate::Record for $name {
            fn fields() -> ::std::vec::Vec<$crate::FieldDescriptor> {
                ::std::vec![$(
                    $crate::FieldDescriptor {
                        name: ::std::stringify!($field),
                        tag: $crate::record!(@tag [$($tag)?]),
                        kind: $crate::record!(@kind [$($tag)?] $ty),
                    }
                ),*]
            }

            fn field_mut(&mut self, index: usize) -> ::std::option::Option<&mut dyn $crate::FieldValue> {
                const NAMES: &[&str] = &[$(::std::stringify!($field)),*];
                let name = *NAMES.get(index)?;
                $(
                    if name == ::std::stringify!($field) {
                        return $crate::record!(@slot [$($tag)?] self.$field);
                    }
                )*
                ::std::option::Option::None
            }
        }
    };
}
