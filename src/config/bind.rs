//! Populating caller-owned records from a section.
//!
//! A record lists its bindable fields once through [`SectionData`], usually via
//! the [`section_data!`](crate::section_data) macro. Each field decides how to
//! take its value through [`Field`]; a missing key or a value that fails to
//! coerce leaves the field at whatever the caller put there.

use super::coerce::{self, FromValue};
use super::section::{canonicalize, Section};

/// A record field that can be assigned from stored raw values.
pub trait Field {
    /// Assigns from the values stored under this field's key. `None` when the key is absent.
    fn assign(&mut self, values: Option<&[String]>);
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {$(
        impl Field for $ty {
            fn assign(&mut self, values: Option<&[String]>) {
                if let Some(value) = coerce::scalar(values) {
                    *self = value;
                }
            }
        }

        impl Field for Option<$ty> {
            fn assign(&mut self, values: Option<&[String]>) {
                if let Some(value) = coerce::scalar(values) {
                    *self = Some(value);
                }
            }
        }
    )*};
}

scalar_field!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T: FromValue> Field for Vec<T> {
    fn assign(&mut self, values: Option<&[String]>) {
        if let Some(values) = coerce::sequence(values) {
            *self = values;
        }
    }
}

impl<T: FromValue> Field for Option<Vec<T>> {
    fn assign(&mut self, values: Option<&[String]>) {
        if let Some(values) = coerce::sequence(values) {
            *self = Some(values);
        }
    }
}

/// A record whose fields can be filled from a section.
///
/// Only the fields returned by [`fields`](Self::fields) are ever touched.
pub trait SectionData {
    /// The bindable fields as `(name, target)` pairs. Names match keys case-insensitively.
    fn fields(&mut self) -> Vec<(&'static str, &mut dyn Field)>;
}

/// Implements [`SectionData`] for a struct from a list of its field names.
///
/// ```
/// use mini_ini::{section_data, Document};
///
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: u16,
///     tags: Option<Vec<String>>,
/// }
///
/// section_data!(Server { host, port, tags });
///
/// let document: Document = "[server]\nhost = example.com\nport = 8080".parse()?;
/// let mut server = Server::default();
///
/// assert!(document.data_from_section("server", &mut server));
/// assert_eq!(server.host, "example.com");
/// assert_eq!(server.port, 8080);
/// assert_eq!(server.tags, None);
/// # Ok::<(), mini_ini::ConfigError>(())
/// ```
#[macro_export]
macro_rules! section_data {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::SectionData for $ty {
            fn fields(&mut self) -> ::std::vec::Vec<(&'static str, &mut dyn $crate::Field)> {
                ::std::vec![
                    $((::std::stringify!($field), &mut self.$field as &mut dyn $crate::Field)),*
                ]
            }
        }
    };
}

pub(crate) fn populate<T: SectionData + ?Sized>(section: &Section, target: &mut T) {
    for (name, field) in target.fields() {
        let key = canonicalize(name.trim_start_matches("r#"));
        field.assign(section.get(&key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Record {
        first: String,
        count: i64,
        ratio: f64,
        flag: bool,
        maybe: Option<u32>,
        list: Vec<String>,
        numbers: Option<Vec<i64>>,
        hidden: String,
    }

    crate::section_data!(Record {
        first,
        count,
        ratio,
        flag,
        maybe,
        list,
        numbers,
    });

    fn section(lines: &[(&str, &str)]) -> Section {
        let mut section = Section::new("record");
        for (key, value) in lines {
            match key.strip_suffix("[]") {
                Some(key) => section.append(key, value.to_string()),
                None => section.assign(key, value.to_string()),
            }
        }
        section
    }

    #[test]
    fn test_populates_listed_fields() {
        let section = section(&[
            ("FIRST", "alpha"),
            ("count", "-32"),
            ("ratio", "0.25"),
            ("flag", "true"),
            ("maybe", "7"),
            ("list[]", "a"),
            ("list[]", "b"),
            ("numbers[]", "1"),
            ("numbers[]", "2"),
            ("hidden", "secret"),
        ]);
        let mut record = Record::default();

        populate(&section, &mut record);

        assert_eq!(record.first, "alpha");
        assert_eq!(record.count, -32);
        assert_eq!(record.ratio, 0.25);
        assert!(record.flag);
        assert_eq!(record.maybe, Some(7));
        assert_eq!(record.list, vec!["a", "b"]);
        assert_eq!(record.numbers, Some(vec![1, 2]));
        assert_eq!(record.hidden, "");
    }

    #[test]
    fn test_keeps_prior_values_on_failure() {
        let section = section(&[("count", "many"), ("numbers[]", "1"), ("numbers[]", "x")]);
        let mut record = Record {
            first: "hello world".into(),
            count: 33,
            ..Record::default()
        };

        populate(&section, &mut record);

        assert_eq!(record.first, "hello world");
        assert_eq!(record.count, 33);
        assert_eq!(record.maybe, None);
        assert_eq!(record.numbers, None);
        assert!(record.list.is_empty());
    }

    struct Keyword {
        r#type: String,
    }

    crate::section_data!(Keyword { r#type });

    #[test]
    fn test_raw_identifiers() {
        let section = section(&[("Type", "tcp")]);
        let mut keyword = Keyword {
            r#type: String::new(),
        };

        populate(&section, &mut keyword);

        assert_eq!(keyword.r#type, "tcp");
    }
}
