//! Best-effort conversion of stored raw strings into typed values.

/// A type that can be read out of a stored raw string.
///
/// Conversion never errors: `None` means "use the caller's default".
pub trait FromValue: Sized {
    fn from_value(raw: &str) -> Option<Self>;
}

impl FromValue for String {
    fn from_value(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }
}

impl FromValue for bool {
    fn from_value(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl FromValue for char {
    fn from_value(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

macro_rules! from_value_via_parse {
    ($($ty:ty),* $(,)?) => {$(
        impl FromValue for $ty {
            fn from_value(raw: &str) -> Option<Self> {
                raw.parse().ok()
            }
        }
    )*};
}

from_value_via_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Reads a stored sequence as a single scalar.
///
/// Only a sequence holding exactly one non-empty value qualifies; array keys
/// with several elements and empty values fall back to the default.
pub(crate) fn scalar<T: FromValue>(values: Option<&[String]>) -> Option<T> {
    match values? {
        [value] if !value.is_empty() => T::from_value(value),
        _ => None,
    }
}

/// Reads a stored sequence element by element. Any failing element discards the whole result.
pub(crate) fn sequence<T: FromValue>(values: Option<&[String]>) -> Option<Vec<T>> {
    match values? {
        [] => None,
        values => values.iter().map(|v| T::from_value(v)).collect(),
    }
}
