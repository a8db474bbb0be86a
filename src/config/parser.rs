//! Line-oriented parser for INI-style documents.

use std::io::{BufRead, BufReader, Read};

use super::document::Document;
use super::ConfigError;

const BOM: char = '\u{feff}';

/// Parses every line from `reader` into a [`Document`].
///
/// Parsing stops at the first structural error; no partial document is returned.
pub(crate) fn parse_reader<R: Read>(reader: R) -> Result<Document, ConfigError> {
    let mut parser = Parser::default();

    for line in BufReader::new(reader).lines() {
        parser.feed(&line?)?;
    }

    Ok(parser.finish())
}

pub(crate) fn parse_str(text: &str) -> Result<Document, ConfigError> {
    let mut parser = Parser::default();

    for line in text.lines() {
        parser.feed(line)?;
    }

    Ok(parser.finish())
}

/// State carried between lines of one parse.
#[derive(Debug, Default)]
struct Parser {
    document: Document,
    /// Canonical name of the section being filled; `None` for the default section.
    current: Option<String>,
    line: usize,
}

impl Parser {
    fn feed(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.line += 1;

        let raw = if self.line == 1 {
            raw.strip_prefix(BOM).unwrap_or(raw)
        } else {
            raw
        };
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            return Ok(());
        }

        let result = if line.starts_with('[') {
            self.section_header(line)
        } else {
            self.assignment(line)
        };

        if let Err(ref error) = result {
            tracing::debug!(line = self.line, %error, "aborting configuration parse");
        }
        result
    }

    fn section_header(&mut self, line: &str) -> Result<(), ConfigError> {
        let name = line
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ConfigError::MalformedSectionHeader {
                line: self.line,
                text: line.to_owned(),
            })?;

        tracing::trace!(line = self.line, section = name, "entering section");
        self.current = Some(self.document.open_section(name));
        Ok(())
    }

    fn assignment(&mut self, line: &str) -> Result<(), ConfigError> {
        let malformed = || ConfigError::MalformedAssignment {
            line: self.line,
            text: line.to_owned(),
        };

        let (key, value) = line.split_once('=').ok_or_else(malformed)?;

        let key = key.trim();
        let (key, append) = match key.strip_suffix("[]") {
            Some(stripped) => (stripped.trim_end(), true),
            None => (key, false),
        };
        if key.is_empty() {
            tracing::trace!(line = self.line, "skipping assignment with an empty key");
            return Ok(());
        }

        let value = unescape(unquote(value.trim()));

        let section = self.document.section_mut(self.current.as_deref());
        if append {
            section.append(key, value);
        } else {
            section.assign(key, value);
        }
        Ok(())
    }

    fn finish(self) -> Document {
        tracing::debug!(
            sections = self.document.sections().count(),
            keys = self.document.keys().len(),
            lines = self.line,
            "parsed configuration document"
        );
        self.document
    }
}

/// Strips one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Decodes backslash escapes. A bare trailing backslash contributes nothing.
fn unescape(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_owned();
    }

    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            break;
        };

        match escaped {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            c @ ('\\' | '"' | '\'') => result.push(c),
            other => {
                // Unknown escapes pass through untouched.
                result.push('\\');
                result.push(other);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"gamma bamma\""), "gamma bamma");
        assert_eq!(unquote("'delta'"), "delta");
        assert_eq!(unquote("\"a = b # c\""), "a = b # c");
        assert_eq!(unquote("\"''\""), "''");
        assert_eq!(unquote("\"mismatched'"), "\"mismatched'");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("\"\""), "");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"\n\t\rhello"), "\n\t\rhello");
        assert_eq!(unescape(r"a\\b"), r"a\b");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"C:\path"), r"C:\path");
        assert_eq!(unescape(r"a\qb"), r"a\qb");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn test_trailing_backslash_is_dropped() {
        assert_eq!(unescape("\\"), "");
        assert_eq!(unescape(r"abc\"), "abc");
        assert_eq!(unescape(r"abc\\"), r"abc\");

        let document = parse_str("path=abc\\\nthird=\\").unwrap();
        assert_eq!(document.string("path", "default"), "abc");
        assert_eq!(document.string("third", "gamma"), "gamma");
        assert_eq!(document.keys(), vec!["path", "third"]);
    }

    #[test]
    fn test_first_equals_splits() {
        let document = parse_str("url = http://host/?a=b").unwrap();
        assert_eq!(document.string("url", ""), "http://host/?a=b");
    }

    #[test]
    fn test_array_suffix_with_space() {
        let document = parse_str("key [] = one\nkey[]=two").unwrap();
        assert_eq!(
            document.strings("key"),
            Some(&["one".to_string(), "two".to_string()][..])
        );
    }

    #[test]
    fn test_empty_key_line_is_skipped() {
        let document = parse_str("first=alpha\n=orphan\n  = value\n[section]\n=x").unwrap();
        assert_eq!(document.keys(), vec!["first"]);
        assert_eq!(document.string("", "default"), "default");
        assert_eq!(document.keys_for_section("section"), Some(vec![]));

        // A leading `[` always makes the line a section header.
        let err = parse_str("first=alpha\n[]=x").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedSectionHeader { line: 2, .. }));
    }

    #[test]
    fn test_empty_section_name_is_malformed() {
        let err = parse_str("[  ]").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedSectionHeader { line: 1, .. }));
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let document = parse_str("\u{feff}first=alpha").unwrap();
        assert_eq!(document.string("first", ""), "alpha");
    }

    #[test]
    fn test_crlf_line_endings() {
        let document = parse_reader("first=alpha\r\n[section]\r\nsecond=beta\r\n".as_bytes()).unwrap();
        assert_eq!(document.string("first", ""), "alpha");
        assert_eq!(document.string_from_section("section", "second", ""), "beta");
    }

    #[test]
    fn test_invalid_utf8_is_an_io_error() {
        let err = parse_reader(&b"first=\xff\xfe"[..]).unwrap_err();
        assert!(err.io_error().is_some());
        assert!(!err.is_not_found());
    }
}
