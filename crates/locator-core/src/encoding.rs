//! Attribute value encoding shared by the build-time annotators and the runtime resolver.
//!
//! The combined format is `<file>:<line>:<column>`. The file part is not escaped and may
//! itself contain colons (drive letters, `webpack://` style prefixes), so decoding always
//! works from the right: the last segment is the column, the one before it the line, and
//! everything else is the file.
//!
//! A path that itself ends in two numeric colon segments (`report:12:30.log` is fine,
//! `report:12:30` is not) cannot be told apart from a location. Existing encoded data
//! relies on the right-to-left rule, so it is kept as is.

use crate::models::SourceLocation;

/// Combined `file:line:column` attribute
pub const ATTR_LOCATOR: &str = "data-locatorjs";
/// ID-keyed `file::id` attribute written in ID mode
pub const ATTR_ID: &str = "data-locatorjs-id";
/// ID-keyed `file::id` attribute written through styled-component `.attrs()`
pub const ATTR_STYLED: &str = "data-locatorjs-styled";
/// Legacy split attributes
pub const ATTR_FILE: &str = "data-source-file";
pub const ATTR_LINE: &str = "data-source-line";
pub const ATTR_COLUMN: &str = "data-source-column";

/// Every attribute that carries location data and must be stripped from copied markup
pub const MARKER_ATTRIBUTES: [&str; 6] = [
    ATTR_LOCATOR,
    ATTR_ID,
    ATTR_STYLED,
    ATTR_FILE,
    ATTR_LINE,
    ATTR_COLUMN,
];

/// Encodes a location as `file:line:column`
pub fn encode(file: &str, line: usize, column: usize) -> String {
    format!("{}:{}:{}", file, line, column)
}

/// Decodes a `file:line:column` value.
///
/// A non-numeric column degrades to 0; a non-numeric line or an empty file fails the decode.
pub fn decode(value: &str) -> Option<SourceLocation> {
    let mut parts: Vec<&str> = value.split(':').collect();
    if parts.len() < 3 {
        return None;
    }

    let column = parts.pop().and_then(parse_leading_int).unwrap_or(0);
    let line = parts.pop().and_then(parse_leading_int)?;
    let file = parts.join(":");
    if file.is_empty() {
        return None;
    }

    Some(SourceLocation::new(file, line, column))
}

/// Encodes an ID reference into a per-file metadata table as `file::id`
pub fn encode_id(file: &str, id: usize) -> String {
    format!("{}::{}", file, id)
}

/// Splits a `file::id` value into its file key and numeric ID
pub fn parse_id(value: &str) -> Option<(&str, usize)> {
    let (file, id) = value.rsplit_once("::")?;
    if file.is_empty() {
        return None;
    }
    let id = id.trim().parse().ok()?;
    Some((file, id))
}

/// Integer parsing with the lenient semantics the attribute values have always had:
/// leading whitespace is skipped and trailing garbage after the digits is ignored.
pub(crate) fn parse_leading_int(segment: &str) -> Option<usize> {
    let trimmed = segment.trim_start();
    let digits = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, c)| idx + c.len_utf8())?;
    trimmed[..digits].parse().ok()
}

/// Parses a standalone numeric attribute (split-attribute format)
pub fn parse_number(value: &str) -> Option<usize> {
    parse_leading_int(value)
}
