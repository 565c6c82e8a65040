//! Table resource URIs.
//!
//! Each user table is addressable as `firebird://table/{table_name}`. Names
//! are percent-encoded so quoted identifiers with spaces or slashes survive
//! the round trip.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

use crate::error::{DbError, DbResult};

pub const TABLE_URI_TEMPLATE: &str = "firebird://table/{table_name}";
pub const RESOURCE_MIME_TYPE: &str = "application/json";

const SCHEME: &str = "firebird";
const TABLE_HOST: &str = "table";

/// Characters escaped inside the table-name path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URI of the resource describing `table_name`.
pub fn table_uri(table_name: &str) -> String {
    format!(
        "{SCHEME}://{TABLE_HOST}/{}",
        utf8_percent_encode(table_name, SEGMENT)
    )
}

/// Extract the table name from a `firebird://table/{table_name}` URI.
pub fn parse_table_uri(uri: &str) -> DbResult<String> {
    let url = Url::parse(uri).map_err(|e| unknown_uri(uri, &e.to_string()))?;

    if url.scheme() != SCHEME || url.host_str() != Some(TABLE_HOST) {
        return Err(unknown_uri(uri, "expected firebird://table/{table_name}"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(unknown_uri(uri, "query and fragment are not supported"));
    }

    let mut segments = url
        .path_segments()
        .ok_or_else(|| unknown_uri(uri, "missing table name"))?;
    let segment = match (segments.next(), segments.next()) {
        (Some(segment), None) if !segment.is_empty() => segment,
        _ => return Err(unknown_uri(uri, "expected exactly one table name")),
    };

    let name = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|e| unknown_uri(uri, &e.to_string()))?;
    Ok(name.into_owned())
}

fn unknown_uri(uri: &str, reason: &str) -> DbError {
    DbError::invalid_input(format!("Unknown resource URI '{uri}': {reason}"))
}
