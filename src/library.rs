//! # Library Catalog Module
//!
//! Turns the saved-library export into [`LibraryEntry`] records.
//!
//! The export is a JSON object keyed by section (`tracks`, `albums`,
//! `shows`, `episodes`, `bannedTracks`, `artists`, `other`). Only one
//! section is read, `tracks` by default. Its elements are "blobs": a JSON
//! object, a string holding a dict literal, or `null` padding.
//!
//! ## Tolerance
//!
//! - The first blob defines the schema. If it is unusable nothing can be
//!   produced and [`parse`] fails with [`SchemaInferenceError`].
//! - A later unusable blob ends the parse. Everything before it is kept and
//!   a [`PartialParseWarning`] is logged and returned with the result.
//!
//! Exports are often padded with trailing `null`s or cut short, so salvaging
//! the valid prefix is the normal case rather than an exception.

use crate::error::{LoadError, PartialParseWarning, SchemaInferenceError};
use crate::identity::{self, Identity};
use crate::literal;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Section read when none is configured.
pub const DEFAULT_SECTION: &str = "tracks";

/// Sections found in a library export, in their export order.
pub const LIBRARY_SECTIONS: [&str; 7] = [
    "tracks",
    "albums",
    "shows",
    "episodes",
    "bannedTracks",
    "artists",
    "other",
];

/// Columns every record needs for the identity key.
pub const REQUIRED_COLUMNS: [&str; 2] = ["artist", "track"];

/// One undecoded catalog element.
pub type RawRecord = Value;

/// One saved record from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryEntry {
    pub artist: String,
    pub track: String,
    pub album: Option<String>,
    pub uri: Option<String>,
}

impl LibraryEntry {
    pub fn new(artist: &str, track: &str, album: Option<&str>, uri: Option<&str>) -> Self {
        Self {
            artist: artist.to_string(),
            track: track.to_string(),
            album: album.map(str::to_string),
            uri: uri.map(str::to_string),
        }
    }

    /// Third segment of `uri`, if there is one.
    #[must_use]
    pub fn track_uri(&self) -> Option<&str> {
        self.uri.as_deref().and_then(identity::track_uri)
    }
}

impl Identity for LibraryEntry {
    fn artist(&self) -> &str {
        &self.artist
    }

    fn track(&self) -> &str {
        &self.track
    }
}

/// Column names established by the first record, in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub columns: Vec<String>,
}

impl Schema {
    fn infer(fields: &Map<String, Value>) -> Result<Self, String> {
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !fields.contains_key(**c)) {
            return Err(format!("missing required column `{missing}`"));
        }
        let mut columns: Vec<String> = fields.keys().cloned().collect();
        columns.sort();
        Ok(Self { columns })
    }

    fn check(&self, fields: &Map<String, Value>) -> Result<(), String> {
        match self.columns.iter().find(|c| !fields.contains_key(c.as_str())) {
            Some(missing) => Err(format!("missing column `{missing}`")),
            None => Ok(()),
        }
    }
}

/// Result of parsing a catalog section.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLibrary {
    pub entries: Vec<LibraryEntry>,
    pub schema: Schema,
    /// Set when parsing stopped before the end of the input.
    pub warning: Option<PartialParseWarning>,
}

/// Parse raw catalog blobs into entries, keeping input order.
///
/// # Errors
///
/// [`SchemaInferenceError`] when the input is empty or the first blob is
/// unusable. Later failures truncate instead of failing.
pub fn parse(raw_records: &[RawRecord]) -> Result<ParsedLibrary, SchemaInferenceError> {
    let Some((first, rest)) = raw_records.split_first() else {
        return Err(SchemaInferenceError {
            reason: "the catalog section is empty".to_string(),
        });
    };

    let first_fields = decode(first).map_err(|reason| SchemaInferenceError { reason })?;
    let schema = Schema::infer(&first_fields).map_err(|reason| SchemaInferenceError { reason })?;
    let first_entry = entry_from_fields(&first_fields).map_err(|reason| SchemaInferenceError { reason })?;
    debug!("Inferred library schema: {:?}", schema.columns);

    let mut entries = Vec::with_capacity(raw_records.len());
    entries.push(first_entry);
    let mut warning = None;

    for (offset, raw) in rest.iter().enumerate() {
        let index = offset + 1;
        let parsed = decode(raw).and_then(|fields| {
            schema.check(&fields)?;
            entry_from_fields(&fields)
        });
        match parsed {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                let w = PartialParseWarning { index, reason };
                warn!("{w}");
                warning = Some(w);
                break;
            }
        }
    }

    Ok(ParsedLibrary {
        entries,
        schema,
        warning,
    })
}

/// Read a library export and parse one of its sections.
///
/// A truncated section is not an error: the result carries a
/// [`PartialParseWarning`] instead.
///
/// # Errors
///
/// Every variant of [`LoadError`] names `path`:
/// - [`LoadError::Io`] / [`LoadError::Json`]: unreadable file or invalid JSON
/// - [`LoadError::MissingSection`] / [`LoadError::SectionNotList`]: `section`
///   is absent or not an array
/// - [`LoadError::Schema`]: the section is empty or its first record is unusable
///
/// # Examples
///
/// ```no_run
/// use newlistens::library::{load_library, DEFAULT_SECTION};
/// use std::path::Path;
///
/// let library = load_library(Path::new("MyData/YourLibrary.json"), DEFAULT_SECTION)?;
/// if let Some(warning) = &library.warning {
///     eprintln!("{warning}");
/// }
/// # Ok::<(), newlistens::error::LoadError>(())
/// ```
pub fn load_library(path: &Path, section: &str) -> Result<ParsedLibrary, LoadError> {
    debug!("Reading library from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document: Map<String, Value> =
        serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let raw = match document.remove(section) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(LoadError::SectionNotList {
                path: path.to_path_buf(),
                section: section.to_string(),
            })
        }
        None => {
            return Err(LoadError::MissingSection {
                path: path.to_path_buf(),
                section: section.to_string(),
            })
        }
    };

    let parsed = parse(&raw).map_err(|source| LoadError::Schema {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Parsed {} of {} library records from section `{}`",
        parsed.entries.len(),
        raw.len(),
        section
    );
    Ok(parsed)
}

/// Decode one blob into a non-empty field mapping.
fn decode(raw: &RawRecord) -> Result<Map<String, Value>, String> {
    let value = match raw {
        Value::Null => return Err("null placeholder".to_string()),
        Value::String(text) => literal::parse_literal(text.trim())
            .map_err(|e| format!("undecodable record text: {e}"))?
            .into_json(),
        other => other.clone(),
    };

    match value {
        Value::Object(fields) if fields.is_empty() => Err("empty record".to_string()),
        Value::Object(fields) => Ok(fields),
        Value::Null => Err("null placeholder".to_string()),
        other => Err(format!("expected a mapping, found {}", kind(&other))),
    }
}

fn entry_from_fields(fields: &Map<String, Value>) -> Result<LibraryEntry, String> {
    let required = |name: &str| text_field(fields, name).ok_or_else(|| format!("`{name}` is null"));
    Ok(LibraryEntry {
        artist: required("artist")?,
        track: required("track")?,
        album: text_field(fields, "album"),
        uri: text_field(fields, "uri"),
    })
}

/// A field as text. Missing and null fields are `None`; other scalars are
/// rendered as they appear in JSON.
fn text_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
