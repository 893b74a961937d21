//! Error and warning types shared by the pipeline stages.
//!
//! Fatal conditions are `thiserror` types so callers can match on them;
//! the binary wraps them in `anyhow` with file context.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The first catalog record could not be decoded into a mapping, so no
/// output columns can be established.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot infer library schema from the first record: {reason}")]
pub struct SchemaInferenceError {
    pub reason: String,
}

/// A catalog record after the first one was unusable. Parsing stopped at
/// `index` and everything before it was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialParseWarning {
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for PartialParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "library record {} is unusable ({}); keeping the first {} records",
            self.index, self.reason, self.index
        )
    }
}

/// A stream event whose `endTime` does not split into a year and a month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed timestamp `{end_time}`: {reason}")]
pub struct MalformedTimestampError {
    pub end_time: String,
    pub reason: &'static str,
}

/// Failure to load one of the input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON for this input", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("section `{section}` not found in library {}", path.display())]
    MissingSection { path: PathBuf, section: String },

    #[error("section `{section}` in library {} is not a list", path.display())]
    SectionNotList { path: PathBuf, section: String },

    #[error("library {} is unusable", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaInferenceError,
    },
}
