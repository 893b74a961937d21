//! Streaming history: the play log from a data export.
//!
//! Each `StreamingHistoryN.json` file is a JSON array of
//! `{"endTime", "artistName", "trackName", "msPlayed"}` records.

use crate::error::LoadError;
use crate::identity::Identity;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MS_PER_MINUTE: f64 = 60_000.0;

/// One playback record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEvent {
    /// `YYYY-MM-DD HH:MM`
    pub end_time: String,
    pub artist_name: String,
    pub track_name: String,
    pub ms_played: u64,
}

impl StreamEvent {
    pub fn new(artist_name: &str, track_name: &str, end_time: &str, ms_played: u64) -> Self {
        Self {
            end_time: end_time.to_string(),
            artist_name: artist_name.to_string(),
            track_name: track_name.to_string(),
            ms_played,
        }
    }

    #[must_use]
    pub fn mins_played(&self) -> f64 {
        self.ms_played as f64 / MS_PER_MINUTE
    }
}

impl Identity for StreamEvent {
    fn artist(&self) -> &str {
        &self.artist_name
    }

    fn track(&self) -> &str {
        &self.track_name
    }
}

/// Load one streaming history file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Json`] if it is not an array of stream records (including a
/// negative `msPlayed`). Both name the file.
///
/// # Examples
///
/// ```no_run
/// use newlistens::history::load_history;
/// use std::path::Path;
///
/// let events = load_history(Path::new("MyData/StreamingHistory0.json"))?;
/// println!("{} plays", events.len());
/// # Ok::<(), newlistens::error::LoadError>(())
/// ```
pub fn load_history(path: &Path) -> Result<Vec<StreamEvent>, LoadError> {
    debug!("Reading streaming history from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let events: Vec<StreamEvent> =
        serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("{} stream events in {}", events.len(), path.display());
    Ok(events)
}

/// Load and concatenate several history files, in the order given.
///
/// # Errors
///
/// Stops at the first file [`load_history`] rejects.
pub fn load_histories<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<StreamEvent>, LoadError> {
    let mut events = Vec::new();
    for path in paths {
        events.extend(load_history(path.as_ref())?);
    }
    info!("Loaded {} stream events from {} file(s)", events.len(), paths.len());
    Ok(events)
}
