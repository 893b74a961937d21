//! End-to-end run: load inputs, classify, aggregate.

use crate::classify::{self, ClassificationSummary};
use crate::error::PartialParseWarning;
use crate::histogram::{self, MonthlyHistogram};
use crate::history::{self, StreamEvent};
use crate::library::{self, ParsedLibrary};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything a run produces before presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub summary: ClassificationSummary,
    pub histogram: MonthlyHistogram,
    pub library_entries: usize,
    #[serde(skip)]
    pub library_warning: Option<PartialParseWarning>,
}

/// Classify `events` against an already parsed library and bucket the result.
pub fn analyze(events: &[StreamEvent], library: &ParsedLibrary) -> Analysis {
    let classified = classify::classify(events, &library.entries);
    let summary = ClassificationSummary::from_events(&classified);
    let histogram = histogram::aggregate(&classified);

    if histogram.skipped() > 0 {
        warn!("{} new listens had malformed timestamps and were skipped", histogram.skipped());
    }

    Analysis {
        summary,
        histogram,
        library_entries: library.entries.len(),
        library_warning: library.warning.clone(),
    }
}

/// Load the history files and the library section, then [`analyze`].
///
/// # Errors
///
/// Fails if any input cannot be read or parsed, or if the library's first
/// record is unusable. A truncated library is not an error.
pub fn run(streaming: &[PathBuf], library_path: &Path, section: &str) -> Result<Analysis> {
    let events = history::load_histories(streaming).context("Failed to load streaming history")?;
    let library = library::load_library(library_path, section)
        .with_context(|| format!("Failed to load library section `{section}`"))?;

    if let Some(warning) = &library.warning {
        warn!("Library {} was truncated: {warning}", library_path.display());
    }

    let analysis = analyze(&events, &library);
    info!(
        "{} new song listens across {} year(s)",
        analysis.histogram.total_new_listens(),
        analysis.histogram.rows().len()
    );
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Month;
    use crate::library::{LibraryEntry, Schema};

    fn parsed(entries: Vec<LibraryEntry>) -> ParsedLibrary {
        ParsedLibrary {
            entries,
            schema: Schema::default(),
            warning: None,
        }
    }

    #[test]
    fn test_analyze_scenario() {
        let library = parsed(vec![LibraryEntry::new(
            "Artist A",
            "Track 1",
            Some("AlbumX"),
            Some("spotify:track:abc"),
        )]);
        let events = vec![
            StreamEvent::new("Artist A", "Track 1", "2020-05-10 08:00", 200_000),
            StreamEvent::new("Artist A", "Track 9", "2020-05-11 09:00", 300_000),
            StreamEvent::new("Artist B", "Track 2", "2020-05-12 09:00", 300_000),
        ];
        let analysis = analyze(&events, &library);

        assert_eq!(analysis.summary.total, 3);
        assert_eq!(analysis.summary.new_songs, 1);
        assert_eq!(analysis.histogram.count("2020", Month::May), Some(1));
        assert_eq!(analysis.library_entries, 1);
        assert!(analysis.library_warning.is_none());
    }

    #[test]
    fn test_analyze_carries_library_warning() {
        let mut library = parsed(vec![LibraryEntry::new("A", "T", None, None)]);
        library.warning = Some(PartialParseWarning {
            index: 1,
            reason: "null placeholder".to_string(),
        });
        let analysis = analyze(&[], &library);
        assert_eq!(analysis.library_warning.map(|w| w.index), Some(1));
    }

    #[test]
    fn test_run_reports_missing_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&[dir.path().join("missing.json")], &dir.path().join("lib.json"), "tracks")
            .unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
