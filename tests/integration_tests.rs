//! # Integration Tests for New Listens
//!
//! End-to-end runs over export files written to a temporary directory,
//! through the library API and through the compiled binary.

use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Library record in the literal-text form older exports use
fn literal_blob(artist: &str, track: &str, album: &str, id: &str) -> serde_json::Value {
    json!(format!(
        "{{'artist': '{artist}', 'album': '{album}', 'track': '{track}', 'uri': 'spotify:track:{id}'}}"
    ))
}

/// Test helper to create an export directory with two history files and a
/// library padded with trailing nulls
fn create_export() -> Result<(TempDir, Vec<PathBuf>, PathBuf)> {
    let temp_dir = TempDir::new()?;

    let history0 = temp_dir.path().join("StreamingHistory0.json");
    fs::write(
        &history0,
        json!([
            {"endTime": "2020-05-10 08:00", "artistName": "Artist A", "trackName": "Track 1", "msPlayed": 200000},
            {"endTime": "2020-05-11 09:00", "artistName": "Artist B", "trackName": "Track 2", "msPlayed": 300000},
            {"endTime": "2020-05-12 10:00", "artistName": "Artist A", "trackName": "Track 9", "msPlayed": 180000},
            {"endTime": "2020-11-02 21:15", "artistName": "Artist C", "trackName": "Deep Cut", "msPlayed": 240000},
            {"endTime": "2020/12/01 10:00", "artistName": "Artist C", "trackName": "Other Cut", "msPlayed": 240000}
        ])
        .to_string(),
    )?;

    let history1 = temp_dir.path().join("StreamingHistory1.json");
    fs::write(
        &history1,
        json!([
            {"endTime": "2021-01-03 07:30", "artistName": "Artist C", "trackName": "Deep Cut", "msPlayed": 240000},
            {"endTime": "2021-01-04 07:30", "artistName": "Artist C", "trackName": "New Single", "msPlayed": 200000},
            {"endTime": "2021-03-04 07:30", "artistName": "The Daily Show", "trackName": "Episode 12", "msPlayed": 1800000}
        ])
        .to_string(),
    )?;

    let library = temp_dir.path().join("YourLibrary.json");
    fs::write(
        &library,
        json!({
            "tracks": [
                literal_blob("Artist A", "Track 1", "AlbumX", "abc"),
                literal_blob("Artist C", "Hit", "AlbumY", "def"),
                null,
                literal_blob("Artist B", "Track 2", "AlbumZ", "ghi")
            ],
            "albums": [],
            "shows": [],
            "episodes": [],
            "bannedTracks": [],
            "artists": [],
            "other": []
        })
        .to_string(),
    )?;

    Ok((temp_dir, vec![history0, history1], library))
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use newlistens::histogram::Month;
    use newlistens::pipeline;

    #[test]
    fn test_full_run_counts_new_listens() -> Result<()> {
        let (_temp_dir, histories, library) = create_export()?;
        let analysis = pipeline::run(&histories, &library, "tracks")?;
        let histogram = &analysis.histogram;

        // Truncated at the null: Artist B is unknown, so treated as a podcast.
        assert_eq!(analysis.library_entries, 2);
        assert_eq!(analysis.library_warning.as_ref().map(|w| w.index), Some(2));

        assert_eq!(histogram.years().collect::<Vec<_>>(), vec!["2020", "2021"]);
        assert_eq!(histogram.count("2020", Month::May), Some(1));
        assert_eq!(histogram.count("2020", Month::Nov), Some(1));
        assert_eq!(histogram.count("2020", Month::Dec), Some(0));
        assert_eq!(histogram.count("2021", Month::Jan), Some(2));
        assert_eq!(histogram.count("2021", Month::Mar), Some(0));
        assert_eq!(histogram.skipped(), 1);
        assert_eq!(histogram.total_events(), 8);
        assert_eq!(histogram.total_new_listens(), 4);

        let pct = histogram.percentage("2021", Month::Jan).unwrap();
        assert!((pct - 25.0).abs() < 1e-9);

        assert_eq!(analysis.summary.total, 8);
        assert_eq!(analysis.summary.new_songs, 5);
        assert_eq!(analysis.summary.owned, 1);
        assert_eq!(analysis.summary.podcasts, 2);
        Ok(())
    }

    #[test]
    fn test_null_first_record_aborts() -> Result<()> {
        let (temp_dir, histories, _) = create_export()?;
        let library = temp_dir.path().join("BrokenLibrary.json");
        fs::write(&library, json!({"tracks": [null, literal_blob("A", "T", "X", "id")]}).to_string())?;

        let err = pipeline::run(&histories, &library, "tracks").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("BrokenLibrary.json"));
        assert!(message.contains("schema"));
        Ok(())
    }

    #[test]
    fn test_charts_written_per_year() -> Result<()> {
        let (temp_dir, histories, library) = create_export()?;
        let analysis = pipeline::run(&histories, &library, "tracks")?;
        let out_dir = temp_dir.path().join("charts");

        let charts = newlistens::report::render(&analysis.histogram);
        let written = newlistens::report::write_all(&charts, &out_dir, (640, 400))?;

        assert_eq!(written.len(), 3);
        for name in ["new_listens_monthly.svg", "new_listens_2020.svg", "new_listens_2021.svg"] {
            assert!(out_dir.join(name).exists(), "{name} should exist");
        }
        Ok(())
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn newlistens(config_home: &Path) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_newlistens"));
        // Keep any real user config out of the run.
        cmd.env("XDG_CONFIG_HOME", config_home)
            .env_remove("NEWLISTENS_OUT_DIR")
            .env_remove("NEWLISTENS_SECTION");
        cmd
    }

    #[test]
    fn test_cli_help_displays_correctly() {
        let temp_dir = TempDir::new().unwrap();
        let output = newlistens(temp_dir.path())
            .arg("--help")
            .output()
            .expect("Failed to run help command");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("newlistens"));
        assert!(stdout.contains("analyze"));
        assert!(stdout.contains("completion"));
    }

    #[test]
    fn test_cli_version_flag() {
        let temp_dir = TempDir::new().unwrap();
        let output = newlistens(temp_dir.path())
            .arg("--version")
            .output()
            .expect("Failed to run version command");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("newlistens"));
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_analyze_writes_table_and_charts() -> Result<()> {
        let (temp_dir, histories, library) = create_export()?;
        let out_dir = temp_dir.path().join("out");

        let output = newlistens(temp_dir.path())
            .arg("analyze")
            .arg("--library")
            .arg(&library)
            .args(&histories)
            .arg("--out-dir")
            .arg(&out_dir)
            .output()?;

        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("4 new song listens out of 8 stream events"));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("warning"));
        assert!(out_dir.join("new_listens_monthly.svg").exists());
        Ok(())
    }

    #[test]
    fn test_analyze_json_without_charts() -> Result<()> {
        let (temp_dir, histories, library) = create_export()?;

        let output = newlistens(temp_dir.path())
            .current_dir(temp_dir.path())
            .args(["analyze", "--no-charts", "--format", "json", "--library"])
            .arg(&library)
            .args(&histories)
            .output()?;

        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(value["summary"]["new_songs"], 5);
        assert_eq!(value["histogram"]["total_events"], 8);
        assert!(!temp_dir.path().join("charts").exists());
        Ok(())
    }

    #[test]
    fn test_analyze_missing_section_fails() -> Result<()> {
        let (temp_dir, histories, _) = create_export()?;
        let library = temp_dir.path().join("TracksOnly.json");
        fs::write(&library, json!({"tracks": [literal_blob("A", "T", "X", "id")]}).to_string())?;

        let output = newlistens(temp_dir.path())
            .args(["analyze", "--no-charts", "--section", "albums", "--library"])
            .arg(&library)
            .args(&histories)
            .output()?;

        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("albums"));
        assert!(stderr.contains("TracksOnly.json"));
        Ok(())
    }

    #[test]
    fn test_analyze_rejects_unknown_section() -> Result<()> {
        let (temp_dir, histories, library) = create_export()?;

        let output = newlistens(temp_dir.path())
            .args(["analyze", "--no-charts", "--section", "podcasts", "--library"])
            .arg(&library)
            .args(&histories)
            .output()?;

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("podcasts"));
        assert!(stderr.contains("bannedTracks"));
        Ok(())
    }

    #[test]
    fn test_completion_generation() {
        let temp_dir = TempDir::new().unwrap();
        let output = newlistens(temp_dir.path())
            .args(["completion", "bash"])
            .output()
            .expect("Failed to run completion command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("_newlistens"));
        assert!(stdout.contains("complete"));
    }
}
