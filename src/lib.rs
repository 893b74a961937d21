//! Monthly new-song discovery counts from a streaming-service data export.
//!
//! Core modules, in pipeline order:
//! - [`library`] - Library catalog parsing (with the [`literal`] record decoder)
//! - [`identity`] - `artist:track` join keys
//! - [`classify`] - In-library / podcast classification
//! - [`histogram`] - Per-month aggregation
//! - [`report`] - Charts and tables
//!
//! ### Supporting Modules
//!
//! - [`history`] - Streaming history loading
//! - [`pipeline`] - Runs the stages end to end
//! - [`config`] - Runtime configuration
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`error`] - Error and warning types
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use newlistens::{pipeline, report};
//! use std::path::{Path, PathBuf};
//!
//! let analysis = pipeline::run(
//!     &[PathBuf::from("MyData/StreamingHistory0.json")],
//!     Path::new("MyData/YourLibrary.json"),
//!     "tracks",
//! )?;
//! print!("{}", report::format_table(&analysis.histogram));
//!
//! let charts = report::render(&analysis.histogram);
//! report::write_all(&charts, Path::new("charts"), (1024, 640))?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## What counts as a new listen
//!
//! A stream event is a *new song listen* when both hold:
//!
//! - its `artist:track` key is not in the saved library, and
//! - its artist *is* in the library's artist set (otherwise the event is
//!   taken to be a podcast).
//!
//! ```
//! use newlistens::classify::classify;
//! use newlistens::histogram::{aggregate, Month};
//! use newlistens::history::StreamEvent;
//! use newlistens::library::LibraryEntry;
//!
//! let library = vec![LibraryEntry::new("Artist A", "Track 1", Some("AlbumX"), Some("spotify:track:abc"))];
//! let events = vec![
//!     StreamEvent::new("Artist A", "Track 1", "2020-05-10 08:00", 200_000),
//!     StreamEvent::new("Artist A", "Track 9", "2020-05-11 09:00", 300_000),
//! ];
//!
//! let histogram = aggregate(&classify(&events, &library));
//! assert_eq!(histogram.count("2020", Month::May), Some(1));
//! ```
//!
//! ## Error Handling
//!
//! Domain errors are typed ([`error::SchemaInferenceError`],
//! [`error::LoadError`], [`error::MalformedTimestampError`]); the pipeline
//! and binary wrap them in `anyhow::Error` with the offending file named.
//! A library cut short mid-way is not an error: the valid prefix is used
//! and an [`error::PartialParseWarning`] is logged.

pub mod classify;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod histogram;
pub mod history;
pub mod identity;
pub mod library;
pub mod literal;
pub mod pipeline;
pub mod report;
