//! # Command-Line Interface Module
//!
//! Defines the `newlistens` command line with Clap derive macros.
//!
//! ## Commands
//!
//! - `analyze`: Count new song listens per month and draw the charts
//! - `completion`: Print a shell completion script
//!
//! ## Examples
//!
//! ```bash
//! newlistens analyze --library MyData/YourLibrary.json MyData/StreamingHistory0.json
//! newlistens analyze -l YourLibrary.json StreamingHistory*.json --format json --no-charts
//! newlistens completion fish > ~/.config/fish/completions/newlistens.fish
//! ```

use crate::library::LIBRARY_SECTIONS;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// How the histogram is printed to stdout
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Fixed-width table of counts and percentages
    #[default]
    Table,
    /// The full analysis as JSON
    Json,
}

/// Main application arguments structure.
#[derive(Parser)]
#[command(name = "newlistens")]
#[command(about = "New Listens: monthly new-song discovery counts from Spotify data exports")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Count new song listens per month and draw bar charts
    ///
    /// A listen is "new" when the track is not in the saved library and the
    /// artist is one the library knows (anything else is taken to be a
    /// podcast). Writes one combined chart and one chart per year.
    Analyze {
        /// Library export (YourLibrary.json)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        library: PathBuf,

        /// Streaming history files (StreamingHistory0.json, ...), read in order
        #[arg(required = true, num_args = 1.., value_hint = clap::ValueHint::FilePath)]
        streaming: Vec<PathBuf>,

        /// Directory the SVG charts are written to
        #[arg(short, long, env = "NEWLISTENS_OUT_DIR", value_hint = clap::ValueHint::DirPath)]
        out_dir: Option<PathBuf>,

        /// Library section holding the saved tracks
        #[arg(long, env = "NEWLISTENS_SECTION", value_parser = PossibleValuesParser::new(LIBRARY_SECTIONS))]
        section: Option<String>,

        /// Skip drawing charts
        #[arg(long)]
        no_charts: bool,

        /// Output format for stdout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Generate shell completions
    ///
    /// Usage: newlistens completion bash > ~/.local/share/bash-completion/completions/newlistens
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let args = Args::try_parse_from([
            "newlistens",
            "analyze",
            "--library",
            "YourLibrary.json",
            "StreamingHistory0.json",
            "StreamingHistory1.json",
            "--no-charts",
            "--format",
            "json",
        ])
        .unwrap();

        let Command::Analyze {
            library,
            streaming,
            no_charts,
            format,
            ..
        } = args.command
        else {
            panic!("expected analyze");
        };
        assert_eq!(library, PathBuf::from("YourLibrary.json"));
        assert_eq!(streaming.len(), 2);
        assert!(no_charts);
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_section_must_be_a_library_section() {
        let parse = |section: &str| {
            Args::try_parse_from([
                "newlistens", "analyze", "-l", "lib.json", "h.json", "--section", section,
            ])
        };

        let Command::Analyze { section, .. } = parse("bannedTracks").unwrap().command else {
            panic!("expected analyze");
        };
        assert_eq!(section.as_deref(), Some("bannedTracks"));
        assert!(parse("podcasts").is_err());
    }

    #[test]
    fn test_analyze_requires_streaming_files() {
        let result = Args::try_parse_from(["newlistens", "analyze", "--library", "lib.json"]);
        assert!(result.is_err());
    }
}
