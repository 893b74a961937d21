//! # New Listens
//!
//! Counts how many songs you discovered each month from a Spotify data
//! export, and draws the counts as bar charts.
//!
//! ## Usage
//!
//! ```bash
//! # Charts into ./charts, table on stdout
//! newlistens analyze --library MyData/YourLibrary.json MyData/StreamingHistory0.json
//!
//! # Several history files, JSON output, no charts
//! newlistens analyze -l YourLibrary.json StreamingHistory0.json StreamingHistory1.json \
//!     --format json --no-charts
//!
//! # Shell completions
//! newlistens completion bash
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, info};
use newlistens::{cli, completion, config, pipeline, report};

/// Main entry point.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=info newlistens analyze ...` - Stage summaries
/// - `RUST_LOG=newlistens::library=debug newlistens analyze ...` - Parser detail
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Analyze {
            library,
            streaming,
            out_dir,
            section,
            no_charts,
            format,
        } => {
            let config = config::RuntimeConfig::load()?.with_overrides(section, out_dir);
            debug!("Runtime config: {config:?}");

            info!("Analyzing {} history file(s) against {}", streaming.len(), library.display());
            let analysis = pipeline::run(&streaming, &library, &config.section)?;

            if let Some(warning) = &analysis.library_warning {
                eprintln!("warning: {}: {warning}", library.display());
            }

            match format {
                cli::OutputFormat::Table => print!("{}", report::format_table(&analysis.histogram)),
                cli::OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
            }

            if !no_charts {
                let out_dir = config.absolute_out_dir()?;
                let charts = report::render(&analysis.histogram);
                let written = report::write_all(&charts, &out_dir, config.chart_size())?;
                for path in &written {
                    eprintln!("wrote {}", path.display());
                }
            }
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}
