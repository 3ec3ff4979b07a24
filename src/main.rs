//! mc-render CLI
//!
//! One-shot renderer producing the deployable Miningcore configuration.
//! Designed to run from hooks: warnings go to stderr and the run keeps
//! going, while only a missing base template (exit 2), an unusable
//! fragments directory, or a failed write (exit 1) abort it.

use clap::Parser;
use std::path::PathBuf;
use std::process;

use miningcore_render::render::{render, RenderOptions};
use miningcore_render::settings::{PathOverrides, Settings};
use miningcore_render::{logging, writer};

#[derive(Parser)]
#[command(name = "mc-render")]
#[command(about = "Render the deployable Miningcore configuration", version)]
struct Cli {
    /// Base directory containing all inputs and the output
    #[arg(long, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Base configuration template (default: <home>/config.base.json)
    #[arg(long, value_name = "FILE")]
    base_config: Option<PathBuf>,

    /// Directory of per-pool fragments (default: <home>/pools.d)
    #[arg(long, value_name = "DIR")]
    pools_dir: Option<PathBuf>,

    /// Fee policy document (default: <home>/fees.json)
    #[arg(long, value_name = "FILE")]
    fees: Option<PathBuf>,

    /// Rendered configuration output (default: <home>/config.json)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Run the full render without writing the output
    #[arg(long)]
    check: bool,

    /// Write a JSON render summary to this path
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Suppress the success diagnostic on stdout
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> PathOverrides {
        PathOverrides {
            home: self.home.clone(),
            base_config: self.base_config.clone(),
            pools_dir: self.pools_dir.clone(),
            fees: self.fees.clone(),
            out_config: self.out.clone(),
        }
    }
}

fn main() {
    logging::init();

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli.overrides());
    let options = RenderOptions { check: cli.check };

    let summary = match render(&settings, &options) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("{e}");
            process::exit(e.exit_code());
        }
    };

    if let Some(path) = cli.summary.as_deref() {
        let rendered = match summary.to_json() {
            Ok(json) => json + "\n",
            Err(e) => {
                log::error!("failed to serialize render summary: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = writer::write_atomic(path, rendered.as_bytes()) {
            log::error!("failed to write render summary {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    if !cli.quiet {
        if cli.check {
            println!(
                "OK: would write {} with {} pool(s)",
                settings.out_config.display(),
                summary.pool_count
            );
        } else {
            println!(
                "Wrote {} with {} pool(s)",
                settings.out_config.display(),
                summary.pool_count
            );
        }
    }
}
