#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that enumerates ice creams and draws them.

mod config;
mod pipeline;

use std::{
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use icecream_core::{FingerprintPolicy, RunParameters, UsageError};
use icecream_rendering::{Presentation, RenderingBackend};
use icecream_rendering_macroquad::MacroquadBackend;
use icecream_system_layout::Canvas;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use self::{
    config::{FileConfig, Overrides, Settings},
    pipeline::Menu,
};

/// Exit status reported for invalid arguments (`EX_USAGE` from sysexits).
const EX_USAGE: u8 = 64;

/// Draw every distinct ice cream made from a number of flavors and scoops.
#[derive(Debug, Parser)]
#[command(name = "icecream", version)]
struct Cli {
    /// Number of flavors to choose from.
    #[arg(short = 'f', long = "num-flavors", alias = "num_flavors")]
    num_flavors: Option<u32>,

    /// Number of scoops on every ice cream.
    #[arg(short = 's', long = "num-scoops", alias = "num_scoops")]
    num_scoops: Option<u32>,

    /// Save a PNG snapshot of the first frame to this path.
    #[arg(short = 'o', long = "output-filename", alias = "output_filename")]
    output_filename: Option<PathBuf>,

    /// Seed for flavor colors; a random seed is used when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Rule deciding when two ice creams are the same.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Initial window width.
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height.
    #[arg(long)]
    height: Option<u32>,

    /// Font size of the summary label.
    #[arg(long)]
    font_size: Option<u16>,

    /// Compute and log the layout for the window size without opening a window.
    #[arg(long)]
    headless: bool,

    /// Render as fast as possible instead of waiting for the display refresh.
    #[arg(long)]
    no_vsync: bool,

    /// TOML file supplying defaults for any of the options above.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Different scoop counts per flavor make different ice creams.
    Sensitive,
    /// Only the set of flavors matters.
    Insensitive,
}

impl From<PolicyArg> for FingerprintPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Sensitive => Self::MultiplicitySensitive,
            PolicyArg::Insensitive => Self::MultiplicityInsensitive,
        }
    }
}

/// Entry point for the ice cream command-line interface.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(io::stdout().is_terminal())
        .compact()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let status = failure_status(&error);
            if status == EX_USAGE {
                eprintln!("{error}");
            } else {
                error!("{error:#}");
            }
            ExitCode::from(status)
        }
    }
}

/// Maps a failed run to its process exit status.
fn failure_status(error: &anyhow::Error) -> u8 {
    if error.downcast_ref::<UsageError>().is_some() {
        EX_USAGE
    } else {
        1
    }
}

fn run(cli: Cli) -> Result<()> {
    let file = match cli.config.as_deref() {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let overrides = Overrides {
        num_flavors: cli.num_flavors,
        num_scoops: cli.num_scoops,
        seed: cli.seed,
        policy: cli.policy.map(FingerprintPolicy::from),
        window_width: cli.width,
        window_height: cli.height,
        font_size: cli.font_size,
    };
    let settings = Settings::resolve(overrides, file);

    let parameters = RunParameters::new(settings.num_flavors, settings.num_scoops)?;
    if let Some(path) = cli.output_filename.as_deref() {
        ensure_writable_parent(path)?;
    }

    let seed = settings.seed.unwrap_or_else(rand::random);
    let menu = Menu::prepare(parameters, settings.policy, seed)?;

    if cli.headless {
        let canvas = Canvas::new(
            settings.window_width as f32,
            settings.window_height as f32,
        )?;
        let layout = menu.layout(canvas)?;
        info!(
            circles = layout.circles.len(),
            label = %layout.label.text,
            "headless layout complete"
        );
        return Ok(());
    }

    let presentation = Presentation::new(
        settings.window_title,
        settings.window_width,
        settings.window_height,
    )
    .with_snapshot(cli.output_filename);
    let backend = MacroquadBackend::new()
        .with_vsync(!cli.no_vsync)
        .with_font_size(settings.font_size);

    backend.run(presentation, move |viewport| menu.scene(viewport))
}

fn ensure_writable_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure!(
            parent.is_dir(),
            "snapshot directory {} does not exist",
            parent.display()
        );
    }
    Ok(())
}
