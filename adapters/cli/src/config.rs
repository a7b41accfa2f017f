use std::{fs, path::Path};

use anyhow::{Context, Result};
use icecream_core::FingerprintPolicy;
use icecream_rendering_macroquad::DEFAULT_FONT_SIZE;
use serde::Deserialize;

pub(crate) const DEFAULT_NUM_FLAVORS: u32 = 5;
pub(crate) const DEFAULT_NUM_SCOOPS: u32 = 2;
pub(crate) const DEFAULT_WINDOW_WIDTH: u32 = 960;
pub(crate) const DEFAULT_WINDOW_HEIGHT: u32 = 720;
pub(crate) const DEFAULT_WINDOW_TITLE: &str = "Ice creams";

/// Optional settings loaded from a TOML file.
///
/// Every key may be omitted; command-line flags take precedence over the file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) run: RunSection,
    pub(crate) window: WindowSection,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunSection {
    pub(crate) num_flavors: Option<u32>,
    pub(crate) num_scoops: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) policy: Option<FingerprintPolicy>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowSection {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) title: Option<String>,
    pub(crate) font_size: Option<u16>,
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config toml")
    }
}

/// Fully resolved settings for a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) num_flavors: u32,
    pub(crate) num_scoops: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) policy: FingerprintPolicy,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) window_title: String,
    pub(crate) font_size: u16,
}

/// Values supplied on the command line, each overriding the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) num_flavors: Option<u32>,
    pub(crate) num_scoops: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) policy: Option<FingerprintPolicy>,
    pub(crate) window_width: Option<u32>,
    pub(crate) window_height: Option<u32>,
    pub(crate) font_size: Option<u16>,
}

impl Settings {
    /// Merges flags over the file over built-in defaults.
    pub(crate) fn resolve(overrides: Overrides, file: FileConfig) -> Self {
        let FileConfig { run, window } = file;

        Self {
            num_flavors: overrides
                .num_flavors
                .or(run.num_flavors)
                .unwrap_or(DEFAULT_NUM_FLAVORS),
            num_scoops: overrides
                .num_scoops
                .or(run.num_scoops)
                .unwrap_or(DEFAULT_NUM_SCOOPS),
            seed: overrides.seed.or(run.seed),
            policy: overrides.policy.or(run.policy).unwrap_or_default(),
            window_width: overrides
                .window_width
                .or(window.width)
                .unwrap_or(DEFAULT_WINDOW_WIDTH),
            window_height: overrides
                .window_height
                .or(window.height)
                .unwrap_or(DEFAULT_WINDOW_HEIGHT),
            window_title: window
                .title
                .unwrap_or_else(|| DEFAULT_WINDOW_TITLE.to_owned()),
            font_size: overrides
                .font_size
                .or(window.font_size)
                .unwrap_or(DEFAULT_FONT_SIZE),
        }
    }
}
