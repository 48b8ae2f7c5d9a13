//! Settings resolution from command-line flags and an optional TOML file.

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use simon_says_core::{Level, Timing};

/// Fully resolved settings for a terminal session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    /// Level every game in the session is played at.
    pub(crate) level: Level,
    /// Seed of the color sequence.
    pub(crate) seed: u64,
    /// Wall-clock speed multiplier applied to the virtual timeline.
    pub(crate) speed: f64,
    /// Durations pacing playback and transitions.
    pub(crate) timing: Timing,
}

/// Contents of a configuration file; every key is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    level: Option<u32>,
    seed: Option<u64>,
    speed: Option<f64>,
    timing: TimingConfig,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct TimingConfig {
    playback_interval_ms: u64,
    turn_grace_ms: u64,
    round_advance_delay_ms: u64,
    pad_flash_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            playback_interval_ms: millis(timing.playback_interval),
            turn_grace_ms: millis(timing.turn_grace),
            round_advance_delay_ms: millis(timing.round_advance_delay),
            pad_flash_ms: millis(timing.pad_flash),
        }
    }
}

impl From<TimingConfig> for Timing {
    fn from(config: TimingConfig) -> Self {
        Self {
            playback_interval: Duration::from_millis(config.playback_interval_ms),
            turn_grace: Duration::from_millis(config.turn_grace_ms),
            round_advance_delay: Duration::from_millis(config.round_advance_delay_ms),
            pad_flash: Duration::from_millis(config.pad_flash_ms),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Merges command-line overrides on top of the file values.
    pub(crate) fn resolve(
        self,
        level: Option<Level>,
        seed: Option<u64>,
        speed: Option<f64>,
    ) -> Result<Settings> {
        let level = match level {
            Some(level) => level,
            None => self
                .level
                .map(Level::new)
                .transpose()
                .context("invalid level in config file")?
                .unwrap_or_default(),
        };

        let speed = speed.or(self.speed).unwrap_or(1.0);
        ensure!(
            speed.is_finite() && speed > 0.0,
            "speed must be a positive number (received {speed})"
        );

        Ok(Settings {
            level,
            seed: seed.or(self.seed).unwrap_or_else(rand::random),
            speed,
            timing: self.timing.into(),
        })
    }
}
