//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use quadra_config::{OutputFormat, Settings};
use quadra_core::{FilterConfig, LogicSteeringConfig, WindowType};
use quadra_io::SampleFormat;
use std::path::Path;

/// Options that apply to every subcommand.
pub struct GlobalOptions {
    /// Settings from `--config`, or defaults.
    pub settings: Settings,
    /// `-v` was given.
    pub verbose: bool,
    /// `-q` was given.
    pub quiet: bool,
}

impl GlobalOptions {
    /// Load the settings file if one was given.
    pub fn load(config: Option<&Path>, verbose: bool, quiet: bool) -> anyhow::Result<Self> {
        let settings = match config {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Settings::load(path)
                    .with_context(|| format!("failed to load settings from {}", path.display()))?
            }
            None => Settings::default(),
        };
        Ok(Self {
            settings,
            verbose,
            quiet,
        })
    }

    /// Steering parameters from the settings, switched on when `force_on` is set.
    pub fn steering(&self, force_on: bool) -> anyhow::Result<LogicSteeringConfig> {
        let mut steering = self
            .settings
            .steering_config()
            .context("invalid [steering] settings")?;
        if force_on {
            steering.enabled = true;
        }
        Ok(steering)
    }
}

/// Window types for CLI
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliWindow {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<CliWindow> for WindowType {
    fn from(w: CliWindow) -> Self {
        match w {
            CliWindow::Hann => WindowType::Hann,
            CliWindow::Hamming => WindowType::Hamming,
            CliWindow::Blackman => WindowType::Blackman,
            CliWindow::Rectangular => WindowType::Rectangular,
        }
    }
}

/// Output sample formats for CLI
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliFormat {
    Pcm16,
    Pcm24,
    Float32,
}

impl From<CliFormat> for SampleFormat {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Pcm16 => SampleFormat::Pcm16,
            CliFormat::Pcm24 => SampleFormat::Pcm24,
            CliFormat::Float32 => SampleFormat::Float32,
        }
    }
}

fn settings_format(format: OutputFormat) -> SampleFormat {
    match format {
        OutputFormat::Pcm16 => SampleFormat::Pcm16,
        OutputFormat::Pcm24 => SampleFormat::Pcm24,
        OutputFormat::Float32 => SampleFormat::Float32,
    }
}

/// Filter geometry flags.
#[derive(Args)]
pub struct FilterArgs {
    /// FFT block size (power of 2)
    #[arg(short = 'b', long)]
    pub block_size: Option<usize>,

    /// Overlap (hop) in samples
    #[arg(short = 'o', long)]
    pub overlap: Option<usize>,

    /// Window applied to the Hilbert kernel
    #[arg(long, value_enum)]
    pub window: Option<CliWindow>,
}

impl FilterArgs {
    /// Merge flags over the settings file and validate.
    pub fn resolve(&self, settings: &Settings) -> anyhow::Result<FilterConfig> {
        let window = match self.window {
            Some(w) => w.into(),
            None => settings.window()?,
        };
        let config = FilterConfig::new(
            self.block_size.unwrap_or(settings.filter.block_size),
            self.overlap.unwrap_or(settings.filter.overlap),
            window,
        )?;
        Ok(config)
    }
}

/// Output encoding flags.
#[derive(Args)]
pub struct OutputArgs {
    /// Output sample format
    #[arg(long, value_enum)]
    pub format: Option<CliFormat>,

    /// Shorthand for --format float32
    #[arg(long, conflicts_with = "format")]
    pub float32: bool,
}

impl OutputArgs {
    /// Merge flags over the settings file.
    pub fn resolve(&self, settings: &Settings) -> SampleFormat {
        if self.float32 {
            return SampleFormat::Float32;
        }
        self.format
            .map_or_else(|| settings_format(settings.output.format), SampleFormat::from)
    }
}

/// Progress bar over processing blocks; hidden when quiet.
pub fn block_progress(total: usize, quiet: bool) -> anyhow::Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

/// Latency in milliseconds at `sample_rate`.
pub fn latency_ms(latency: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    latency as f64 * 1000.0 / f64::from(sample_rate)
}

/// Separation value for display (`+Inf`, `NaN`, or two decimals).
pub fn format_separation(db: f64) -> String {
    if db.is_nan() {
        "NaN".to_string()
    } else if db == f64::INFINITY {
        "+Inf".to_string()
    } else {
        format!("{db:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let settings = Settings::default();
        let args = FilterArgs {
            block_size: Some(2048),
            overlap: None,
            window: Some(CliWindow::Blackman),
        };
        let config = args.resolve(&settings).unwrap();
        assert_eq!(config.block_size(), 2048);
        assert_eq!(config.overlap(), 512);
        assert_eq!(config.window(), WindowType::Blackman);
    }

    #[test]
    fn invalid_geometry_errors() {
        let args = FilterArgs {
            block_size: Some(1000),
            overlap: None,
            window: None,
        };
        assert!(args.resolve(&Settings::default()).is_err());
    }

    #[test]
    fn float32_shorthand_wins() {
        let args = OutputArgs {
            format: None,
            float32: true,
        };
        assert_eq!(args.resolve(&Settings::default()), SampleFormat::Float32);

        let args = OutputArgs {
            format: None,
            float32: false,
        };
        assert_eq!(args.resolve(&Settings::default()), SampleFormat::Pcm16);
    }

    #[test]
    fn separation_formatting() {
        assert_eq!(format_separation(f64::INFINITY), "+Inf");
        assert_eq!(format_separation(f64::NAN), "NaN");
        assert_eq!(format_separation(20.0), "20.00");
    }
}
