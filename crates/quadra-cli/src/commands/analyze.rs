//! Channel separation analysis via encode -> decode.

use super::common::{FilterArgs, GlobalOptions, format_separation};
use anyhow::Context;
use clap::{Args, ValueEnum};
use quadra_analysis::{LeakMode, PairMode, SeparationAnalyzer, SeparationOptions};
use quadra_core::QuadChannel;
use quadra_io::read_wav_channels;
use std::path::PathBuf;

/// Leak aggregation for CLI
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliLeakMode {
    #[default]
    Max,
    Avg,
}

impl From<CliLeakMode> for LeakMode {
    fn from(m: CliLeakMode) -> Self {
        match m {
            CliLeakMode::Max => LeakMode::Max,
            CliLeakMode::Avg => LeakMode::Avg,
        }
    }
}

/// Pair separation source for CLI
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliPairMode {
    #[default]
    Isolated,
    Full,
}

impl From<CliPairMode> for PairMode {
    fn from(m: CliPairMode) -> Self {
        match m {
            CliPairMode::Isolated => PairMode::Isolated,
            CliPairMode::Full => PairMode::Full,
        }
    }
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Reference 4-channel WAV file (LF, RF, LB, RB)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Enable logic steering in the decoder
    #[arg(long)]
    logic: bool,

    /// Leakage aggregation
    #[arg(long, value_enum, default_value = "max")]
    leak_mode: CliLeakMode,

    /// Min frequency for band-limited analysis (Hz, 0 = off)
    #[arg(long, default_value = "0")]
    fmin: f64,

    /// Max frequency for band-limited analysis (Hz, 0 = Nyquist)
    #[arg(long, default_value = "0")]
    fmax: f64,

    /// Pair separation from isolated runs or the full mix
    #[arg(long, value_enum, default_value = "isolated")]
    pair_mode: CliPairMode,

    #[command(flatten)]
    filter: FilterArgs,
}

pub fn run(args: AnalyzeArgs, global: &GlobalOptions) -> anyhow::Result<()> {
    let config = args.filter.resolve(&global.settings)?;
    let steering = global.steering(args.logic)?;

    let (reference, spec) = read_wav_channels(&args.input, 4)
        .with_context(|| format!("failed to read input WAV {}", args.input.display()))?;

    let options = SeparationOptions::new(args.leak_mode.into()).with_band(
        spec.sample_rate,
        args.fmin,
        args.fmax,
    );
    let analyzer = SeparationAnalyzer::new(config, spec.sample_rate)
        .with_steering(steering)
        .with_options(options)
        .with_pair_mode(args.pair_mode.into());

    tracing::info!(
        block_size = config.block_size(),
        overlap = config.overlap(),
        logic = steering.enabled,
        band_limited = options.is_band_limited(),
        "analyzing"
    );
    let report = analyzer.analyze(&reference).context("analysis failed")?;

    println!("Separation analysis (encode -> decode, isolated channels)");
    println!("Input: {}", args.input.display());
    if report.logic_steering {
        println!("Logic steering: enabled");
    }
    if options.is_band_limited() {
        let fmax = if args.fmax > 0.0 {
            format!("{:.1}", args.fmax)
        } else {
            "Nyquist".to_string()
        };
        println!("Band: {:.1} Hz - {}", args.fmin.max(0.0), fmax);
    }

    println!("\nChannel  TargetRMS   LeakRMS  Sep(dB)");
    for ch in QuadChannel::ALL {
        let result = report.channels[ch.index()];
        println!(
            "{:<7} {:9.6} {:9.6} {:>7}",
            ch.label(),
            result.target_rms,
            result.leak_rms,
            format_separation(result.separation_db)
        );
    }

    println!("\nPair separation (dB)");
    let pairs: Vec<String> = report
        .pairs
        .iter()
        .map(|p| {
            format!(
                "{}->{}: {}",
                p.target,
                p.leak,
                format_separation(p.result.separation_db)
            )
        })
        .collect();
    println!("{}", pairs.join("  "));

    Ok(())
}
