//! SQ encode command: 4-channel LF/RF/LB/RB to 2-channel LT/RT.

use super::common::{FilterArgs, GlobalOptions, OutputArgs, block_progress, latency_ms};
use anyhow::Context;
use clap::Args;
use quadra_core::{BlockFramer, SqEncoder};
use quadra_io::{read_wav_channels, write_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct EncodeArgs {
    /// Input 4-channel WAV file (LF, RF, LB, RB)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output 2-channel WAV file (LT, RT)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,

    #[command(flatten)]
    out: OutputArgs,
}

pub fn run(args: EncodeArgs, global: &GlobalOptions) -> anyhow::Result<()> {
    let config = args.filter.resolve(&global.settings)?;
    let format = args.out.resolve(&global.settings);

    tracing::info!(input = %args.input.display(), "reading");
    let (input, spec) = read_wav_channels(&args.input, 4)
        .with_context(|| format!("failed to read input WAV {}", args.input.display()))?;

    let encoder = SqEncoder::new(config);
    tracing::info!(
        block_size = config.block_size(),
        overlap = config.overlap(),
        latency = encoder.latency(),
        latency_ms = latency_ms(encoder.latency(), spec.sample_rate),
        "encoder configured"
    );
    if global.verbose {
        println!("{}", encoder.info());
    }

    let pb = block_progress(BlockFramer::new(&config).block_count(input.len()), global.quiet)?;
    let output = encoder
        .process_with_progress(&input, |done, _| pb.set_position(done as u64))
        .context("encoding failed")?;
    pb.finish_and_clear();

    write_wav(&args.output, &output, spec.sample_rate, format)
        .with_context(|| format!("failed to write output WAV {}", args.output.display()))?;

    if !global.quiet {
        println!(
            "Successfully encoded {} -> {} ({})",
            args.input.display(),
            args.output.display(),
            format
        );
    }
    Ok(())
}
