//! SQ decode command: 2-channel LT/RT to 4-channel LF/RF/LB/RB.

use super::common::{FilterArgs, GlobalOptions, OutputArgs, block_progress, latency_ms};
use anyhow::Context;
use clap::Args;
use quadra_core::{BlockFramer, SqDecoder};
use quadra_io::{read_wav_channels, write_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct DecodeArgs {
    /// Input 2-channel WAV file (LT, RT)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output 4-channel WAV file (LF, RF, LB, RB)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Enable logic steering
    #[arg(long)]
    logic: bool,

    #[command(flatten)]
    filter: FilterArgs,

    #[command(flatten)]
    out: OutputArgs,
}

pub fn run(args: DecodeArgs, global: &GlobalOptions) -> anyhow::Result<()> {
    let config = args.filter.resolve(&global.settings)?;
    let steering = global.steering(args.logic)?;
    let format = args.out.resolve(&global.settings);

    tracing::info!(input = %args.input.display(), "reading");
    let (input, spec) = read_wav_channels(&args.input, 2)
        .with_context(|| format!("failed to read input WAV {}", args.input.display()))?;
    tracing::info!(
        sample_rate = spec.sample_rate,
        samples = input.len(),
        "input loaded"
    );

    let mut decoder = SqDecoder::new(config);
    decoder.set_sample_rate(spec.sample_rate);
    decoder.set_logic_steering(steering)?;
    tracing::info!(
        block_size = config.block_size(),
        overlap = config.overlap(),
        latency = decoder.latency(),
        latency_ms = latency_ms(decoder.latency(), spec.sample_rate),
        logic = steering.enabled,
        "decoder configured"
    );
    if global.verbose {
        println!("{}", decoder.info());
    }

    let pb = block_progress(BlockFramer::new(&config).block_count(input.len()), global.quiet)?;
    let output = decoder
        .process_with_progress(&input, |done, _| pb.set_position(done as u64))
        .context("decoding failed")?;
    pb.finish_and_clear();

    write_wav(&args.output, &output, spec.sample_rate, format)
        .with_context(|| format!("failed to write output WAV {}", args.output.display()))?;

    if !global.quiet {
        println!(
            "Successfully decoded {} -> {} ({})",
            args.input.display(),
            args.output.display(),
            format
        );
    }
    Ok(())
}
