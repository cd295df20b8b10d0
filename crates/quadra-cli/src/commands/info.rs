//! WAV metadata and, optionally, per-channel levels.

use clap::Args;
use quadra_analysis::rms;
use quadra_core::QuadChannel;
use quadra_io::{WavFormat, read_wav, read_wav_info};
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// WAV file to inspect
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Also load the samples and print peak and RMS per channel
    #[arg(long)]
    levels: bool,
}

/// What a file with `channels` channels holds in SQ terms.
fn layout(channels: u16) -> &'static str {
    match channels {
        2 => "SQ stereo (LT, RT)",
        4 => "quadraphonic (LF, RF, LB, RB)",
        _ => "not an SQ layout",
    }
}

fn channel_label(channels: usize, index: usize) -> String {
    match (channels, index) {
        (2, 0) => "LT".to_string(),
        (2, 1) => "RT".to_string(),
        (4, i) => QuadChannel::ALL[i].label().to_string(),
        (_, i) => format!("ch{i}"),
    }
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;
    let encoding = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {encoding} {}-bit", info.bits_per_sample);
    println!("Channels:    {} - {}", info.channels, layout(info.channels));
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    if args.levels {
        let (buffer, _) = read_wav(&args.file)?;
        let count = buffer.channel_count();
        println!("\nChannel     Peak      RMS");
        for (i, samples) in buffer.channels.iter().enumerate() {
            let peak = samples.iter().fold(0.0f64, |m, x| m.max(x.abs()));
            println!(
                "{:<7} {:8.5} {:8.5}",
                channel_label(count, i),
                peak,
                rms(samples)
            );
        }
    }

    Ok(())
}
