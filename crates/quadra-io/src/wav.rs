//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat as HoundFormat, WavReader, WavWriter};
use quadra_core::MultiChannelBuffer;
use std::fmt;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

impl From<HoundFormat> for WavFormat {
    fn from(format: HoundFormat) -> Self {
        match format {
            HoundFormat::Float => WavFormat::IeeeFloat,
            HoundFormat::Int => WavFormat::Pcm,
        }
    }
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Format of a WAV file that was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Audio encoding format.
    pub format: WavFormat,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            format: spec.sample_format.into(),
        }
    }
}

/// Output sample encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleFormat {
    /// 16-bit integer PCM.
    #[default]
    Pcm16,
    /// 24-bit integer PCM.
    Pcm24,
    /// 32-bit IEEE float.
    Float32,
}

impl SampleFormat {
    /// Bits per sample.
    pub fn bits_per_sample(self) -> u16 {
        match self {
            SampleFormat::Pcm16 => 16,
            SampleFormat::Pcm24 => 24,
            SampleFormat::Float32 => 32,
        }
    }

    /// Short name (`pcm16`, `pcm24`, `float32`).
    pub fn name(self) -> &'static str {
        match self {
            SampleFormat::Pcm16 => "pcm16",
            SampleFormat::Pcm24 => "pcm24",
            SampleFormat::Float32 => "float32",
        }
    }

    fn hound_spec(self, channels: u16, sample_rate: u32) -> hound::WavSpec {
        hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: self.bits_per_sample(),
            sample_format: match self {
                SampleFormat::Float32 => HoundFormat::Float,
                SampleFormat::Pcm16 | SampleFormat::Pcm24 => HoundFormat::Int,
            },
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = if spec.sample_rate == 0 {
        0.0
    } else {
        num_frames as f64 / f64::from(spec.sample_rate)
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format: spec.sample_format.into(),
    })
}

/// Read every channel of a WAV file.
///
/// # Example
/// ```ignore
/// let (buffer, spec) = read_wav("input.wav")?;
/// println!("{} channels at {} Hz", buffer.channel_count(), spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(MultiChannelBuffer, WavSpec)> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading wav");
    decode(WavReader::open(path)?)
}

/// Read a WAV file that must have exactly `channels` channels.
pub fn read_wav_channels<P: AsRef<Path>>(
    path: P,
    channels: u16,
) -> Result<(MultiChannelBuffer, WavSpec)> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), channels, "reading wav");
    let reader = WavReader::open(path)?;
    let actual = reader.spec().channels;
    if actual != channels {
        return Err(Error::ChannelMismatch {
            expected: channels,
            actual,
        });
    }
    decode(reader)
}

/// Read a WAV image held in memory.
pub fn read_wav_bytes(bytes: &[u8]) -> Result<(MultiChannelBuffer, WavSpec)> {
    decode(WavReader::new(Cursor::new(bytes))?)
}

fn decode<R: Read>(reader: WavReader<R>) -> Result<(MultiChannelBuffer, WavSpec)> {
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels);
    if channels == 0 {
        return Err(Error::UnsupportedFormat("WAV file has no channels".into()));
    }

    let interleaved: Vec<f64> = match spec.format {
        WavFormat::IeeeFloat => {
            if spec.bits_per_sample != 32 {
                return Err(Error::UnsupportedFormat(format!(
                    "{}-bit float",
                    spec.bits_per_sample
                )));
            }
            reader
                .into_samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
        WavFormat::Pcm => {
            let bits = spec.bits_per_sample;
            if bits == 0 || bits > 32 {
                return Err(Error::UnsupportedFormat(format!("{bits}-bit PCM")));
            }
            let max_val = f64::from(1u32 << (bits - 1));
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let buffer = MultiChannelBuffer::from_interleaved(&interleaved, channels);
    tracing::debug!(
        channels,
        frames = buffer.len(),
        sample_rate = spec.sample_rate,
        "decoded wav"
    );
    Ok((buffer, spec))
}

/// Write a buffer to a WAV file.
///
/// Non-finite samples are written as 0 and all samples are clamped to [-1, 1].
///
/// # Example
/// ```ignore
/// let quad = MultiChannelBuffer::silent(4, 44100);
/// write_wav("output.wav", &quad, 44100, SampleFormat::Pcm16)?;
/// ```
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    buffer: &MultiChannelBuffer,
    sample_rate: u32,
    format: SampleFormat,
) -> Result<()> {
    let path = path.as_ref();
    tracing::debug!(
        path = %path.display(),
        channels = buffer.channel_count(),
        frames = buffer.len(),
        %format,
        "writing wav"
    );
    let spec = output_spec(buffer, sample_rate, format)?;
    let writer = WavWriter::create(path, spec)?;
    encode(writer, buffer, format)
}

/// Write a buffer as an in-memory WAV image.
pub fn write_wav_bytes(
    buffer: &MultiChannelBuffer,
    sample_rate: u32,
    format: SampleFormat,
) -> Result<Vec<u8>> {
    let spec = output_spec(buffer, sample_rate, format)?;
    let mut bytes = Vec::new();
    let writer = WavWriter::new(Cursor::new(&mut bytes), spec)?;
    encode(writer, buffer, format)?;
    Ok(bytes)
}

fn output_spec(
    buffer: &MultiChannelBuffer,
    sample_rate: u32,
    format: SampleFormat,
) -> Result<hound::WavSpec> {
    buffer.validate(buffer.channel_count())?;
    let channels = u16::try_from(buffer.channel_count())
        .ok()
        .filter(|&c| c > 0)
        .ok_or_else(|| {
            Error::UnsupportedFormat(format!("{} channels", buffer.channel_count()))
        })?;
    Ok(format.hound_spec(channels, sample_rate))
}

/// Replace non-finite values with 0 and clamp to [-1, 1].
fn sanitize(sample: f64) -> f64 {
    if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn encode<W: Write + Seek>(
    mut writer: WavWriter<W>,
    buffer: &MultiChannelBuffer,
    format: SampleFormat,
) -> Result<()> {
    let len = buffer.len();
    match format {
        SampleFormat::Float32 => {
            for i in 0..len {
                for channel in &buffer.channels {
                    writer.write_sample(sanitize(channel[i]) as f32)?;
                }
            }
        }
        SampleFormat::Pcm16 | SampleFormat::Pcm24 => {
            let scale = f64::from((1i32 << (format.bits_per_sample() - 1)) - 1);
            for i in 0..len {
                for channel in &buffer.channels {
                    writer.write_sample((sanitize(channel[i]) * scale) as i32)?;
                }
            }
        }
    }

    writer.finalize()?;
    Ok(())
}
