//! Audio I/O layer for the quadra SQ tools.
//!
//! Reads and writes channel-major [`MultiChannelBuffer`]s as WAV, from files
//! or in-memory byte slices:
//!
//! - Integer PCM is normalized by `2^(bits-1)`; 32-bit float passes through
//! - On write, non-finite samples become 0 and everything is clamped to [-1, 1]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quadra_core::{FilterConfig, SqDecoder};
//! use quadra_io::{SampleFormat, read_wav_channels, write_wav};
//!
//! let (stereo, spec) = read_wav_channels("input.wav", 2)?;
//! let quad = SqDecoder::new(FilterConfig::default()).process(&stereo)?;
//! write_wav("output.wav", &quad, spec.sample_rate, SampleFormat::Pcm16)?;
//! ```
//!
//! [`MultiChannelBuffer`]: quadra_core::MultiChannelBuffer

mod wav;

pub use wav::{
    SampleFormat, WavFormat, WavInfo, WavSpec, read_wav, read_wav_bytes, read_wav_channels,
    read_wav_info, write_wav, write_wav_bytes,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file's channel count differs from the one requested.
    #[error("input must have {expected} channels, got {actual} channels")]
    ChannelMismatch {
        /// Channel count the caller asked for.
        expected: u16,
        /// Channel count found in the file.
        actual: u16,
    },

    /// The sample format or layout cannot be read or written.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The buffer to write has ragged channels.
    #[error("invalid buffer: {0}")]
    InvalidBuffer(#[from] quadra_core::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
