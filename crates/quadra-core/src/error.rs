//! Error types for the quadra core.

use thiserror::Error;

/// Errors reported by configuration and processing entry points.
///
/// Construction errors (`InvalidBlockSize`, `InvalidOverlap`, `InvalidSteering`)
/// mean nothing can be built from the given values. Layout errors
/// (`ChannelCount`, `ChannelLength`) are returned by `process` and leave the
/// processor untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Block size is zero or not a power of two.
    #[error("block size must be a non-zero power of two, got {0}")]
    InvalidBlockSize(usize),

    /// Overlap outside `1..=block_size`.
    #[error("overlap must be in 1..={block_size}, got {overlap}")]
    InvalidOverlap {
        /// Requested overlap in samples.
        overlap: usize,
        /// Block size the overlap was checked against.
        block_size: usize,
    },

    /// Logic steering parameter outside its documented range.
    #[error("invalid logic steering config: {0}")]
    InvalidSteering(String),

    /// Input buffer has the wrong number of channels.
    #[error("input must have {expected} channels, got {actual}")]
    ChannelCount {
        /// Channel count the processor requires.
        expected: usize,
        /// Channel count of the input buffer.
        actual: usize,
    },

    /// A channel's length differs from channel 0.
    #[error("input channels must have same length: channel {channel} has {actual} samples, expected {expected}")]
    ChannelLength {
        /// Index of the offending channel.
        channel: usize,
        /// Length of channel 0.
        expected: usize,
        /// Length of the offending channel.
        actual: usize,
    },
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_count_display() {
        let err = Error::ChannelCount {
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "input must have 2 channels, got 1");
    }

    #[test]
    fn invalid_block_size_display() {
        let msg = Error::InvalidBlockSize(1000).to_string();
        assert!(msg.contains("power of two"), "got: {msg}");
        assert!(msg.contains("1000"), "got: {msg}");
    }

    #[test]
    fn channel_length_display_names_channel() {
        let err = Error::ChannelLength {
            channel: 3,
            expected: 10,
            actual: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("channel 3"), "got: {msg}");
    }
}
