//! Channel-major multi-channel audio buffer.
//!
//! [`MultiChannelBuffer`] is the interchange type between the encoder, the
//! decoder, WAV I/O, and the separation analyzer. Channels are expected to be
//! of equal length; [`MultiChannelBuffer::validate`] checks that and the
//! channel count before any processing starts.

use crate::error::{Error, Result};

/// An ordered list of equal-length `f64` channels.
///
/// # Example
///
/// ```rust
/// use quadra_core::MultiChannelBuffer;
///
/// let buffer = MultiChannelBuffer::from_interleaved(&[1.0, 2.0, 3.0, 4.0], 2);
/// assert_eq!(buffer.channel(0), Some(&[1.0, 3.0][..]));
/// assert_eq!(buffer.to_interleaved(), vec![1.0, 2.0, 3.0, 4.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiChannelBuffer {
    /// Channel data, one `Vec` per channel.
    pub channels: Vec<Vec<f64>>,
}

impl MultiChannelBuffer {
    /// Wrap existing channel data.
    pub fn new(channels: Vec<Vec<f64>>) -> Self {
        Self { channels }
    }

    /// `channels` channels of `len` zeros.
    pub fn silent(channels: usize, len: usize) -> Self {
        Self {
            channels: vec![vec![0.0; len]; channels],
        }
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel (length of channel 0; 0 with no channels).
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow one channel.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Check the channel count and that every channel matches channel 0 in length.
    pub fn validate(&self, expected_channels: usize) -> Result<()> {
        if self.channels.len() != expected_channels {
            return Err(Error::ChannelCount {
                expected: expected_channels,
                actual: self.channels.len(),
            });
        }
        let expected = self.len();
        for (channel, data) in self.channels.iter().enumerate().skip(1) {
            if data.len() != expected {
                return Err(Error::ChannelLength {
                    channel,
                    expected,
                    actual: data.len(),
                });
            }
        }
        Ok(())
    }

    /// De-interleave frame-major samples into `channels` channels.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f64], channels: usize) -> Self {
        if channels == 0 {
            return Self::default();
        }
        let frames = samples.len() / channels;
        let mut out: Vec<Vec<f64>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
        for frame in samples.chunks_exact(channels) {
            for (ch, &sample) in out.iter_mut().zip(frame) {
                ch.push(sample);
            }
        }
        Self { channels: out }
    }

    /// Interleave into frame-major order.
    pub fn to_interleaved(&self) -> Vec<f64> {
        let len = self.len();
        let mut out = Vec::with_capacity(len * self.channels.len());
        for i in 0..len {
            for ch in &self.channels {
                out.push(ch.get(i).copied().unwrap_or(0.0));
            }
        }
        out
    }

    /// Take ownership of the channel data.
    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }
}

impl From<Vec<Vec<f64>>> for MultiChannelBuffer {
    fn from(channels: Vec<Vec<f64>>) -> Self {
        Self::new(channels)
    }
}
