//! Filter geometry and calibration constants.

use crate::error::{Error, Result};
use crate::window::WindowType;

/// Default FFT block size (must be a power of two).
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Default overlap: half of the default block size.
pub const DEFAULT_OVERLAP: usize = 512;

/// Sample rate assumed for steering time constants until one is configured.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Calibration gain applied to the windowed Hilbert kernel footprint.
///
/// Sets the level of the decoded back channels relative to the fronts.
pub const HILBERT_GAIN: f64 = 1.8;

/// Immutable filter geometry shared by the Hilbert transformer and the block framer.
///
/// The only way to obtain one is [`FilterConfig::new`] (or `Default`), so every
/// value in circulation satisfies:
///
/// - `block_size` is a non-zero power of two
/// - `0 < overlap <= block_size`
///
/// Overlaps that are not a multiple of four are accepted; the derived framer
/// offsets use truncating division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    block_size: usize,
    overlap: usize,
    window: WindowType,
}

impl FilterConfig {
    /// Validate and build a filter configuration.
    pub fn new(block_size: usize, overlap: usize, window: WindowType) -> Result<Self> {
        if block_size == 0 || !block_size.is_power_of_two() {
            return Err(Error::InvalidBlockSize(block_size));
        }
        if overlap == 0 || overlap > block_size {
            return Err(Error::InvalidOverlap {
                overlap,
                block_size,
            });
        }

        #[cfg(feature = "tracing")]
        if overlap % 4 != 0 {
            tracing::warn!(
                overlap,
                "overlap is not a multiple of 4; framer offsets are truncated"
            );
        }

        Ok(Self {
            block_size,
            overlap,
            window,
        })
    }

    /// Same geometry with a different window.
    pub fn with_window(mut self, window: WindowType) -> Self {
        self.window = window;
        self
    }

    /// FFT block size in samples.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Hop length and kernel footprint in samples.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Window applied to the kernel footprint.
    pub fn window(&self) -> WindowType {
        self.window
    }

    /// Offset of the direct window inside each block (`overlap / 4`).
    pub fn input_offset(&self) -> usize {
        self.overlap / 4
    }

    /// Offset of the quadrature window inside each filtered block (`overlap / 2`).
    pub fn output_offset(&self) -> usize {
        self.overlap / 2
    }

    /// Group delay from input to output in samples (`overlap + overlap / 2`).
    pub fn latency(&self) -> usize {
        self.overlap + self.overlap / 2
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            overlap: DEFAULT_OVERLAP,
            window: WindowType::Hann,
        }
    }
}
