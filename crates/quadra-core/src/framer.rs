//! Hop-synchronous block framing shared by the encoder and decoder.
//!
//! A signal of `n` samples is cut into blocks of `block_size` samples that
//! start every `overlap` samples (block `b` starts at `b * overlap`) and are
//! zero-padded past the end of the signal. From each block two aligned
//! windows of length `overlap` are read:
//!
//! ```text
//! block (unfiltered) :  |--input_offset--|=========== direct ===========|
//! block (filtered)   :  |-----output_offset-----|======== quadrature =========|
//! output             :  [b*overlap .................. b*overlap + overlap)
//! ```
//!
//! Each hop writes exactly `overlap` output samples, so hops tile the output
//! with no summation or cross-fade between them.

use crate::config::FilterConfig;

/// One hop of the framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Hop index `b`.
    pub index: usize,
    /// First input sample of the block and first output sample written (`b * overlap`).
    pub start: usize,
    /// Number of aligned samples this hop contributes to the output.
    pub len: usize,
}

/// Framing geometry derived from a [`FilterConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFramer {
    block_size: usize,
    overlap: usize,
    input_offset: usize,
    output_offset: usize,
}

impl BlockFramer {
    /// Derive the framing for `config`.
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            block_size: config.block_size(),
            overlap: config.overlap(),
            input_offset: config.input_offset(),
            output_offset: config.output_offset(),
        }
    }

    /// Block length.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Hop length; also the number of output samples per hop.
    pub fn hop(&self) -> usize {
        self.overlap
    }

    /// Start of the direct window inside an unfiltered block.
    pub fn input_offset(&self) -> usize {
        self.input_offset
    }

    /// Start of the quadrature window inside a filtered block.
    pub fn output_offset(&self) -> usize {
        self.output_offset
    }

    /// Group delay from input to output in samples.
    pub fn latency(&self) -> usize {
        self.overlap + self.overlap / 2
    }

    /// Number of hops needed to cover `num_samples`.
    pub fn block_count(&self, num_samples: usize) -> usize {
        num_samples.div_ceil(self.overlap)
    }

    /// Index into the unfiltered block for aligned position `i`.
    #[inline]
    pub fn direct_index(&self, i: usize) -> usize {
        self.input_offset + i
    }

    /// Index into the filtered block for aligned position `i`.
    #[inline]
    pub fn quadrature_index(&self, i: usize) -> usize {
        self.output_offset + i
    }

    /// Iterate the hops covering a signal of `num_samples`.
    ///
    /// A hop's `len` is `overlap`, truncated at the end of the signal and at the
    /// end of the block (when `output_offset + overlap > block_size`, the tail of
    /// each hop is left for the caller's zero-initialized output).
    pub fn frames(&self, num_samples: usize) -> impl Iterator<Item = Frame> + '_ {
        let max_aligned = self.block_size.saturating_sub(self.output_offset);
        (0..self.block_count(num_samples)).map(move |index| {
            let start = index * self.overlap;
            let len = self
                .overlap
                .min(num_samples - start)
                .min(max_aligned);
            Frame { index, start, len }
        })
    }

    /// Copy the block for `frame` out of `channel`, zero-padding past its end.
    ///
    /// `block` must be `block_size` long.
    pub fn fill_block(&self, channel: &[f64], frame: &Frame, block: &mut [f64]) {
        debug_assert_eq!(block.len(), self.block_size);
        let available = channel.len().saturating_sub(frame.start).min(self.block_size);
        if available > 0 {
            block[..available].copy_from_slice(&channel[frame.start..frame.start + available]);
        }
        block[available..].fill(0.0);
    }
}
