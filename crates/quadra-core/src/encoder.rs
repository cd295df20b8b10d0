//! SQ encoder: 4-channel LF/RF/LB/RB to 2-channel LT/RT.

use crate::buffer::MultiChannelBuffer;
use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::framer::BlockFramer;
use crate::hilbert::{HilbertTransformer, QuadratureFilter};
use crate::matrix::sq_encode;

/// Folds four quadraphonic channels into a matrix-encoded stereo pair.
///
/// Only the back channels are filtered. The encoder holds no mutable state,
/// so `process` takes `&self`.
#[derive(Debug, Clone)]
pub struct SqEncoder<F: QuadratureFilter = HilbertTransformer> {
    config: FilterConfig,
    framer: BlockFramer,
    filter_lb: F,
    filter_rb: F,
}

impl SqEncoder<HilbertTransformer> {
    /// Encoder with two Hilbert transformers designed for `config`.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            framer: BlockFramer::new(&config),
            filter_lb: HilbertTransformer::new(config),
            filter_rb: HilbertTransformer::new(config),
        }
    }
}

impl Default for SqEncoder<HilbertTransformer> {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl<F: QuadratureFilter> SqEncoder<F> {
    /// Encoder over caller-supplied quadrature filters for LB and RB.
    pub fn with_filters(config: FilterConfig, filter_lb: F, filter_rb: F) -> Result<Self> {
        for filter in [&filter_lb, &filter_rb] {
            if filter.block_size() != config.block_size() {
                return Err(Error::InvalidBlockSize(filter.block_size()));
            }
        }
        Ok(Self {
            config,
            framer: BlockFramer::new(&config),
            filter_lb,
            filter_rb,
        })
    }

    /// Filter geometry.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Input-to-output delay in samples.
    pub fn latency(&self) -> usize {
        self.framer.latency()
    }

    /// One-line summary of the encoder geometry.
    pub fn info(&self) -> String {
        format!(
            "SQ encoder: block size {}, overlap {}, window {}, latency {} samples",
            self.config.block_size(),
            self.config.overlap(),
            self.config.window(),
            self.latency(),
        )
    }

    /// Encode a 4-channel buffer into 2 channels of the same length.
    pub fn process(&self, input: &MultiChannelBuffer) -> Result<MultiChannelBuffer> {
        self.process_with_progress(input, |_, _| {})
    }

    /// [`process`](Self::process), calling `progress(done, total)` after every block.
    pub fn process_with_progress<P>(
        &self,
        input: &MultiChannelBuffer,
        mut progress: P,
    ) -> Result<MultiChannelBuffer>
    where
        P: FnMut(usize, usize),
    {
        input.validate(4)?;
        let [lf, rf, lb, rb] = [0, 1, 2, 3].map(|ch| input.channels[ch].as_slice());
        let num_samples = lf.len();

        let framer = self.framer;
        let total = framer.block_count(num_samples);

        #[cfg(feature = "tracing")]
        tracing::trace!(num_samples, blocks = total, "sq encode");

        let mut output = MultiChannelBuffer::silent(2, num_samples);
        let block_size = framer.block_size();
        let mut blocks = [
            vec![0.0; block_size],
            vec![0.0; block_size],
            vec![0.0; block_size],
            vec![0.0; block_size],
        ];

        for frame in framer.frames(num_samples) {
            for (block, channel) in blocks.iter_mut().zip([lf, rf, lb, rb]) {
                framer.fill_block(channel, &frame, block);
            }

            let h_lb = self.filter_lb.process_block(&blocks[2]);
            let h_rb = self.filter_rb.process_block(&blocks[3]);

            for i in 0..frame.len {
                let d = framer.direct_index(i);
                let q = framer.quadrature_index(i);
                let quad = [blocks[0][d], blocks[1][d], blocks[2][d], blocks[3][d]];
                let [lt, rt] = sq_encode(quad, h_lb[q], h_rb[q]);

                let pos = frame.start + i;
                output.channels[0][pos] = lt;
                output.channels[1][pos] = rt;
            }

            progress(frame.index + 1, total);
        }

        Ok(output)
    }
}
