//! SQ decoder: 2-channel LT/RT to 4-channel LF/RF/LB/RB.

use crate::buffer::MultiChannelBuffer;
use crate::config::{DEFAULT_SAMPLE_RATE, FilterConfig};
use crate::error::{Error, Result};
use crate::framer::BlockFramer;
use crate::hilbert::{HilbertTransformer, QuadratureFilter};
use crate::matrix::sq_decode;
use crate::steering::{LogicSteering, LogicSteeringConfig};

/// Decodes a matrix-encoded stereo pair into four quadraphonic channels.
///
/// Each input channel gets its own quadrature filter. The filters are
/// immutable; the only mutable state is the [`LogicSteering`] controller,
/// which carries its envelopes across blocks and across `process` calls.
/// Use one decoder per audio stream.
///
/// # Example
///
/// ```rust
/// use quadra_core::{FilterConfig, MultiChannelBuffer, SqDecoder};
///
/// let mut decoder = SqDecoder::new(FilterConfig::default());
/// let input = MultiChannelBuffer::silent(2, 4096);
/// let output = decoder.process(&input).unwrap();
/// assert_eq!(output.channel_count(), 4);
/// assert_eq!(output.len(), 4096);
/// ```
#[derive(Debug, Clone)]
pub struct SqDecoder<F: QuadratureFilter = HilbertTransformer> {
    config: FilterConfig,
    framer: BlockFramer,
    filter_lt: F,
    filter_rt: F,
    steering: LogicSteering,
}

impl SqDecoder<HilbertTransformer> {
    /// Decoder with two Hilbert transformers designed for `config`.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            framer: BlockFramer::new(&config),
            filter_lt: HilbertTransformer::new(config),
            filter_rt: HilbertTransformer::new(config),
            steering: LogicSteering::new(LogicSteeringConfig::default(), DEFAULT_SAMPLE_RATE),
        }
    }
}

impl Default for SqDecoder<HilbertTransformer> {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl<F: QuadratureFilter> SqDecoder<F> {
    /// Decoder over caller-supplied quadrature filters for LT and RT.
    ///
    /// Both filters must report `config.block_size()`.
    pub fn with_filters(config: FilterConfig, filter_lt: F, filter_rt: F) -> Result<Self> {
        for filter in [&filter_lt, &filter_rt] {
            if filter.block_size() != config.block_size() {
                return Err(Error::InvalidBlockSize(filter.block_size()));
            }
        }
        Ok(Self {
            config,
            framer: BlockFramer::new(&config),
            filter_lt,
            filter_rt,
            steering: LogicSteering::new(LogicSteeringConfig::default(), DEFAULT_SAMPLE_RATE),
        })
    }

    /// Filter geometry.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Input-to-output delay in samples (`overlap + overlap / 2`).
    pub fn latency(&self) -> usize {
        self.framer.latency()
    }

    /// Sample rate used for steering time constants.
    pub fn sample_rate(&self) -> u32 {
        self.steering.sample_rate()
    }

    /// Set the sample rate. Steering coefficients are recomputed; envelopes are kept.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.steering.set_sample_rate(sample_rate);
    }

    /// Replace the steering parameters after validating them.
    ///
    /// On error the current parameters stay in place.
    pub fn set_logic_steering(&mut self, config: LogicSteeringConfig) -> Result<()> {
        config.validate()?;
        self.steering.set_config(config);
        Ok(())
    }

    /// Switch steering on or off without touching the other parameters.
    pub fn enable_logic_steering(&mut self, enabled: bool) {
        self.steering.set_enabled(enabled);
    }

    /// The steering controller.
    pub fn logic_steering(&self) -> &LogicSteering {
        &self.steering
    }

    /// One-line summary of the decoder geometry.
    pub fn info(&self) -> String {
        let latency = self.latency();
        let rate = self.sample_rate();
        let latency_ms = if rate == 0 {
            0.0
        } else {
            latency as f64 * 1000.0 / f64::from(rate)
        };
        format!(
            "SQ decoder: block size {}, overlap {}, window {}, latency {} samples ({:.2} ms @ {} Hz), logic steering {}",
            self.config.block_size(),
            self.config.overlap(),
            self.config.window(),
            latency,
            latency_ms,
            rate,
            if self.steering.is_enabled() { "on" } else { "off" },
        )
    }

    /// Decode a 2-channel buffer into 4 channels of the same length.
    pub fn process(&mut self, input: &MultiChannelBuffer) -> Result<MultiChannelBuffer> {
        self.process_with_progress(input, |_, _| {})
    }

    /// [`process`](Self::process), calling `progress(done, total)` after every block.
    pub fn process_with_progress<P>(
        &mut self,
        input: &MultiChannelBuffer,
        mut progress: P,
    ) -> Result<MultiChannelBuffer>
    where
        P: FnMut(usize, usize),
    {
        input.validate(2)?;
        let lt = &input.channels[0];
        let rt = &input.channels[1];
        let num_samples = lt.len();

        let framer = self.framer;
        let total = framer.block_count(num_samples);

        #[cfg(feature = "tracing")]
        tracing::trace!(num_samples, blocks = total, "sq decode");

        let mut output = MultiChannelBuffer::silent(4, num_samples);
        let mut block_lt = vec![0.0; framer.block_size()];
        let mut block_rt = vec![0.0; framer.block_size()];

        for frame in framer.frames(num_samples) {
            framer.fill_block(lt, &frame, &mut block_lt);
            framer.fill_block(rt, &frame, &mut block_rt);

            let h_lt = self.filter_lt.process_block(&block_lt);
            let h_rt = self.filter_rt.process_block(&block_rt);

            for i in 0..frame.len {
                let d = framer.direct_index(i);
                let q = framer.quadrature_index(i);
                let quad = sq_decode(block_lt[d], block_rt[d], h_lt[q], h_rt[q]);
                let quad = self.steering.process(quad);

                let pos = frame.start + i;
                for (channel, sample) in output.channels.iter_mut().zip(quad) {
                    channel[pos] = sample;
                }
            }

            progress(frame.index + 1, total);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowType;

    #[test]
    fn latency_and_defaults() {
        let decoder = SqDecoder::new(FilterConfig::default());
        assert_eq!(decoder.latency(), 768);
        assert_eq!(decoder.sample_rate(), 44100);
        assert!(!decoder.logic_steering().is_enabled());
    }

    #[test]
    fn info_mentions_geometry() {
        let decoder = SqDecoder::new(FilterConfig::default());
        let info = decoder.info();
        assert!(info.contains("block size 1024"), "{info}");
        assert!(info.contains("overlap 512"), "{info}");
        assert!(info.contains("768 samples"), "{info}");
        assert!(info.contains("17.41 ms"), "{info}");
    }

    #[test]
    fn invalid_steering_is_rejected_and_kept() {
        let mut decoder = SqDecoder::new(FilterConfig::default());
        let bad = LogicSteeringConfig::enabled().with_threshold(1.5);
        assert!(matches!(
            decoder.set_logic_steering(bad),
            Err(Error::InvalidSteering(_))
        ));
        assert_eq!(
            *decoder.logic_steering().config(),
            LogicSteeringConfig::default()
        );
    }

    #[test]
    fn enable_toggles_only_flag() {
        let mut decoder = SqDecoder::new(FilterConfig::default());
        let custom = LogicSteeringConfig::default().with_gains(2.0, 0.5);
        decoder.set_logic_steering(custom).unwrap();
        decoder.enable_logic_steering(true);
        let config = decoder.logic_steering().config();
        assert!(config.enabled);
        assert_eq!(config.max_boost, 2.0);
    }

    #[test]
    fn rejects_wrong_channel_count() {
        let mut decoder = SqDecoder::new(FilterConfig::default());
        let err = decoder
            .process(&MultiChannelBuffer::silent(1, 100))
            .unwrap_err();
        assert_eq!(
            err,
            Error::ChannelCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn progress_reports_every_block() {
        let config = FilterConfig::new(64, 32, WindowType::Hann).unwrap();
        let mut decoder = SqDecoder::new(config);
        let mut calls = Vec::new();
        decoder
            .process_with_progress(&MultiChannelBuffer::silent(2, 100), |done, total| {
                calls.push((done, total));
            })
            .unwrap();
        assert_eq!(calls, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn filter_block_size_must_match() {
        let config = FilterConfig::new(64, 32, WindowType::Hann).unwrap();
        let other = HilbertTransformer::new(FilterConfig::new(128, 32, WindowType::Hann).unwrap());
        let matching = HilbertTransformer::new(config);
        assert_eq!(
            SqDecoder::with_filters(config, matching, other).unwrap_err(),
            Error::InvalidBlockSize(128)
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let mut decoder = SqDecoder::new(FilterConfig::default());
        let output = decoder.process(&MultiChannelBuffer::silent(2, 0)).unwrap();
        assert_eq!(output.channel_count(), 4);
        assert!(output.is_empty());
    }
}
