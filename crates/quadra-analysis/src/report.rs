//! Encode → decode separation report for a 4-channel reference signal.

use crate::separation::{
    SeparationOptions, SeparationResult, channel_pair_separation, channel_separation,
};
use quadra_core::{
    FilterConfig, LogicSteeringConfig, MultiChannelBuffer, QuadChannel, Result, SqDecoder,
    SqEncoder,
};

/// Where the pair separations come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PairMode {
    /// From each channel's isolated run.
    #[default]
    Isolated,
    /// From one run of the full four-channel mix.
    Full,
}

/// Separation of a channel against its row partner (LF→RF, RF→LF, LB→RB, RB→LB).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairSeparation {
    /// Channel whose content is measured.
    pub target: QuadChannel,
    /// Channel it leaks into.
    pub leak: QuadChannel,
    /// Levels and separation.
    pub result: SeparationResult,
}

/// Full result of [`SeparationAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeparationReport {
    /// Per-channel separation against the other three, from isolated runs.
    pub channels: [SeparationResult; 4],
    /// Row-partner separations.
    pub pairs: [PairSeparation; 4],
    /// Pair mode used.
    pub pair_mode: PairMode,
    /// Whether the decoder applied logic steering.
    pub logic_steering: bool,
}

/// Measures how well each channel survives an SQ encode → decode round trip.
///
/// Every run uses a fresh encoder and decoder, so steering state never leaks
/// between channels.
#[derive(Debug, Clone)]
pub struct SeparationAnalyzer {
    filter: FilterConfig,
    steering: LogicSteeringConfig,
    sample_rate: u32,
    options: SeparationOptions,
    pair_mode: PairMode,
}

impl SeparationAnalyzer {
    /// Analyzer for `filter` geometry at `sample_rate`, steering off, full band.
    pub fn new(filter: FilterConfig, sample_rate: u32) -> Self {
        Self {
            filter,
            steering: LogicSteeringConfig::default(),
            sample_rate,
            options: SeparationOptions::default(),
            pair_mode: PairMode::Isolated,
        }
    }

    /// Decoder steering parameters.
    pub fn with_steering(mut self, steering: LogicSteeringConfig) -> Self {
        self.steering = steering;
        self
    }

    /// Leak mode and band. The sample rate in `options` is overridden by the analyzer's.
    pub fn with_options(mut self, options: SeparationOptions) -> Self {
        self.options = options;
        self
    }

    /// Pair separation source.
    pub fn with_pair_mode(mut self, pair_mode: PairMode) -> Self {
        self.pair_mode = pair_mode;
        self
    }

    fn measure_options(&self) -> SeparationOptions {
        SeparationOptions {
            sample_rate: self.sample_rate,
            ..self.options
        }
    }

    /// Encode then decode `input` with fresh instances.
    pub fn round_trip(&self, input: &MultiChannelBuffer) -> Result<MultiChannelBuffer> {
        let encoder = SqEncoder::new(self.filter);
        let mut decoder = SqDecoder::new(self.filter);
        decoder.set_sample_rate(self.sample_rate);
        decoder.set_logic_steering(self.steering)?;

        let encoded = encoder.process(input)?;
        decoder.process(&encoded)
    }

    /// Run the analysis on a 4-channel reference buffer.
    pub fn analyze(&self, reference: &MultiChannelBuffer) -> Result<SeparationReport> {
        reference.validate(4)?;
        let options = self.measure_options();
        let len = reference.len();

        let mut channels = [SeparationResult::default(); 4];
        let mut isolated_pairs = [SeparationResult::default(); 4];

        for ch in QuadChannel::ALL {
            let mut isolated = MultiChannelBuffer::silent(4, len);
            isolated.channels[ch.index()].copy_from_slice(&reference.channels[ch.index()]);

            let decoded = self.round_trip(&isolated)?;
            channels[ch.index()] = channel_separation(&decoded.channels, ch.index(), &options);
            isolated_pairs[ch.index()] = channel_pair_separation(
                &decoded.channels,
                ch.index(),
                ch.partner().index(),
                &options,
            );
        }

        let pair_results = match self.pair_mode {
            PairMode::Isolated => isolated_pairs,
            PairMode::Full => {
                let decoded = self.round_trip(reference)?;
                QuadChannel::ALL.map(|ch| {
                    channel_pair_separation(
                        &decoded.channels,
                        ch.index(),
                        ch.partner().index(),
                        &options,
                    )
                })
            }
        };

        let pairs = QuadChannel::ALL.map(|ch| PairSeparation {
            target: ch,
            leak: ch.partner(),
            result: pair_results[ch.index()],
        });

        Ok(SeparationReport {
            channels,
            pairs,
            pair_mode: self.pair_mode,
            logic_steering: self.steering.enabled,
        })
    }
}
