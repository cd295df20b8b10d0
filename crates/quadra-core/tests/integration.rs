//! Integration tests for quadra-core encode/decode paths.
//!
//! Checks the framing offsets end to end (front passthrough on decode and
//! encode), silence handling, input validation, and the effect of logic
//! steering on a decoded signal.

use quadra_core::{
    Error, FilterConfig, LogicSteeringConfig, MultiChannelBuffer, QuadratureFilter, SQ_COEFF,
    SqDecoder, SqEncoder, WindowType,
};
use std::f64::consts::PI;

/// A quadrature filter that outputs silence, isolating the direct path.
struct SilentFilter(usize);

impl QuadratureFilter for SilentFilter {
    fn block_size(&self) -> usize {
        self.0
    }

    fn process_block(&self, block: &[f64]) -> Vec<f64> {
        assert_eq!(block.len(), self.0, "input size must match block size");
        vec![0.0; self.0]
    }
}

fn periodic(len: usize, period: f64, amp: f64, phase: f64) -> Vec<f64> {
    (0..len)
        .map(|n| amp * (2.0 * PI * n as f64 / period + phase).sin())
        .collect()
}

/// Fraction of the summed absolute output carried by `channel`, skipping `skip` samples.
fn channel_share(buffer: &MultiChannelBuffer, channel: usize, skip: usize) -> f64 {
    let sum_abs = |ch: &[f64]| ch[skip..].iter().map(|x| x.abs()).sum::<f64>();
    let total: f64 = buffer.channels.iter().map(|ch| sum_abs(ch)).sum();
    sum_abs(&buffer.channels[channel]) / total
}

// ============================================================================
// 1. Silence
// ============================================================================

#[test]
fn decode_silence_is_silent() {
    for (block_size, overlap) in [(1024, 512), (256, 64), (64, 64), (128, 30)] {
        let config = FilterConfig::new(block_size, overlap, WindowType::Hann).unwrap();
        let mut decoder = SqDecoder::new(config);
        let output = decoder
            .process(&MultiChannelBuffer::silent(2, 4 * overlap))
            .unwrap();

        assert_eq!(output.channel_count(), 4);
        assert_eq!(output.len(), 4 * overlap);
        for ch in &output.channels {
            assert!(ch.iter().all(|x| x.abs() < 1e-12));
        }
    }
}

#[test]
fn encode_silence_is_silent() {
    let encoder = SqEncoder::new(FilterConfig::default());
    let output = encoder.process(&MultiChannelBuffer::silent(4, 2048)).unwrap();
    assert!(output.channels.iter().flatten().all(|x| x.abs() < 1e-12));
}

// ============================================================================
// 2. Framing alignment
// ============================================================================

#[test]
fn decode_front_channels_pass_through_at_input_offset() {
    let config = FilterConfig::default();
    let overlap = config.overlap();
    let offset = overlap / 4;
    let n = 10 * overlap;

    let lt = periodic(n, 97.0, 0.8, 0.0);
    let rt = periodic(n, 131.0, 0.6, PI / 2.0);
    let mut decoder = SqDecoder::new(config);
    let output = decoder
        .process(&MultiChannelBuffer::new(vec![lt.clone(), rt.clone()]))
        .unwrap();

    for i in 0..n - offset {
        assert_eq!(output.channels[0][i], lt[i + offset], "LF at {i}");
        assert_eq!(output.channels[1][i], rt[i + offset], "RF at {i}");
    }
}

#[test]
fn encode_front_channels_pass_through_at_input_offset() {
    let config = FilterConfig::new(512, 256, WindowType::Blackman).unwrap();
    let offset = config.input_offset();
    let n = 10 * config.overlap();

    let lf = periodic(n, 97.0, 0.5, 0.3);
    let rf = periodic(n, 131.0, 0.7, 1.1);
    let input = MultiChannelBuffer::new(vec![lf.clone(), rf.clone(), vec![0.0; n], vec![0.0; n]]);
    let output = SqEncoder::new(config).process(&input).unwrap();

    for i in 0..n - offset {
        assert_eq!(output.channels[0][i], lf[i + offset], "LT at {i}");
        assert_eq!(output.channels[1][i], rf[i + offset], "RT at {i}");
    }
}

#[test]
fn silent_filter_exposes_direct_matrix_terms() {
    let config = FilterConfig::new(256, 128, WindowType::Hann).unwrap();
    let offset = config.input_offset();
    let n = 1000;
    let lt = periodic(n, 50.0, 0.9, 0.0);
    let rt = periodic(n, 70.0, 0.4, 0.2);

    let mut decoder =
        SqDecoder::with_filters(config, SilentFilter(256), SilentFilter(256)).unwrap();
    let output = decoder
        .process(&MultiChannelBuffer::new(vec![lt.clone(), rt.clone()]))
        .unwrap();

    for i in 0..n - offset {
        assert!((output.channels[2][i] + SQ_COEFF * rt[i + offset]).abs() < 1e-15);
        assert!((output.channels[3][i] - SQ_COEFF * lt[i + offset]).abs() < 1e-15);
    }
}

#[test]
fn encode_then_decode_keeps_length_and_finiteness() {
    let n = 5000;
    let quad = MultiChannelBuffer::new(vec![
        periodic(n, 441.0, 0.5, 0.0),
        periodic(n, 220.5, 0.5, 0.0),
        periodic(n, 110.25, 0.5, 0.0),
        periodic(n, 55.125, 0.5, 0.0),
    ]);

    let stereo = SqEncoder::new(FilterConfig::default()).process(&quad).unwrap();
    let decoded = SqDecoder::new(FilterConfig::default()).process(&stereo).unwrap();
    assert_eq!(decoded.len(), n);
    assert!(decoded.channels.iter().flatten().all(|x| x.is_finite()));
}

// ============================================================================
// 3. Validation
// ============================================================================

#[test]
fn decode_rejects_single_channel() {
    let mut decoder = SqDecoder::new(FilterConfig::default());
    let err = decoder
        .process(&MultiChannelBuffer::new(vec![vec![0.1; 64]]))
        .unwrap_err();
    assert!(matches!(err, Error::ChannelCount { expected: 2, actual: 1 }));
}

#[test]
fn decode_rejects_mismatched_lengths() {
    let mut decoder = SqDecoder::new(FilterConfig::default());
    let err = decoder
        .process(&MultiChannelBuffer::new(vec![vec![0.1; 64], vec![0.1; 63]]))
        .unwrap_err();
    assert!(matches!(err, Error::ChannelLength { channel: 1, .. }));
    assert_eq!(decoder.logic_steering().envelopes(), [0.0; 4]);
}

// ============================================================================
// 4. Logic steering
// ============================================================================

fn rear_heavy_input(overlap: usize) -> MultiChannelBuffer {
    let n = 20 * overlap;
    MultiChannelBuffer::new(vec![
        periodic(n, 64.0, 0.5, PI / 2.0),
        periodic(n, 64.0, 0.5, 0.0),
    ])
}

#[test]
fn disabled_steering_matches_plain_decode() {
    let input = rear_heavy_input(512);

    let plain = SqDecoder::new(FilterConfig::default()).process(&input).unwrap();

    let mut configured = SqDecoder::new(FilterConfig::default());
    configured
        .set_logic_steering(LogicSteeringConfig::default().with_gains(3.0, 0.1))
        .unwrap();
    configured.set_sample_rate(48000);
    let output = configured.process(&input).unwrap();

    assert_eq!(plain, output);
}

#[test]
fn steering_increases_dominant_share() {
    let overlap = 512;
    let input = rear_heavy_input(overlap);
    let skip = 2 * overlap;

    let plain = SqDecoder::new(FilterConfig::default()).process(&input).unwrap();

    let mut steered_decoder = SqDecoder::new(FilterConfig::default());
    steered_decoder.enable_logic_steering(true);
    let steered = steered_decoder.process(&input).unwrap();

    let plain_share = channel_share(&plain, 3, skip);
    let steered_share = channel_share(&steered, 3, skip);
    assert!(
        steered_share > plain_share * 1.05,
        "RB share {plain_share:.4} -> {steered_share:.4}"
    );
    assert!(steered.channels.iter().flatten().all(|x| x.is_finite()));
}

#[test]
fn steering_state_persists_across_calls() {
    let input = rear_heavy_input(512);
    let mut decoder = SqDecoder::new(FilterConfig::default());
    decoder.enable_logic_steering(true);

    decoder.process(&input).unwrap();
    let warmed = decoder.logic_steering().envelopes();
    assert!(warmed.iter().any(|&e| e > 0.0));

    decoder.set_sample_rate(96000);
    assert_eq!(decoder.logic_steering().envelopes(), warmed);
}
