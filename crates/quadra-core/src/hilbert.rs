//! FFT-based Hilbert transformer producing a quadrature (90° shifted) signal.
//!
//! # Filter Design
//!
//! The kernel is an odd-symmetric discrete Hilbert impulse response laid out
//! in a `block_size` buffer and centered at `overlap / 2`:
//!
//! 1. `h[c + i] = 2 / (π·i)` and `h[c - i] = -h[c + i]` for odd `i < c`;
//!    even offsets stay zero
//! 2. The first `overlap` taps are multiplied by the configured window
//! 3. The same footprint is scaled by [`HILBERT_GAIN`]
//! 4. One forward FFT of the zero-padded kernel gives the transfer function
//!
//! # Block Processing
//!
//! [`QuadratureFilter::process_block`] multiplies the block's spectrum by the
//! transfer function and returns the real part of the inverse FFT scaled by
//! `1 / block_size`. This is a circular convolution; the phase shift is close
//! to 90° away from DC and Nyquist, exact only bin-wise in the frequency domain.
//!
//! # Example
//!
//! ```rust
//! use quadra_core::{FilterConfig, HilbertTransformer, QuadratureFilter};
//!
//! let hilbert = HilbertTransformer::new(FilterConfig::default());
//! let block = vec![0.0; hilbert.block_size()];
//! let quadrature = hilbert.process_block(&block);
//! assert!(quadrature.iter().all(|&x| x == 0.0));
//! ```

use crate::config::{FilterConfig, HILBERT_GAIN};
use crate::fft::Fft;
use crate::window::WindowType;
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// A filter applied to fixed-size blocks that yields an approximate quadrature signal.
///
/// Implementations hold only read-only state; `process_block` takes `&self`
/// and uses call-local scratch, so one instance may be shared across threads.
pub trait QuadratureFilter {
    /// Required input length for [`process_block`](Self::process_block).
    fn block_size(&self) -> usize;

    /// Filter one block.
    ///
    /// # Panics
    ///
    /// Panics if `block.len() != self.block_size()`.
    fn process_block(&self, block: &[f64]) -> Vec<f64>;
}

/// Windowed FIR Hilbert transformer applied by FFT multiplication.
///
/// Everything is computed once at construction; the instance is immutable afterwards.
#[derive(Debug, Clone)]
pub struct HilbertTransformer {
    config: FilterConfig,
    window: Vec<f64>,
    impulse: Vec<f64>,
    transfer: Vec<Complex<f64>>,
    fft: Fft,
}

impl HilbertTransformer {
    /// Design the kernel for `config` and precompute its transfer function.
    pub fn new(config: FilterConfig) -> Self {
        let block_size = config.block_size();
        let fft = Fft::new(block_size);
        let window = config.window().coefficients(config.overlap());
        let impulse = design_impulse(block_size, config.overlap(), &window);
        let transfer = fft.forward_real(&impulse);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            block_size,
            overlap = config.overlap(),
            window = %config.window(),
            "hilbert transformer designed"
        );

        Self {
            config,
            window,
            impulse,
            transfer,
            fft,
        }
    }

    /// Geometry this transformer was designed for.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Kernel footprint length.
    pub fn overlap(&self) -> usize {
        self.config.overlap()
    }

    /// Window used on the kernel footprint.
    pub fn window(&self) -> WindowType {
        self.config.window()
    }

    /// Window coefficients (length `overlap`).
    pub fn window_coefficients(&self) -> &[f64] {
        &self.window
    }

    /// Windowed, scaled, zero-padded impulse response (length `block_size`).
    pub fn impulse_response(&self) -> &[f64] {
        &self.impulse
    }

    /// Frequency-domain transfer function (length `block_size`).
    pub fn transfer_function(&self) -> &[Complex<f64>] {
        &self.transfer
    }
}

impl QuadratureFilter for HilbertTransformer {
    fn block_size(&self) -> usize {
        self.config.block_size()
    }

    fn process_block(&self, block: &[f64]) -> Vec<f64> {
        let n = self.config.block_size();
        assert_eq!(
            block.len(),
            n,
            "input size must match block size"
        );

        let mut spectrum: Vec<Complex<f64>> =
            block.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.fft.forward(&mut spectrum);

        for (bin, h) in spectrum.iter_mut().zip(&self.transfer) {
            *bin *= *h;
        }

        self.fft.inverse(&mut spectrum);

        let scale = 1.0 / n as f64;
        spectrum.iter().map(|c| c.re * scale).collect()
    }
}

/// Odd-symmetric Hilbert kernel, windowed and scaled over `[0, overlap)`.
fn design_impulse(block_size: usize, overlap: usize, window: &[f64]) -> Vec<f64> {
    let mut impulse = vec![0.0; block_size];
    let center = overlap / 2;

    for i in (1..center).step_by(2) {
        let tap = 2.0 / (PI * i as f64);
        impulse[center + i] = tap;
        impulse[center - i] = -tap;
    }

    for (tap, w) in impulse[..overlap].iter_mut().zip(window) {
        *tap *= w;
    }
    for tap in &mut impulse[..overlap] {
        *tap *= HILBERT_GAIN;
    }

    impulse
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized_dot(a: &[f64], b: &[f64]) -> f64 {
        let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let na: f64 = a.iter().map(|x| x * x).sum();
        let nb: f64 = b.iter().map(|x| x * x).sum();
        if na == 0.0 || nb == 0.0 {
            return 0.0;
        }
        dot / (na * nb).sqrt()
    }

    #[test]
    fn impulse_is_odd_symmetric_about_center() {
        let config = FilterConfig::new(256, 128, WindowType::Rectangular).unwrap();
        let hilbert = HilbertTransformer::new(config);
        let h = hilbert.impulse_response();
        let center = 64;

        assert_eq!(h[center], 0.0);
        for i in 1..center {
            assert!((h[center + i] + h[center - i]).abs() < 1e-15, "tap {i}");
            if i % 2 == 0 {
                assert_eq!(h[center + i], 0.0, "even tap {i} must be zero");
            }
        }
        assert!((h[center + 1] - HILBERT_GAIN * 2.0 / PI).abs() < 1e-15);
    }

    #[test]
    fn taps_outside_footprint_are_zero() {
        let hilbert = HilbertTransformer::new(FilterConfig::default());
        let h = hilbert.impulse_response();
        assert_eq!(h.len(), 1024);
        assert!(h[512..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn window_shapes_kernel() {
        let config = FilterConfig::new(64, 32, WindowType::Hann).unwrap();
        let hann = HilbertTransformer::new(config);
        let rect = HilbertTransformer::new(config.with_window(WindowType::Rectangular));

        for i in 0..32 {
            let expected = rect.impulse_response()[i] * hann.window_coefficients()[i];
            assert!((hann.impulse_response()[i] - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn transfer_function_matches_block_size() {
        let hilbert = HilbertTransformer::new(FilterConfig::default());
        assert_eq!(hilbert.transfer_function().len(), 1024);
        assert_eq!(hilbert.window_coefficients().len(), 512);
    }

    #[test]
    fn zero_block_gives_zero_output() {
        let hilbert = HilbertTransformer::new(FilterConfig::default());
        let out = hilbert.process_block(&[0.0; 1024]);
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    #[should_panic(expected = "input size must match block size")]
    fn wrong_block_length_panics() {
        let hilbert = HilbertTransformer::new(FilterConfig::default());
        let _ = hilbert.process_block(&[0.0; 1023]);
    }

    #[test]
    fn sine_becomes_approximately_quadrature() {
        const K: f64 = 37.0;
        let config = FilterConfig::default();
        let hilbert = HilbertTransformer::new(config);
        let n = config.block_size();

        let phase: Vec<f64> = (0..n)
            .map(|i| 2.0 * PI * K * i as f64 / n as f64)
            .collect();
        let input: Vec<f64> = phase.iter().map(|p| p.sin()).collect();
        let ref_cos: Vec<f64> = phase.iter().map(|p| p.cos()).collect();

        let out = hilbert.process_block(&input);
        assert_eq!(out.len(), n);
        assert!(out.iter().all(|x| x.is_finite()));

        let (input_offset, output_offset, len) =
            (config.input_offset(), config.output_offset(), config.overlap());
        let out_win = &out[output_offset..output_offset + len];
        let cos_win = &ref_cos[input_offset..input_offset + len];
        let sin_win = &input[input_offset..input_offset + len];

        let corr_cos = normalized_dot(out_win, cos_win).abs();
        let corr_sin = normalized_dot(out_win, sin_win).abs();
        assert!(corr_cos >= 0.3, "|corr(out, cos)| = {corr_cos:.3}");
        assert!(corr_sin <= 0.95, "|corr(out, sin)| = {corr_sin:.3}");
    }

    #[test]
    fn non_finite_input_propagates() {
        let hilbert = HilbertTransformer::new(FilterConfig::new(16, 8, WindowType::Hann).unwrap());
        let mut block = vec![0.0; 16];
        block[3] = f64::NAN;
        let out = hilbert.process_block(&block);
        assert!(out.iter().any(|x| x.is_nan()));
    }

    #[test]
    fn shared_across_threads() {
        let hilbert = HilbertTransformer::new(FilterConfig::new(256, 128, WindowType::Hann).unwrap());
        let block: Vec<f64> = (0..256).map(|i| (i as f64 * 0.1).sin()).collect();
        let reference = hilbert.process_block(&block);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| hilbert.process_block(&block)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), reference);
            }
        });
    }
}
