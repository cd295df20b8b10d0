//! FFT wrapper over cached `rustfft` plans.

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// Forward and inverse FFT plans for one transform size.
///
/// Plans are immutable and `Send + Sync`. Every call allocates its own scratch,
/// so one `Fft` can be shared across threads.
#[derive(Clone)]
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    ifft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self { fft, ifft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward FFT of a real signal, zero-padded or truncated to the FFT size.
    ///
    /// Returns the full (two-sided) spectrum.
    pub fn forward_real(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.forward(&mut buffer);
        buffer
    }

    /// Forward FFT in place.
    pub fn forward(&self, buffer: &mut [Complex<f64>]) {
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];
        self.fft.process_with_scratch(buffer, &mut scratch);
    }

    /// Inverse FFT in place, unnormalized.
    ///
    /// Callers scale by `1 / size` themselves.
    pub fn inverse(&self, buffer: &mut [Complex<f64>]) {
        let mut scratch = vec![Complex::new(0.0, 0.0); self.ifft.get_inplace_scratch_len()];
        self.ifft.process_with_scratch(buffer, &mut scratch);
    }
}

impl std::fmt::Debug for Fft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}
