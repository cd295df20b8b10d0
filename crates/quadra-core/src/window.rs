//! Window functions used to taper the Hilbert kernel footprint.
//!
//! All windows are the symmetric form, parameterized by `size - 1`, so the
//! first and last coefficients of a Hann or Blackman window are exactly zero.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window (raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
    /// Rectangular (no windowing)
    Rectangular,
}

impl WindowType {
    /// All supported window types.
    pub const ALL: [WindowType; 4] = [
        WindowType::Hann,
        WindowType::Hamming,
        WindowType::Blackman,
        WindowType::Rectangular,
    ];

    /// Lowercase name used in config files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Blackman => "blackman",
            WindowType::Rectangular => "rectangular",
        }
    }

    /// Get window coefficients.
    ///
    /// Sizes of 0 or 1 return all ones (empty or `[1.0]`).
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        if size <= 1 {
            return vec![1.0; size];
        }

        let denom = (size - 1) as f64;
        (0..size)
            .map(|i| {
                let x = 2.0 * PI * i as f64 / denom;
                match self {
                    WindowType::Hann => 0.5 * (1.0 - x.cos()),
                    WindowType::Hamming => 0.54 - 0.46 * x.cos(),
                    WindowType::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                    WindowType::Rectangular => 1.0,
                }
            })
            .collect()
    }

    /// Apply window to a buffer in place.
    pub fn apply(&self, buffer: &mut [f64]) {
        let coeffs = self.coefficients(buffer.len());
        for (sample, w) in buffer.iter_mut().zip(coeffs) {
            *sample *= w;
        }
    }
}

/// Generate `size` coefficients of the given window.
pub fn window(window_type: WindowType, size: usize) -> Vec<f64> {
    window_type.coefficients(size)
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            "rectangular" | "rect" | "none" => Ok(WindowType::Rectangular),
            other => Err(format!(
                "unknown window '{other}' (expected hann, hamming, blackman or rectangular)"
            )),
        }
    }
}
