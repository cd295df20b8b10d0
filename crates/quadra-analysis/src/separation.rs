//! RMS-based channel separation metrics.
//!
//! Levels are plain RMS, or band-limited RMS taken from a one-sided FFT power
//! spectrum when a frequency range is requested. Separation is
//! `20·log10(target / leak)` with fixed rules near silence (see [`separation_db`]).

use rustfft::{FftPlanner, num_complex::Complex};

/// Level at or below which an RMS value counts as silence.
pub const SEPARATION_EPSILON: f64 = 1e-12;

/// How leakage from the non-target channels is aggregated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeakMode {
    /// Loudest non-target channel.
    #[default]
    Max,
    /// Mean RMS over the non-target channels.
    Avg,
}

/// Options shared by all separation measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationOptions {
    /// Leak aggregation.
    pub leak_mode: LeakMode,
    /// Sample rate in Hz, only needed for band limiting.
    pub sample_rate: u32,
    /// Lower band edge in Hz.
    pub f_min: f64,
    /// Upper band edge in Hz (`<= 0` means Nyquist).
    pub f_max: f64,
}

impl Default for SeparationOptions {
    fn default() -> Self {
        Self {
            leak_mode: LeakMode::Max,
            sample_rate: 0,
            f_min: 0.0,
            f_max: 0.0,
        }
    }
}

impl SeparationOptions {
    /// Full-band options with the given leak mode.
    pub fn new(leak_mode: LeakMode) -> Self {
        Self {
            leak_mode,
            ..Self::default()
        }
    }

    /// Restrict measurements to `[f_min, f_max]` Hz at `sample_rate`.
    pub fn with_band(mut self, sample_rate: u32, f_min: f64, f_max: f64) -> Self {
        self.sample_rate = sample_rate;
        self.f_min = f_min;
        self.f_max = f_max;
        self
    }

    /// True when a frequency range was requested.
    pub fn is_band_limited(&self) -> bool {
        self.f_min > 0.0 || self.f_max > 0.0
    }
}

/// Target and leak levels for one measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeparationResult {
    /// RMS of the target channel.
    pub target_rms: f64,
    /// Aggregated RMS of the leaking channel(s).
    pub leak_rms: f64,
    /// `20·log10(target_rms / leak_rms)`.
    pub separation_db: f64,
}

impl SeparationResult {
    fn from_levels(target_rms: f64, leak_rms: f64) -> Self {
        Self {
            target_rms,
            leak_rms,
            separation_db: separation_db(target_rms, leak_rms),
        }
    }
}

/// Root mean square; 0 for an empty slice.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|x| x * x).sum();
    (sum / samples.len() as f64).sqrt()
}

/// RMS restricted to bins whose centre frequency lies in `[f_min, f_max]`.
///
/// Uses the one-sided power spectrum of the whole signal: DC and Nyquist are
/// counted once, every other bin twice, and the sum is divided by `n²`. With the
/// full band this equals [`rms`] (Parseval).
///
/// `f_min < 0` is treated as 0; `f_max <= 0` or above Nyquist as Nyquist.
/// Returns 0 for empty input, `sample_rate == 0`, or `f_min > f_max`.
pub fn band_rms(samples: &[f64], sample_rate: u32, f_min: f64, f_max: f64) -> f64 {
    let n = samples.len();
    if n == 0 || sample_rate == 0 {
        return 0.0;
    }
    let rate = f64::from(sample_rate);
    let nyquist = rate / 2.0;
    let f_min = f_min.max(0.0);
    let f_max = if f_max <= 0.0 || f_max > nyquist {
        nyquist
    } else {
        f_max
    };
    if f_min > f_max {
        return 0.0;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let mut spectrum: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut spectrum);

    let n_f = n as f64;
    let mut power = 0.0;
    for (k, bin) in spectrum.iter().enumerate().take(n / 2 + 1) {
        let freq = k as f64 * rate / n_f;
        if freq < f_min || freq > f_max {
            continue;
        }
        let p = bin.norm_sqr();
        power += if k == 0 || k == n / 2 { p } else { 2.0 * p };
    }

    (power / (n_f * n_f)).sqrt()
}

/// Separation in dB between a target and a leak level.
///
/// - both above [`SEPARATION_EPSILON`]: `20·log10(target / leak)`
/// - target above, leak at or below: `+∞`
/// - otherwise: 0
pub fn separation_db(target_rms: f64, leak_rms: f64) -> f64 {
    if target_rms > SEPARATION_EPSILON && leak_rms > SEPARATION_EPSILON {
        20.0 * (target_rms / leak_rms).log10()
    } else if target_rms > SEPARATION_EPSILON {
        f64::INFINITY
    } else {
        0.0
    }
}

fn level(samples: &[f64], options: &SeparationOptions) -> f64 {
    if !options.is_band_limited() {
        return rms(samples);
    }
    band_rms(samples, options.sample_rate, options.f_min, options.f_max)
}

/// Separation of `target` against all other channels of `decoded`.
///
/// An out-of-range `target` gives a zeroed result.
pub fn channel_separation(
    decoded: &[Vec<f64>],
    target: usize,
    options: &SeparationOptions,
) -> SeparationResult {
    let Some(target_samples) = decoded.get(target) else {
        return SeparationResult::default();
    };
    let target_rms = level(target_samples, options);

    let leaks = decoded
        .iter()
        .enumerate()
        .filter(|&(ch, _)| ch != target)
        .map(|(_, samples)| level(samples, options));

    let leak_rms = match options.leak_mode {
        LeakMode::Max => leaks.fold(0.0, f64::max),
        LeakMode::Avg => {
            let (sum, count) = leaks.fold((0.0, 0usize), |(s, c), r| (s + r, c + 1));
            if count > 0 { sum / count as f64 } else { 0.0 }
        }
    };

    SeparationResult::from_levels(target_rms, leak_rms)
}

/// Separation of `target` against the single channel `leak`.
///
/// Out-of-range indices give a zeroed result.
pub fn channel_pair_separation(
    decoded: &[Vec<f64>],
    target: usize,
    leak: usize,
    options: &SeparationOptions,
) -> SeparationResult {
    match (decoded.get(target), decoded.get(leak)) {
        (Some(t), Some(l)) => SeparationResult::from_levels(level(t, options), level(l, options)),
        _ => SeparationResult::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, rate: u32, len: usize, amp: f64) -> Vec<f64> {
        (0..len)
            .map(|i| amp * (2.0 * PI * freq * i as f64 / f64::from(rate)).sin())
            .collect()
    }

    #[test]
    fn two_channel_separation_is_twenty_db() {
        let decoded = vec![vec![1.0, -1.0], vec![0.1, -0.1]];
        let result = channel_separation(&decoded, 0, &SeparationOptions::default());
        assert!((result.target_rms - 1.0).abs() < 1e-12);
        assert!((result.leak_rms - 0.1).abs() < 1e-12);
        assert!((result.separation_db - 20.0).abs() < 1e-9);
    }

    #[test]
    fn separation_db_edge_cases() {
        assert_eq!(separation_db(1.0, 0.0), f64::INFINITY);
        assert_eq!(separation_db(1.0, 1e-13), f64::INFINITY);
        assert_eq!(separation_db(0.0, 0.0), 0.0);
        assert_eq!(separation_db(0.0, 0.5), 0.0);
        assert!((separation_db(0.5, 0.05) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn leak_modes() {
        let decoded = vec![vec![1.0, -1.0], vec![0.2, -0.2], vec![0.4, -0.4]];
        let max = channel_separation(&decoded, 0, &SeparationOptions::new(LeakMode::Max));
        let avg = channel_separation(&decoded, 0, &SeparationOptions::new(LeakMode::Avg));
        assert!((max.leak_rms - 0.4).abs() < 1e-12);
        assert!((avg.leak_rms - 0.3).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_is_zeroed() {
        let decoded = vec![vec![1.0; 4]];
        let options = SeparationOptions::default();
        assert_eq!(channel_separation(&decoded, 5, &options), SeparationResult::default());
        assert_eq!(
            channel_pair_separation(&decoded, 0, 1, &options),
            SeparationResult::default()
        );
    }

    #[test]
    fn single_channel_has_infinite_separation() {
        let result = channel_separation(&[vec![0.5; 8]], 0, &SeparationOptions::default());
        assert_eq!(result.leak_rms, 0.0);
        assert_eq!(result.separation_db, f64::INFINITY);
    }

    #[test]
    fn full_band_rms_matches_time_domain() {
        let signal: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 113) as f64 / 113.0 - 0.5).collect();
        let full = band_rms(&signal, 48000, 0.0, 0.0);
        assert!((full - rms(&signal)).abs() < 1e-9, "{full} vs {}", rms(&signal));
    }

    #[test]
    fn band_excludes_out_of_band_tone() {
        let rate = 8000;
        let signal: Vec<f64> = tone(250.0, rate, 8000, 1.0)
            .iter()
            .zip(tone(2000.0, rate, 8000, 0.5))
            .map(|(a, b)| a + b)
            .collect();

        let low = band_rms(&signal, rate, 100.0, 500.0);
        let high = band_rms(&signal, rate, 1000.0, 0.0);
        assert!((low - 1.0 / 2f64.sqrt()).abs() < 1e-6, "low band {low}");
        assert!((high - 0.5 / 2f64.sqrt()).abs() < 1e-6, "high band {high}");
    }

    #[test]
    fn band_edge_cases() {
        let signal = vec![0.5; 64];
        assert_eq!(band_rms(&[], 48000, 0.0, 100.0), 0.0);
        assert_eq!(band_rms(&signal, 0, 0.0, 100.0), 0.0);
        assert_eq!(band_rms(&signal, 48000, 500.0, 100.0), 0.0);
        // DC only
        assert!((band_rms(&signal, 48000, -10.0, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn band_limiting_needs_sample_rate() {
        let decoded = vec![vec![1.0, -1.0], vec![0.1, -0.1]];
        let options = SeparationOptions::default().with_band(0, 100.0, 0.0);
        let result = channel_separation(&decoded, 0, &options);
        assert_eq!(result, SeparationResult::default());
    }
}
