//! Logic steering: adaptive gain riding on the four decoded channels.
//!
//! Each output sample updates one energy envelope per channel with separate
//! attack and release smoothing. When one envelope holds more than
//! `dominance_threshold` of the total, that channel is boosted, the other three
//! are cut, and all four are rescaled so the instantaneous power
//! (sum of squares) is unchanged.
//!
//! The controller carries state from sample to sample and must see samples in
//! order. Envelopes persist across blocks and across `process` calls; changing
//! the sample rate or config recomputes coefficients but keeps the envelopes.

use crate::config::DEFAULT_SAMPLE_RATE;
use crate::error::{Error, Result};

/// Floor for energy sums in the dominance ratio and renormalization.
pub const LOGIC_EPSILON: f64 = 1e-12;

/// Logic steering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicSteeringConfig {
    /// Steering active; when false the controller passes samples through.
    pub enabled: bool,
    /// Envelope attack time in seconds.
    pub attack_time: f64,
    /// Envelope release time in seconds.
    pub release_time: f64,
    /// Dominance ratio above which steering engages, in (0, 1).
    pub dominance_threshold: f64,
    /// Gain applied to the dominant channel at full intensity (>= 1).
    pub max_boost: f64,
    /// Gain applied to the other channels at full intensity, in (0, 1].
    pub min_gain: f64,
}

impl Default for LogicSteeringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            attack_time: 0.01,
            release_time: 0.2,
            dominance_threshold: 0.55,
            max_boost: 1.6,
            min_gain: 0.4,
        }
    }
}

impl LogicSteeringConfig {
    /// Default parameters with steering switched on.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set attack and release times in seconds.
    pub fn with_times(mut self, attack_time: f64, release_time: f64) -> Self {
        self.attack_time = attack_time;
        self.release_time = release_time;
        self
    }

    /// Set the dominance threshold.
    pub fn with_threshold(mut self, dominance_threshold: f64) -> Self {
        self.dominance_threshold = dominance_threshold;
        self
    }

    /// Set the boost and cut limits.
    pub fn with_gains(mut self, max_boost: f64, min_gain: f64) -> Self {
        self.max_boost = max_boost;
        self.min_gain = min_gain;
        self
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<()> {
        if !(self.attack_time.is_finite() && self.attack_time >= 0.0) {
            return Err(Error::InvalidSteering(format!(
                "attack time must be finite and >= 0, got {}",
                self.attack_time
            )));
        }
        if !(self.release_time.is_finite() && self.release_time >= 0.0) {
            return Err(Error::InvalidSteering(format!(
                "release time must be finite and >= 0, got {}",
                self.release_time
            )));
        }
        if !(self.dominance_threshold > 0.0 && self.dominance_threshold < 1.0) {
            return Err(Error::InvalidSteering(format!(
                "dominance threshold must be in (0, 1), got {}",
                self.dominance_threshold
            )));
        }
        if !(self.max_boost.is_finite() && self.max_boost >= 1.0) {
            return Err(Error::InvalidSteering(format!(
                "max boost must be >= 1, got {}",
                self.max_boost
            )));
        }
        if !(self.min_gain > 0.0 && self.min_gain <= 1.0) {
            return Err(Error::InvalidSteering(format!(
                "min gain must be in (0, 1], got {}",
                self.min_gain
            )));
        }
        Ok(())
    }
}

/// One-pole smoothing coefficient for a time constant: `exp(-1 / (seconds * sample_rate))`.
///
/// Non-positive times or a zero sample rate give 0 (the envelope tracks instantly).
pub fn time_to_coeff(seconds: f64, sample_rate: u32) -> f64 {
    if seconds <= 0.0 || sample_rate == 0 {
        return 0.0;
    }
    (-1.0 / (seconds * f64::from(sample_rate))).exp()
}

/// Controller mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringMode {
    /// Samples pass through untouched; envelopes are not updated.
    Bypass,
    /// Envelopes track and gains are applied.
    Active,
}

/// Stateful logic steering controller for one audio stream.
#[derive(Debug, Clone)]
pub struct LogicSteering {
    /// Current parameters
    config: LogicSteeringConfig,
    /// Sample rate the coefficients were derived for
    sample_rate: u32,
    /// Attack coefficient
    attack_coeff: f64,
    /// Release coefficient
    release_coeff: f64,
    /// Smoothed energy per output channel
    envelopes: [f64; 4],
}

impl LogicSteering {
    /// Create a controller with zeroed envelopes.
    pub fn new(config: LogicSteeringConfig, sample_rate: u32) -> Self {
        let mut steering = Self {
            config,
            sample_rate,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            envelopes: [0.0; 4],
        };
        steering.recalculate_coefficients();
        steering
    }

    /// Current parameters.
    pub fn config(&self) -> &LogicSteeringConfig {
        &self.config
    }

    /// Replace the parameters. Envelopes are kept.
    pub fn set_config(&mut self, config: LogicSteeringConfig) {
        self.config = config;
        self.recalculate_coefficients();
    }

    /// Switch between bypass and active.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Whether steering is active.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Current mode.
    pub fn mode(&self) -> SteeringMode {
        if self.config.enabled {
            SteeringMode::Active
        } else {
            SteeringMode::Bypass
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Update sample rate and recalculate coefficients. Envelopes are kept.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Attack coefficient.
    pub fn attack_coeff(&self) -> f64 {
        self.attack_coeff
    }

    /// Release coefficient.
    pub fn release_coeff(&self) -> f64 {
        self.release_coeff
    }

    /// Smoothed energy per channel (`[LF, RF, LB, RB]`).
    pub fn envelopes(&self) -> [f64; 4] {
        self.envelopes
    }

    /// Steer one decoded sample `[LF, RF, LB, RB]`.
    pub fn process(&mut self, frame: [f64; 4]) -> [f64; 4] {
        if !self.config.enabled {
            return frame;
        }

        // Overflowing or non-finite energy passes through and leaves the envelopes alone.
        let energies = frame.map(|x| x * x);
        if energies.iter().any(|e| !e.is_finite()) {
            return frame;
        }
        self.update_envelopes(&energies);

        let (dominant, max_env) = self.dominant();
        let sum: f64 = self.envelopes.iter().sum::<f64>() + LOGIC_EPSILON;
        if !sum.is_finite() {
            return frame;
        }
        let dominance = max_env / sum;

        let threshold = self.config.dominance_threshold;
        if dominance <= threshold {
            return frame;
        }

        let intensity = ((dominance - threshold) / (1.0 - threshold)).clamp(0.0, 1.0);
        let boost = 1.0 + (self.config.max_boost - 1.0) * intensity;
        let cut = 1.0 - (1.0 - self.config.min_gain) * intensity;

        let mut out = frame;
        for (ch, sample) in out.iter_mut().enumerate() {
            *sample *= if ch == dominant { boost } else { cut };
        }

        let pre_energy: f64 = energies.iter().sum();
        let post_energy: f64 = out.iter().map(|x| x * x).sum();
        if !(pre_energy.is_finite() && post_energy.is_finite()) {
            return frame;
        }
        if pre_energy > LOGIC_EPSILON && post_energy > LOGIC_EPSILON {
            let scale = (pre_energy / post_energy).sqrt();
            for sample in &mut out {
                *sample *= scale;
            }
        }

        out
    }

    fn update_envelopes(&mut self, energies: &[f64; 4]) {
        for (env, &energy) in self.envelopes.iter_mut().zip(energies) {
            // Rising energy uses the attack coefficient, falling uses release
            let coeff = if energy > *env {
                self.attack_coeff
            } else {
                self.release_coeff
            };
            *env = coeff * *env + (1.0 - coeff) * energy;
        }
    }

    /// Arg-max of the envelopes; ties go to the lowest index.
    fn dominant(&self) -> (usize, f64) {
        let mut index = 0;
        let mut max = self.envelopes[0];
        for (i, &env) in self.envelopes.iter().enumerate().skip(1) {
            if env > max {
                max = env;
                index = i;
            }
        }
        (index, max)
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = time_to_coeff(self.config.attack_time, self.sample_rate);
        self.release_coeff = time_to_coeff(self.config.release_time, self.sample_rate);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = self.sample_rate,
            attack_coeff = self.attack_coeff,
            release_coeff = self.release_coeff,
            "logic steering coefficients"
        );
    }
}

impl Default for LogicSteering {
    fn default() -> Self {
        Self::new(LogicSteeringConfig::default(), DEFAULT_SAMPLE_RATE)
    }
}
