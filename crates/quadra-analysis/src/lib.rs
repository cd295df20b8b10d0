//! Quadra Analysis - channel separation measurement
//!
//! - [`separation`] - RMS, band-limited RMS and separation in dB
//! - [`report`] - Encode → decode round trips of a 4-channel reference
//!
//! ```rust
//! use quadra_analysis::{SeparationOptions, channel_separation};
//!
//! let decoded = vec![vec![1.0, -1.0], vec![0.1, -0.1]];
//! let result = channel_separation(&decoded, 0, &SeparationOptions::default());
//! assert!((result.separation_db - 20.0).abs() < 1e-9);
//! ```

pub mod report;
pub mod separation;

pub use report::{PairMode, PairSeparation, SeparationAnalyzer, SeparationReport};
pub use separation::{
    LeakMode, SEPARATION_EPSILON, SeparationOptions, SeparationResult, band_rms,
    channel_pair_separation, channel_separation, rms, separation_db,
};
