//! Quadra Core - SQ quadraphonic matrix encoding and decoding
//!
//! Converts between a matrix-encoded stereo pair (LT/RT) and four quadraphonic
//! channels (LF/RF/LB/RB) with an FFT-based Hilbert transformer and the fixed
//! SQ matrices, optionally followed by adaptive logic steering on decode.
//!
//! # Components
//!
//! ## Filtering
//!
//! - [`WindowType`] / [`window`] - Hann, Hamming, Blackman and rectangular windows
//! - [`HilbertTransformer`] - Windowed FIR quadrature filter applied by FFT
//! - [`QuadratureFilter`] - Block-filter seam the encoder and decoder are generic over
//!
//! ## Framing & Matrix
//!
//! - [`BlockFramer`] - Hop-synchronous blocks and the direct/quadrature offsets
//! - [`sq_decode`] / [`sq_encode`] - Per-sample SQ matrices
//!
//! ## Steering
//!
//! - [`LogicSteering`] - Envelope-driven, energy-preserving gain on decoded channels
//!
//! ## Entry Points
//!
//! - [`SqDecoder`] - 2 → 4 channels
//! - [`SqEncoder`] - 4 → 2 channels
//!
//! # Example
//!
//! ```rust
//! use quadra_core::{FilterConfig, LogicSteeringConfig, MultiChannelBuffer, SqDecoder, SqEncoder};
//!
//! let config = FilterConfig::default();
//! let quad = MultiChannelBuffer::silent(4, 8192);
//!
//! let stereo = SqEncoder::new(config).process(&quad)?;
//!
//! let mut decoder = SqDecoder::new(config);
//! decoder.set_sample_rate(48000);
//! decoder.set_logic_steering(LogicSteeringConfig::enabled())?;
//! let decoded = decoder.process(&stereo)?;
//! assert_eq!(decoded.channel_count(), 4);
//! # Ok::<(), quadra_core::Error>(())
//! ```
//!
//! # Features
//!
//! - `tracing` - emit `tracing` events for filter design, steering
//!   coefficient updates and per-call block counts

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fft;
pub mod framer;
pub mod hilbert;
pub mod matrix;
pub mod steering;
pub mod window;

// Re-export main types at crate root
pub use buffer::MultiChannelBuffer;
pub use config::{
    DEFAULT_BLOCK_SIZE, DEFAULT_OVERLAP, DEFAULT_SAMPLE_RATE, FilterConfig, HILBERT_GAIN,
};
pub use decoder::SqDecoder;
pub use encoder::SqEncoder;
pub use error::{Error, Result};
pub use fft::Fft;
pub use framer::{BlockFramer, Frame};
pub use hilbert::{HilbertTransformer, QuadratureFilter};
pub use matrix::{QuadChannel, SQ_COEFF, sq_decode, sq_encode};
pub use steering::{
    LOGIC_EPSILON, LogicSteering, LogicSteeringConfig, SteeringMode, time_to_coeff,
};
pub use window::{WindowType, window};
