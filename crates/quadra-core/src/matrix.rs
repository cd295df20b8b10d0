//! SQ encode and decode matrices.
//!
//! With `c = √2/2` and `H(x)` the quadrature version of `x`:
//!
//! | Direction | Equations |
//! |-----------|-----------|
//! | Decode    | `LF = LT`, `RF = RT`, `LB = c·H(LT) − c·RT`, `RB = c·LT − c·H(RT)` |
//! | Encode    | `LT = LF + c·RB − c·H(LB)`, `RT = RF − c·LB + c·H(RB)` |
//!
//! Both maps are linear and memoryless over one aligned sample pair.

use std::f64::consts::SQRT_2;
use std::fmt;

/// Matrix coefficient `√2/2`.
pub const SQ_COEFF: f64 = SQRT_2 / 2.0;

/// The four quadraphonic output channels in buffer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadChannel {
    /// Left front
    LeftFront = 0,
    /// Right front
    RightFront = 1,
    /// Left back
    LeftBack = 2,
    /// Right back
    RightBack = 3,
}

impl QuadChannel {
    /// All channels in buffer order.
    pub const ALL: [QuadChannel; 4] = [
        QuadChannel::LeftFront,
        QuadChannel::RightFront,
        QuadChannel::LeftBack,
        QuadChannel::RightBack,
    ];

    /// Buffer index of this channel.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short label (`LF`, `RF`, `LB`, `RB`).
    pub fn label(self) -> &'static str {
        match self {
            QuadChannel::LeftFront => "LF",
            QuadChannel::RightFront => "RF",
            QuadChannel::LeftBack => "LB",
            QuadChannel::RightBack => "RB",
        }
    }

    /// The channel on the opposite side of the same row (LF↔RF, LB↔RB).
    pub fn partner(self) -> QuadChannel {
        match self {
            QuadChannel::LeftFront => QuadChannel::RightFront,
            QuadChannel::RightFront => QuadChannel::LeftFront,
            QuadChannel::LeftBack => QuadChannel::RightBack,
            QuadChannel::RightBack => QuadChannel::LeftBack,
        }
    }
}

impl fmt::Display for QuadChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode one aligned sample pair into `[LF, RF, LB, RB]`.
#[inline]
pub fn sq_decode(lt: f64, rt: f64, h_lt: f64, h_rt: f64) -> [f64; 4] {
    [
        lt,
        rt,
        SQ_COEFF * h_lt - SQ_COEFF * rt,
        SQ_COEFF * lt - SQ_COEFF * h_rt,
    ]
}

/// Encode one aligned quad sample into `[LT, RT]`.
///
/// `quad` is `[LF, RF, LB, RB]`; `h_lb`/`h_rb` are the quadrature back channels.
#[inline]
pub fn sq_encode(quad: [f64; 4], h_lb: f64, h_rb: f64) -> [f64; 2] {
    let [lf, rf, lb, rb] = quad;
    [
        lf + SQ_COEFF * rb - SQ_COEFF * h_lb,
        rf - SQ_COEFF * lb + SQ_COEFF * h_rb,
    ]
}
