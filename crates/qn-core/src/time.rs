//! Virtual time.
//!
//! # Design
//!
//! Virtual time is a non-negative real number of abstract units (the hospital
//! model reads them as minutes).  It is stored as `f64` inside [`SimTime`],
//! which refuses NaN and negative values at construction so that the type can
//! implement a total order via [`f64::total_cmp`].  That makes `SimTime`
//! usable as a heap key without a wrapper at every call site.
//!
//! `+∞` is a legal `SimTime`: an event scheduled after an infinite delay sits
//! in the queue forever and is never reached by any finite horizon.

use std::cmp::Ordering;
use std::fmt;

/// An absolute point on the simulation's virtual clock.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);
    pub const INFINITY: SimTime = SimTime(f64::INFINITY);

    /// Wrap `t`, returning `None` for NaN or negative values.
    #[inline]
    pub fn new(t: f64) -> Option<SimTime> {
        // `+ 0.0` folds -0.0 into 0.0 so `total_cmp` sees one zero.
        if t >= 0.0 { Some(SimTime(t + 0.0)) } else { None }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// The time `delay` units after `self`, or `None` if `delay` is NaN or
    /// negative.
    #[inline]
    pub fn after(self, delay: f64) -> Option<SimTime> {
        if delay >= 0.0 { Some(SimTime(self.0 + delay)) } else { None }
    }

    /// Units elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.2}", self.0)
    }
}
