//! Refined types for calculator inputs
//!
//! The calculators themselves trust their inputs. These types are where that
//! trust is earned: command-line values and scenario files are parsed into
//! them once at the boundary, and only validated values reach the core.
//!
//! # Available Types
//!
//! - [`Probability`]: conversion or click-through rate in `[0.0, 1.0]`
//! - [`PositiveAmount`]: CPM or deal size, `> 0.0`
//! - [`NonNegativeAmount`]: spend or revenue goal, `>= 0.0`
//! - [`ScoreThreshold`]: total lead-score cutoff (0-100)
//!
//! # Example
//!
//! ```rust
//! use funnelmap::core::refined::{Probability, PositiveAmount};
//!
//! let ctr = Probability::new(0.02).unwrap();
//! assert_eq!(*ctr, 0.02);
//!
//! assert!(Probability::new(1.5).is_err());
//! assert!(PositiveAmount::new(0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use stillwater::refined::{InRange, Predicate, Refined};

// ============================================================================
// Custom Predicates
// ============================================================================

/// Predicate for floating-point values in the unit interval [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInterval;

impl Predicate<f64> for UnitInterval {
    type Error = &'static str;

    fn check(value: &f64) -> Result<(), Self::Error> {
        if *value >= 0.0 && *value <= 1.0 {
            Ok(())
        } else {
            Err("value must be in range [0.0, 1.0]")
        }
    }
}

/// Predicate for finite f64 values greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveF64;

impl Predicate<f64> for PositiveF64 {
    type Error = &'static str;

    fn check(value: &f64) -> Result<(), Self::Error> {
        if value.is_finite() && *value > 0.0 {
            Ok(())
        } else {
            Err("value must be positive (> 0.0)")
        }
    }
}

/// Predicate for finite f64 values at or above zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonNegativeF64;

impl Predicate<f64> for NonNegativeF64 {
    type Error = &'static str;

    fn check(value: &f64) -> Result<(), Self::Error> {
        if value.is_finite() && *value >= 0.0 {
            Ok(())
        } else {
            Err("value must be non-negative (>= 0.0)")
        }
    }
}

// ============================================================================
// Amount Types
// ============================================================================

/// A probability: conversion rate or click-through rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    /// Create a new probability, validating it's in [0.0, 1.0].
    pub fn new(value: f64) -> Result<Self, &'static str> {
        UnitInterval::check(&value)?;
        Ok(Self(value))
    }

    /// Get the inner value.
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl std::ops::Deref for Probability {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Strictly positive currency amount (CPM, average deal size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositiveAmount(f64);

impl PositiveAmount {
    /// Create a new amount, validating it's positive and finite.
    pub fn new(value: f64) -> Result<Self, &'static str> {
        PositiveF64::check(&value)?;
        Ok(Self(value))
    }

    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl std::ops::Deref for PositiveAmount {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Currency amount that may be zero (spend, revenue goal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonNegativeAmount(f64);

impl NonNegativeAmount {
    /// Create a new amount, validating it's non-negative and finite.
    pub fn new(value: f64) -> Result<Self, &'static str> {
        NonNegativeF64::check(&value)?;
        Ok(Self(value))
    }

    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl std::ops::Deref for NonNegativeAmount {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ============================================================================
// Score Types
// ============================================================================

/// Total lead-score cutoff.
///
/// Valid range: 0-100, the span of fit plus engagement.
pub type ScoreThreshold = Refined<u32, InRange<0, 100>>;

#[cfg(test)]
mod tests {
    use super::*;

    mod probabilities {
        use super::*;

        #[test]
        fn accepts_unit_interval_bounds() {
            assert!(Probability::new(0.0).is_ok());
            assert!(Probability::new(0.5).is_ok());
            assert!(Probability::new(1.0).is_ok());
        }

        #[test]
        fn rejects_out_of_range_and_nan() {
            assert!(Probability::new(-0.01).is_err());
            assert!(Probability::new(1.01).is_err());
            assert!(Probability::new(f64::NAN).is_err());
        }

        #[test]
        fn deref_exposes_value() {
            let rate = Probability::new(0.25).unwrap();
            assert_eq!(*rate, 0.25);
            assert_eq!(rate.into_inner(), 0.25);
        }
    }

    mod amounts {
        use super::*;

        #[test]
        fn positive_amount_rejects_zero_and_infinity() {
            assert!(PositiveAmount::new(0.0).is_err());
            assert!(PositiveAmount::new(-5.0).is_err());
            assert!(PositiveAmount::new(f64::INFINITY).is_err());
            assert!(PositiveAmount::new(12.5).is_ok());
        }

        #[test]
        fn non_negative_amount_accepts_zero() {
            assert!(NonNegativeAmount::new(0.0).is_ok());
            assert!(NonNegativeAmount::new(-0.01).is_err());
            assert!(NonNegativeAmount::new(f64::NAN).is_err());
        }
    }

    mod thresholds {
        use super::*;

        #[test]
        fn score_threshold_range() {
            assert!(ScoreThreshold::new(0).is_ok());
            assert!(ScoreThreshold::new(75).is_ok());
            assert!(ScoreThreshold::new(100).is_ok());
            assert!(ScoreThreshold::new(101).is_err());
        }
    }
}
