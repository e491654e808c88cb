//! Second-order (biquad) filter sections.
//!
//! A biquad implements
//!
//! ```text
//!        b0 + b1 z^-1 + b2 z^-2
//! H(z) = ----------------------
//!         1 + a1 z^-1 + a2 z^-2
//! ```
//!
//! with the denominator already normalized so that `a0 == 1`.

use crate::filter::sos::SosFilter;
use crate::filter::tf::TfFilter;
use crate::filter::zpk::ZpkFilter;
use crate::filter::FilterError;
use crate::util::math::Coefficient;
use num::Complex;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// The five coefficients of a normalized biquad.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiquadFilter<T> {
    b0: T,
    b1: T,
    b2: T,
    a1: T,
    a2: T,
}

impl<T> BiquadFilter<T>
where
    T: Coefficient,
{
    /// Creates a new `BiquadFilter` from normalized coefficients.
    ///
    /// # Arguments
    ///
    /// * `b0`, `b1`, `b2` - Numerator coefficients.
    /// * `a1`, `a2` - Denominator coefficients, `a0` being 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::BiquadFilter;
    ///
    /// let bq = BiquadFilter::new(0.2, 0.4, 0.2, -0.3, 0.1);
    /// assert_eq!(bq.coefficients(), [0.2, 0.4, 0.2, 1.0, -0.3, 0.1]);
    /// ```
    pub fn new(b0: T, b1: T, b2: T, a1: T, a2: T) -> BiquadFilter<T> {
        BiquadFilter { b0, b1, b2, a1, a2 }
    }

    /// Creates a new `BiquadFilter` from raw coefficients, dividing
    /// everything by `a0` and scaling the numerator by an optional extra
    /// gain.
    ///
    /// # Arguments
    ///
    /// * `b0`, `b1`, `b2` - Numerator coefficients.
    /// * `a0`, `a1`, `a2` - Denominator coefficients.
    /// * `gain` - Extra gain applied to the numerator, 1 when `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::BiquadFilter;
    ///
    /// let bq = BiquadFilter::from_raw(1.0, 2.0, 1.0, 2.0, 1.0, 0.5, Some(3.0));
    /// assert_eq!(bq, BiquadFilter::new(1.5, 3.0, 1.5, 0.5, 0.25));
    /// ```
    pub fn from_raw(b0: T, b1: T, b2: T, a0: T, a1: T, a2: T, gain: Option<T>) -> BiquadFilter<T> {
        let g = gain.unwrap_or_else(T::one) / a0;
        BiquadFilter {
            b0: b0 * g,
            b1: b1 * g,
            b2: b2 * g,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    pub fn b0(&self) -> T {
        self.b0
    }

    pub fn b1(&self) -> T {
        self.b1
    }

    pub fn b2(&self) -> T {
        self.b2
    }

    pub fn a1(&self) -> T {
        self.a1
    }

    pub fn a2(&self) -> T {
        self.a2
    }

    /// The section as `[b0, b1, b2, a0, a1, a2]` with `a0 == 1`.
    pub fn coefficients(&self) -> [T; 6] {
        [self.b0, self.b1, self.b2, T::one(), self.a1, self.a2]
    }

    /// Expands the biquad into a transfer function, dropping orders that are
    /// entirely zero.
    ///
    /// Fails with `InvalidFilter` when every numerator coefficient is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::BiquadFilter;
    ///
    /// let tf = BiquadFilter::new(2.0, 1.0, 0.0, -0.5, 0.0).to_tf().unwrap();
    /// assert_eq!(tf.numerator_coefficients(), vec![2.0, 1.0]);
    /// assert_eq!(tf.denominator_coefficients(), vec![1.0, -0.5]);
    /// ```
    pub fn to_tf(&self) -> Result<TfFilter<T>, FilterError> {
        let zero = T::zero();
        let one = T::one();
        if self.b2 != zero || self.a2 != zero {
            TfFilter::from_coefficients(&[self.b0, self.b1, self.b2], &[one, self.a1, self.a2])
        } else if self.b1 != zero || self.a1 != zero {
            TfFilter::from_coefficients(&[self.b0, self.b1], &[one, self.a1])
        } else {
            TfFilter::from_coefficients(&[self.b0], &[one])
        }
    }

    /// Factors the biquad into zeros, poles and gain, through TF.
    pub fn to_zpk(
        &self,
    ) -> Result<ZpkFilter<Complex<T::Real>, Complex<T::Real>, T::Real>, FilterError> {
        self.to_tf()?.to_zpk()
    }
}

impl<T> Mul<T> for BiquadFilter<T>
where
    T: Coefficient,
{
    type Output = BiquadFilter<T>;

    /// Scales the numerator only.
    fn mul(self, k: T) -> BiquadFilter<T> {
        BiquadFilter {
            b0: self.b0 * k,
            b1: self.b1 * k,
            b2: self.b2 * k,
            a1: self.a1,
            a2: self.a2,
        }
    }
}

impl<T> Mul<BiquadFilter<T>> for BiquadFilter<T>
where
    T: Coefficient,
{
    type Output = SosFilter<T, T>;

    /// Cascades two biquads into a two-section `SosFilter` with unit gain.
    fn mul(self, other: BiquadFilter<T>) -> SosFilter<T, T> {
        SosFilter::new(vec![self, other], T::one())
    }
}
