//! Transfer function representation.
//!
//! A `TfFilter` holds the numerator and denominator of
//!
//! ```text
//!        b[n] x^n + ... + b[1] x + b[0]
//! H(x) = ------------------------------
//!        a[m] x^m + ... + a[1] x + a[0]
//! ```
//!
//! with the denominator normalized so that `a[m] == 1`.

use crate::filter::biquad::BiquadFilter;
use crate::filter::zpk::ZpkFilter;
use crate::filter::FilterError;
use crate::poly::Poly;
use crate::util::math::Coefficient;
use log::debug;
use num::{Complex, Zero};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Filter stored as a ratio of two polynomials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfFilter<T> {
    numerator: Poly<T>,
    denominator: Poly<T>,
}

impl<T> TfFilter<T>
where
    T: Coefficient,
{
    /// Creates a new `TfFilter` from numerator and denominator polynomials.
    ///
    /// Both polynomials are divided by the leading coefficient of the
    /// denominator. Fails if the denominator is the zero polynomial.
    ///
    /// # Arguments
    ///
    /// * `numerator` - Numerator polynomial.
    /// * `denominator` - Denominator polynomial.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::TfFilter;
    /// use filter_coeffs::poly::Poly;
    ///
    /// // (1 + x) / (1 + 2x)
    /// let tf = TfFilter::new(Poly::new(vec![1.0, 1.0]), Poly::new(vec![1.0, 2.0])).unwrap();
    /// assert_eq!(tf.numerator().coeffs(), &[0.5, 0.5]);
    /// assert_eq!(tf.denominator().coeffs(), &[0.5, 1.0]);
    /// ```
    pub fn new(numerator: Poly<T>, denominator: Poly<T>) -> Result<TfFilter<T>, FilterError> {
        if denominator.is_zero() {
            return Err(FilterError::InvalidFilter("denominator polynomial is zero"));
        }
        let lead = denominator.leading();
        Ok(TfFilter {
            numerator: numerator / lead,
            denominator: denominator / lead,
        })
    }

    /// Creates a new `TfFilter` from coefficient vectors ordered highest
    /// power first.
    ///
    /// Leading zeros are dropped. Fails with `InvalidFilter` when either
    /// vector has no nonzero coefficient.
    ///
    /// # Arguments
    ///
    /// * `b` - Numerator coefficients, highest power first.
    /// * `a` - Denominator coefficients, highest power first.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::TfFilter;
    ///
    /// let tf = TfFilter::from_coefficients(&[0.0, 2.0, 1.0], &[2.0, 0.5]).unwrap();
    /// assert_eq!(tf.numerator_coefficients(), vec![1.0, 0.5]);
    /// assert_eq!(tf.denominator_coefficients(), vec![1.0, 0.25]);
    ///
    /// assert!(TfFilter::from_coefficients(&[0.0, 0.0], &[1.0, 1.0]).is_err());
    /// ```
    pub fn from_coefficients(b: &[T], a: &[T]) -> Result<TfFilter<T>, FilterError> {
        let numerator = descending_to_poly(b, "numerator has no nonzero coefficient")?;
        let denominator = descending_to_poly(a, "denominator has no nonzero coefficient")?;
        TfFilter::new(numerator, denominator)
    }

    pub fn numerator(&self) -> &Poly<T> {
        &self.numerator
    }

    pub fn denominator(&self) -> &Poly<T> {
        &self.denominator
    }

    /// Numerator coefficients, highest power first.
    pub fn numerator_coefficients(&self) -> Vec<T> {
        self.numerator.coeffs().iter().rev().copied().collect()
    }

    /// Denominator coefficients, highest power first.
    pub fn denominator_coefficients(&self) -> Vec<T> {
        self.denominator.coeffs().iter().rev().copied().collect()
    }

    /// Factors the filter into zeros, poles and gain.
    ///
    /// The gain is the real part of the leading numerator coefficient. A
    /// zero numerator gives a filter with no zeros and zero gain.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::TfFilter;
    ///
    /// // 2 (x - 0.5) / (x - 0.25)
    /// let tf: TfFilter<f64> = TfFilter::from_coefficients(&[2.0, -1.0], &[1.0, -0.25]).unwrap();
    /// let zpk = tf.to_zpk().unwrap();
    /// assert_eq!(zpk.gain(), 2.0);
    /// assert!((zpk.zeros()[0].re - 0.5).abs() < 1e-12);
    /// assert!((zpk.poles()[0].re - 0.25).abs() < 1e-12);
    /// ```
    pub fn to_zpk(
        &self,
    ) -> Result<ZpkFilter<Complex<T::Real>, Complex<T::Real>, T::Real>, FilterError> {
        let poles = self.denominator.roots()?;
        if self.numerator.is_zero() {
            return Ok(ZpkFilter::new(vec![], poles, T::Real::zero()));
        }
        let gain = self.numerator.leading().re();
        let zeros = (self.numerator.clone() / T::from_real(gain)).roots()?;
        debug!(
            "tf to zpk: {} zeros, {} poles, gain {:?}",
            zeros.len(),
            poles.len(),
            gain
        );
        Ok(ZpkFilter::new(zeros, poles, gain))
    }

    /// Reads the filter as a single biquad.
    ///
    /// The longer of numerator and denominator decides the mapping: three
    /// coefficients fill the whole biquad, two leave `b2` and `a2` at zero,
    /// one sets only `b0`. Empty filters and anything above second order
    /// fail with `UnsupportedConversion`.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::TfFilter;
    ///
    /// let tf = TfFilter::from_coefficients(&[1.0, 0.5, 0.25], &[1.0, -0.2, 0.1]).unwrap();
    /// let bq = tf.to_biquad().unwrap();
    /// assert_eq!((bq.b0(), bq.b1(), bq.b2()), (1.0, 0.5, 0.25));
    /// assert_eq!((bq.a1(), bq.a2()), (-0.2, 0.1));
    /// ```
    pub fn to_biquad(&self) -> Result<BiquadFilter<T>, FilterError> {
        let b = |k| self.numerator.coeff(k);
        let a = |k| self.denominator.coeff(k);
        let zero = T::zero();
        match self.numerator.len().max(self.denominator.len()) {
            3 => Ok(BiquadFilter::new(b(2), b(1), b(0), a(1), a(0))),
            2 => Ok(BiquadFilter::new(b(1), b(0), zero, a(0), zero)),
            1 => Ok(BiquadFilter::new(b(0), zero, zero, zero, zero)),
            0 => Err(FilterError::UnsupportedConversion(
                "cannot convert an empty filter to a biquad",
            )),
            _ => Err(FilterError::UnsupportedConversion(
                "cannot convert a filter of length > 3 to a biquad",
            )),
        }
    }
}

/// Trims leading zeros off a highest-power-first vector and flips it into a
/// polynomial.
fn descending_to_poly<T>(coeffs: &[T], what: &'static str) -> Result<Poly<T>, FilterError>
where
    T: Coefficient,
{
    let first = coeffs
        .iter()
        .position(|c| *c != T::zero())
        .ok_or(FilterError::InvalidFilter(what))?;
    Ok(Poly::new(coeffs[first..].iter().rev().copied().collect()))
}

impl<T> Mul<T> for TfFilter<T>
where
    T: Coefficient,
{
    type Output = TfFilter<T>;

    /// Scales the numerator.
    fn mul(self, k: T) -> TfFilter<T> {
        TfFilter {
            numerator: self.numerator * k,
            denominator: self.denominator,
        }
    }
}

impl<T> Mul<TfFilter<T>> for TfFilter<T>
where
    T: Coefficient,
{
    type Output = TfFilter<T>;

    /// Cascades two filters by multiplying numerators and denominators.
    fn mul(self, other: TfFilter<T>) -> TfFilter<T> {
        TfFilter {
            numerator: self.numerator * other.numerator,
            denominator: self.denominator * other.denominator,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::filter::tf::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_all_zero_numerator() {
        assert_eq!(
            TfFilter::from_coefficients(&[0.0, 0.0], &[1.0, 1.0]),
            Err(FilterError::InvalidFilter("numerator has no nonzero coefficient"))
        );
    }

    #[test]
    fn test_all_zero_denominator() {
        assert!(matches!(
            TfFilter::from_coefficients(&[1.0], &[0.0]),
            Err(FilterError::InvalidFilter(_))
        ));
        assert!(matches!(
            TfFilter::from_coefficients(&[1.0], &[]),
            Err(FilterError::InvalidFilter(_))
        ));
        assert!(TfFilter::new(Poly::new(vec![1.0]), Poly::zero()).is_err());
    }

    #[test]
    fn test_denominator_normalized() {
        let tf = TfFilter::from_coefficients(&[4.0, 2.0], &[0.0, 2.0, 1.0]).unwrap();
        assert_eq!(tf.numerator_coefficients(), vec![2.0, 1.0]);
        assert_eq!(tf.denominator_coefficients(), vec![1.0, 0.5]);
        assert_eq!(tf.denominator().leading(), 1.0);
    }

    #[test]
    fn test_to_zpk() {
        // 3 (x^2 - 0.25) / (x^2 - 0.5x + 0.5)
        let tf = TfFilter::from_coefficients(&[3.0, 0.0, -0.75], &[1.0, -0.5, 0.5]).unwrap();
        let zpk = tf.to_zpk().unwrap();
        assert_eq!(zpk.gain(), 3.0);
        let mut zeros: Vec<f64> = zpk.zeros().iter().map(|z| z.re).collect();
        zeros.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_approx_eq!(zeros[0], -0.5);
        assert_approx_eq!(zeros[1], 0.5);
        for p in zpk.poles() {
            assert_approx_eq!(p.re, 0.25);
            assert_approx_eq!(p.im.abs(), 0.6614378277661477);
        }
    }

    #[test]
    fn test_to_zpk_zero_numerator() {
        let tf = TfFilter::new(Poly::zero(), Poly::new(vec![-0.5, 1.0])).unwrap();
        let zpk = tf.to_zpk().unwrap();
        assert!(zpk.zeros().is_empty());
        assert_eq!(zpk.poles().len(), 1);
        assert_eq!(zpk.gain(), 0.0);
    }

    #[test]
    fn test_biquad_order_reduction() {
        let tf = TfFilter::from_coefficients(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).unwrap();
        let bq = tf.to_biquad().unwrap();
        assert_eq!(bq, BiquadFilter::new(1.0, 0.0, 0.0, 0.0, 0.0));

        let tf = TfFilter::from_coefficients(&[3.0], &[2.0]).unwrap();
        assert_eq!(tf.to_biquad().unwrap(), BiquadFilter::new(1.5, 0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_first_order_to_biquad() {
        let tf = TfFilter::from_coefficients(&[1.0, 1.0], &[1.0, -0.5]).unwrap();
        assert_eq!(tf.to_biquad().unwrap(), BiquadFilter::new(1.0, 1.0, 0.0, -0.5, 0.0));
    }

    #[test]
    fn test_strictly_proper_to_biquad() {
        // 1 / (x^2 + 0.1x + 0.2) = z^-2 / (1 + 0.1z^-1 + 0.2z^-2)
        let tf = TfFilter::from_coefficients(&[1.0], &[1.0, 0.1, 0.2]).unwrap();
        assert_eq!(tf.to_biquad().unwrap(), BiquadFilter::new(0.0, 0.0, 1.0, 0.1, 0.2));
    }

    #[test]
    fn test_third_order_to_biquad() {
        let tf = TfFilter::from_coefficients(&[1.0, 2.0, 3.0, 4.0], &[1.0, 0.0, 0.0, 0.5])
            .unwrap();
        assert!(matches!(
            tf.to_biquad(),
            Err(FilterError::UnsupportedConversion(_))
        ));
    }

    #[test]
    fn test_scale_and_cascade() {
        let a = TfFilter::from_coefficients(&[1.0, 1.0], &[1.0, -0.5]).unwrap();
        let b = TfFilter::from_coefficients(&[1.0, -1.0], &[1.0, 0.5]).unwrap();
        let ab = a.clone() * b;
        assert_eq!(ab.numerator_coefficients(), vec![1.0, 0.0, -1.0]);
        assert_eq!(ab.denominator_coefficients(), vec![1.0, 0.0, -0.25]);
        assert_eq!((a * 2.0).numerator_coefficients(), vec![2.0, 2.0]);
    }

    #[test]
    fn test_complex_coefficients() {
        use num::Complex;
        let j = Complex::new(0.0, 1.0);
        let one = Complex::new(1.0, 0.0);
        // (x - j) / (x - 0.5j)
        let tf = TfFilter::from_coefficients(&[one, -j], &[one, -j * 0.5]).unwrap();
        let zpk = tf.to_zpk().unwrap();
        assert_eq!(zpk.gain(), 1.0);
        assert!((zpk.zeros()[0] - j).norm() < 1e-12);
        assert!((zpk.poles()[0] - j * 0.5).norm() < 1e-12);
    }
}
