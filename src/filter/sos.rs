//! Second-order sections: a cascade of biquads with one overall gain.
//!
//! Running a high order filter as a chain of low order sections keeps the
//! coefficients well conditioned. The order of the sections is kept exactly
//! as built.

use crate::filter::biquad::BiquadFilter;
use crate::filter::tf::TfFilter;
use crate::filter::zpk::ZpkFilter;
use crate::filter::FilterError;
use crate::util::math::Coefficient;
use log::debug;
use num::Complex;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Cascade of `BiquadFilter<T>` sections and an overall gain `G`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SosFilter<T, G> {
    sections: Vec<BiquadFilter<T>>,
    gain: G,
}

impl<T, G> SosFilter<T, G>
where
    T: Coefficient,
    G: Coefficient<Real = T::Real>,
{
    /// Creates a new `SosFilter`.
    ///
    /// # Arguments
    ///
    /// * `sections` - Biquad sections, in cascade order.
    /// * `gain` - Gain applied once to the whole cascade.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::{BiquadFilter, SosFilter};
    ///
    /// let sections = vec![
    ///     BiquadFilter::new(1.0, 2.0, 1.0, -0.5, 0.25),
    ///     BiquadFilter::new(1.0, 1.0, 0.0, -0.1, 0.0),
    /// ];
    /// let sos = SosFilter::new(sections, 0.05);
    /// assert_eq!(sos.sections().len(), 2);
    /// ```
    pub fn new(sections: Vec<BiquadFilter<T>>, gain: G) -> SosFilter<T, G> {
        SosFilter { sections, gain }
    }

    pub fn sections(&self) -> &[BiquadFilter<T>] {
        &self.sections
    }

    pub fn gain(&self) -> G {
        self.gain
    }

    /// Collects the zeros and poles of every section, in section order,
    /// and folds all section gains into the overall gain.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::{BiquadFilter, SosFilter};
    ///
    /// let sos = SosFilter::new(
    ///     vec![
    ///         BiquadFilter::new(2.0, 1.0, 0.0, -0.5, 0.0),
    ///         BiquadFilter::new(3.0, 0.0, 0.0, 0.0, 0.0),
    ///     ],
    ///     0.5,
    /// );
    /// let zpk = sos.to_zpk().unwrap();
    /// assert_eq!(zpk.gain(), 3.0);
    /// assert_eq!(zpk.zeros().len(), 1);
    /// assert_eq!(zpk.poles().len(), 1);
    /// ```
    pub fn to_zpk(&self) -> Result<ZpkFilter<Complex<T::Real>, Complex<T::Real>, G>, FilterError> {
        let mut zeros = Vec::new();
        let mut poles = Vec::new();
        let mut gain = self.gain;
        for section in &self.sections {
            let zpk = section.to_zpk()?;
            zeros.extend_from_slice(zpk.zeros());
            poles.extend_from_slice(zpk.poles());
            gain = gain * G::from_real(zpk.gain());
        }
        debug!(
            "sos to zpk: {} sections, {} zeros, {} poles",
            self.sections.len(),
            zeros.len(),
            poles.len()
        );
        Ok(ZpkFilter::new(zeros, poles, gain))
    }

    /// Multiplies the cascade out into a single transfer function, through
    /// ZPK.
    pub fn to_tf(&self) -> Result<TfFilter<T::Real>, FilterError> {
        self.to_zpk()?.to_tf()
    }

    /// Collapses the cascade into a single biquad, through ZPK and TF.
    ///
    /// Fails with `UnsupportedConversion` when the cascade is above second
    /// order.
    pub fn to_biquad(&self) -> Result<BiquadFilter<T::Real>, FilterError> {
        self.to_tf()?.to_biquad()
    }
}

impl<T> SosFilter<T, T>
where
    T: Coefficient,
{
    /// One `[b0, b1, b2, a0, a1, a2]` row per section, with the overall gain
    /// folded into the numerator of the first row.
    ///
    /// A filter without sections yields a single pass-through row carrying
    /// the gain.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::{BiquadFilter, SosFilter};
    ///
    /// let sos = SosFilter::new(vec![BiquadFilter::new(1.0, 2.0, 1.0, -0.5, 0.25)], 0.5);
    /// assert_eq!(sos.coefficients(), vec![[0.5, 1.0, 0.5, 1.0, -0.5, 0.25]]);
    /// ```
    pub fn coefficients(&self) -> Vec<[T; 6]> {
        let zero = T::zero();
        if self.sections.is_empty() {
            return vec![[self.gain, zero, zero, T::one(), zero, zero]];
        }
        self.sections
            .iter()
            .enumerate()
            .map(|(ix, s)| {
                let s = if ix == 0 { *s * self.gain } else { *s };
                s.coefficients()
            })
            .collect()
    }
}

impl<T, G> Mul<G> for SosFilter<T, G>
where
    G: Coefficient,
{
    type Output = SosFilter<T, G>;

    /// Scales the overall gain.
    fn mul(self, k: G) -> SosFilter<T, G> {
        SosFilter {
            sections: self.sections,
            gain: self.gain * k,
        }
    }
}

impl<T, G> Mul<SosFilter<T, G>> for SosFilter<T, G>
where
    G: Coefficient,
{
    type Output = SosFilter<T, G>;

    /// Cascades two filters: sections are concatenated and the gains
    /// multiply.
    fn mul(self, other: SosFilter<T, G>) -> SosFilter<T, G> {
        let mut sections = self.sections;
        sections.extend(other.sections);
        SosFilter {
            sections,
            gain: self.gain * other.gain,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::filter::sos::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_empty_cascade() {
        let sos: SosFilter<f64, f64> = SosFilter::new(vec![], 2.0);
        let zpk = sos.to_zpk().unwrap();
        assert!(zpk.zeros().is_empty());
        assert!(zpk.poles().is_empty());
        assert_eq!(zpk.gain(), 2.0);
        assert_eq!(sos.coefficients(), vec![[2.0, 0.0, 0.0, 1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_section_order_preserved() {
        let s1 = BiquadFilter::new(0.0, 0.0, 1.0, -0.3, 0.02);
        let s2 = BiquadFilter::new(0.0, 1.0, 0.0, -0.9, 0.0);
        let zpk = SosFilter::new(vec![s1, s2], 1.0).to_zpk().unwrap();
        let poles: Vec<f64> = zpk.poles().iter().map(|p| p.re).collect();
        assert_eq!(poles.len(), 3);
        assert_approx_eq!(poles[2], 0.9);
        assert!(poles[..2].iter().all(|p| (p - 0.1).abs() < 1e-12 || (p - 0.2).abs() < 1e-12));
    }

    #[test]
    fn test_gains_fold() {
        let sos: SosFilter<f64, f64> = SosFilter::new(
            vec![
                BiquadFilter::new(2.0, 0.0, 0.0, 0.0, 0.0),
                BiquadFilter::new(4.0, 2.0, 0.0, 0.5, 0.0),
            ],
            0.25,
        );
        assert_approx_eq!(sos.to_zpk().unwrap().gain(), 2.0);
    }

    #[test]
    fn test_to_tf() {
        let sos: SosFilter<f64, f64> = SosFilter::new(
            vec![
                BiquadFilter::new(1.0, 1.0, 0.0, -0.5, 0.0),
                BiquadFilter::new(1.0, -1.0, 0.0, 0.5, 0.0),
            ],
            2.0,
        );
        let tf = sos.to_tf().unwrap();
        let b = tf.numerator_coefficients();
        let a = tf.denominator_coefficients();
        assert_approx_eq!(b[0], 2.0);
        assert_approx_eq!(b[1], 0.0);
        assert_approx_eq!(b[2], -2.0);
        assert_approx_eq!(a[0], 1.0);
        assert_approx_eq!(a[1], 0.0);
        assert_approx_eq!(a[2], -0.25);
    }

    #[test]
    fn test_scale_and_cascade() {
        let a = SosFilter::new(vec![BiquadFilter::new(1.0, 0.0, 0.0, 0.0, 0.0)], 2.0);
        let b = SosFilter::new(vec![BiquadFilter::new(0.5, 0.0, 0.0, 0.0, 0.0)], 3.0);
        let ab = a * b;
        assert_eq!(ab.sections().len(), 2);
        assert_eq!(ab.gain(), 6.0);
        assert_eq!((ab * 0.5).gain(), 3.0);
    }
}
