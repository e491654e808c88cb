//! Representations of IIR filter coefficients.
//!
//! The same rational transfer function can be written down in several
//! mathematically equivalent ways, each convenient for a different job:
//!
//! * Zero-pole-gain (ZPK) form, what most design algorithms produce.
//! * Transfer function (TF) form, a ratio of two polynomials.
//! * Biquad form, a single section of at most second order.
//! * Second-order sections (SOS), a cascade of biquads.
//!
//! High order filters are numerically fragile in TF form: tiny coefficient
//! errors move the roots of a long polynomial a great deal. Running the
//! filter as a cascade of second-order sections avoids that, which is why
//! the ZPK to SOS conversion pairs poles and zeros with some care.
//!
//! The [`Filter`] enum closes over the four forms and [`convert`] moves a
//! filter between any two of them, pivoting through ZPK or TF.

pub mod biquad;
pub mod response;
pub mod sos;
pub mod tf;
pub mod zpk;

pub use self::biquad::BiquadFilter;
pub use self::sos::SosFilter;
pub use self::tf::TfFilter;
pub use self::zpk::ZpkFilter;

use crate::poly::PolyError;
use crate::util::math::RealCoefficient;
use log::debug;
use num::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures raised while building or converting filters.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(&'static str),
    #[error("Dimension mismatch: {zeros} zeros cannot be paired with {poles} poles")]
    DimensionMismatch { zeros: usize, poles: usize },
    #[error("Unsupported conversion: {0}")]
    UnsupportedConversion(&'static str),
    #[error(transparent)]
    Poly(#[from] PolyError),
}

/// Tags naming the four filter forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterForm {
    ZeroPoleGain,
    TransferFunction,
    Biquad,
    SecondOrderSections,
}

impl fmt::Display for FilterForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let desc = match *self {
            FilterForm::ZeroPoleGain => "zpk",
            FilterForm::TransferFunction => "tf",
            FilterForm::Biquad => "biquad",
            FilterForm::SecondOrderSections => "sos",
        };
        write!(f, "{}", desc)
    }
}

/// ZPK filter with complex roots and a real gain, the form produced when
/// converting real coefficient filters.
pub type Zpk<T> = ZpkFilter<Complex<T>, Complex<T>, T>;

/// A real coefficient filter in any of the four forms.
///
/// Only real coefficient forms can be held here. Complex coefficient
/// filters such as `TfFilter<Complex<f64>>` still convert through their
/// own `to_zpk`/`to_tf`/`to_biquad`/`to_sos` methods, but not through
/// [`convert`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Filter<T> {
    Zpk(Zpk<T>),
    Tf(TfFilter<T>),
    Biquad(BiquadFilter<T>),
    Sos(SosFilter<T, T>),
}

impl<T> Filter<T>
where
    T: RealCoefficient,
{
    /// The form this filter is stored in.
    pub fn form(&self) -> FilterForm {
        match self {
            Filter::Zpk(_) => FilterForm::ZeroPoleGain,
            Filter::Tf(_) => FilterForm::TransferFunction,
            Filter::Biquad(_) => FilterForm::Biquad,
            Filter::Sos(_) => FilterForm::SecondOrderSections,
        }
    }

    /// Converts the filter into the `target` form.
    ///
    /// Converting into the form the filter is already in returns a copy.
    /// Biquads are reached through TF, sections through ZPK.
    ///
    /// # Arguments
    ///
    /// * `target` - The form to convert into.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::{Filter, FilterForm, TfFilter};
    ///
    /// let tf = TfFilter::from_coefficients(&[1.0, 2.0, 1.0], &[1.0, -0.5, 0.25]).unwrap();
    /// let sos = Filter::Tf(tf).convert(FilterForm::SecondOrderSections).unwrap();
    /// match sos {
    ///     Filter::Sos(sos) => assert_eq!(sos.sections().len(), 1),
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn convert(&self, target: FilterForm) -> Result<Filter<T>, FilterError> {
        debug!("converting {} filter to {}", self.form(), target);
        if self.form() == target {
            return Ok(self.clone());
        }
        Ok(match target {
            FilterForm::ZeroPoleGain => Filter::Zpk(self.to_zpk()?),
            FilterForm::TransferFunction => Filter::Tf(self.to_tf()?),
            FilterForm::Biquad => Filter::Biquad(self.to_tf()?.to_biquad()?),
            FilterForm::SecondOrderSections => Filter::Sos(self.to_zpk()?.to_sos()?),
        })
    }

    /// The ZPK pivot: direct from TF and SOS, through TF for a biquad.
    fn to_zpk(&self) -> Result<Zpk<T>, FilterError> {
        match self {
            Filter::Zpk(f) => Ok(f.clone()),
            Filter::Tf(f) => f.to_zpk(),
            Filter::Biquad(f) => f.to_zpk(),
            Filter::Sos(f) => f.to_zpk(),
        }
    }

    /// The TF pivot: direct from ZPK and biquads, through ZPK for SOS.
    fn to_tf(&self) -> Result<TfFilter<T>, FilterError> {
        match self {
            Filter::Zpk(f) => f.to_tf(),
            Filter::Tf(f) => Ok(f.clone()),
            Filter::Biquad(f) => f.to_tf(),
            Filter::Sos(f) => f.to_zpk()?.to_tf(),
        }
    }
}

/// Converts `filter` into the `target` form.
///
/// Shorthand for [`Filter::convert`].
pub fn convert<T>(target: FilterForm, filter: &Filter<T>) -> Result<Filter<T>, FilterError>
where
    T: RealCoefficient,
{
    filter.convert(target)
}

impl<T> From<Zpk<T>> for Filter<T> {
    fn from(f: Zpk<T>) -> Filter<T> {
        Filter::Zpk(f)
    }
}

impl<T> From<TfFilter<T>> for Filter<T> {
    fn from(f: TfFilter<T>) -> Filter<T> {
        Filter::Tf(f)
    }
}

impl<T> From<BiquadFilter<T>> for Filter<T> {
    fn from(f: BiquadFilter<T>) -> Filter<T> {
        Filter::Biquad(f)
    }
}

impl<T> From<SosFilter<T, T>> for Filter<T> {
    fn from(f: SosFilter<T, T>) -> Filter<T> {
        Filter::Sos(f)
    }
}

#[cfg(test)]
mod test {
    use crate::filter::*;

    fn all_forms(f: &Filter<f64>) -> Vec<Filter<f64>> {
        [
            FilterForm::ZeroPoleGain,
            FilterForm::TransferFunction,
            FilterForm::Biquad,
            FilterForm::SecondOrderSections,
        ]
        .iter()
        .map(|&form| f.convert(form).unwrap())
        .collect()
    }

    #[test]
    fn test_form_tags() {
        let tf = TfFilter::from_coefficients(&[1.0, 0.5], &[1.0, -0.25]).unwrap();
        for (f, form) in all_forms(&Filter::Tf(tf)).iter().zip(
            [
                FilterForm::ZeroPoleGain,
                FilterForm::TransferFunction,
                FilterForm::Biquad,
                FilterForm::SecondOrderSections,
            ]
            .iter(),
        ) {
            assert_eq!(f.form(), *form);
        }
    }

    #[test]
    fn test_identity_conversion() {
        let bq = BiquadFilter::new(1.0, 0.2, 0.3, -0.4, 0.1);
        let f = Filter::Biquad(bq);
        assert_eq!(convert(FilterForm::Biquad, &f), Ok(f.clone()));
    }

    #[test]
    fn test_every_pair() {
        let bq = BiquadFilter::new(0.5, 0.25, 0.125, -0.6, 0.2);
        for from in all_forms(&Filter::Biquad(bq)) {
            for to in all_forms(&from) {
                match to.convert(FilterForm::Biquad).unwrap() {
                    Filter::Biquad(back) => {
                        assert!((back.b0() - 0.5).abs() < 1e-9);
                        assert!((back.b1() - 0.25).abs() < 1e-9);
                        assert!((back.b2() - 0.125).abs() < 1e-9);
                        assert!((back.a1() + 0.6).abs() < 1e-9);
                        assert!((back.a2() - 0.2).abs() < 1e-9);
                    }
                    _ => unreachable!(),
                }
            }
        }
    }

    #[test]
    fn test_complex_coefficients_convert_directly() {
        // (x - 0.5i) / (x + 0.25i)
        let tf = TfFilter::from_coefficients(
            &[Complex::new(1.0, 0.0), Complex::new(0.0, -0.5)],
            &[Complex::new(1.0, 0.0), Complex::new(0.0, 0.25)],
        )
        .unwrap();
        let zpk = tf.to_zpk().unwrap();
        assert_eq!(zpk.gain(), 1.0);
        assert!((zpk.zeros()[0] - Complex::new(0.0, 0.5)).norm() < 1e-12);
        assert!((zpk.poles()[0] - Complex::new(0.0, -0.25)).norm() < 1e-12);
    }

    #[test]
    fn test_third_order_tf_to_biquad() {
        let tf = TfFilter::from_coefficients(&[1.0, 0.0, 0.0, 0.0], &[1.0, 0.1, 0.2, 0.3])
            .unwrap();
        assert!(matches!(
            Filter::Tf(tf).convert(FilterForm::Biquad),
            Err(FilterError::UnsupportedConversion(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(FilterForm::SecondOrderSections.to_string(), "sos");
        let err = FilterError::DimensionMismatch { zeros: 3, poles: 2 };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: 3 zeros cannot be paired with 2 poles"
        );
    }
}
