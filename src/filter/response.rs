//! Evaluation of a filter's transfer function in the z-plane.
//!
//! Every form evaluates its own representation directly, so comparing the
//! response of a filter before and after a conversion is a cheap check that
//! nothing was lost on the way.

use crate::filter::biquad::BiquadFilter;
use crate::filter::sos::SosFilter;
use crate::filter::tf::TfFilter;
use crate::filter::zpk::ZpkFilter;
use crate::filter::Filter;
use crate::util::math::{Coefficient, RealCoefficient};
use num::{Complex, One};

/// Filters whose transfer function can be evaluated at a complex point.
pub trait FrequencyResponse<R>
where
    R: RealCoefficient,
{
    /// Evaluates `H(z)`.
    fn response(&self, z: Complex<R>) -> Complex<R>;

    /// Evaluates `H(e^{i w})` for each normalized angular frequency `w`, in
    /// radians per sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::response::FrequencyResponse;
    /// use filter_coeffs::filter::BiquadFilter;
    /// use std::f64::consts::PI;
    ///
    /// // Two-tap moving average: unity at DC, a null at Nyquist.
    /// let bq = BiquadFilter::new(0.5, 0.5, 0.0, 0.0, 0.0);
    /// let h = bq.freqz(&[0.0, PI]);
    /// assert!((h[0].norm() - 1.0).abs() < 1e-12);
    /// assert!(h[1].norm() < 1e-12);
    /// ```
    fn freqz(&self, omega: &[R]) -> Vec<Complex<R>> {
        omega
            .iter()
            .map(|&w| self.response(Complex::from_polar(R::one(), w)))
            .collect()
    }
}

impl<Z, P, K> FrequencyResponse<Z::Real> for ZpkFilter<Z, P, K>
where
    Z: Coefficient,
    P: Coefficient<Real = Z::Real>,
    K: Coefficient<Real = Z::Real>,
{
    fn response(&self, z: Complex<Z::Real>) -> Complex<Z::Real> {
        let num = self
            .zeros()
            .iter()
            .fold(self.gain().to_complex(), |acc, q| acc * (z - q.to_complex()));
        let den = self
            .poles()
            .iter()
            .fold(Complex::<Z::Real>::one(), |acc, p| acc * (z - p.to_complex()));
        num / den
    }
}

impl<T> FrequencyResponse<T::Real> for TfFilter<T>
where
    T: Coefficient,
{
    fn response(&self, z: Complex<T::Real>) -> Complex<T::Real> {
        self.numerator().eval_complex(z) / self.denominator().eval_complex(z)
    }
}

impl<T> FrequencyResponse<T::Real> for BiquadFilter<T>
where
    T: Coefficient,
{
    fn response(&self, z: Complex<T::Real>) -> Complex<T::Real> {
        let zi = z.inv();
        let num = self.b0().to_complex()
            + (self.b1().to_complex() + self.b2().to_complex() * zi) * zi;
        let den = Complex::<T::Real>::one()
            + (self.a1().to_complex() + self.a2().to_complex() * zi) * zi;
        num / den
    }
}

impl<T, G> FrequencyResponse<T::Real> for SosFilter<T, G>
where
    T: Coefficient,
    G: Coefficient<Real = T::Real>,
{
    fn response(&self, z: Complex<T::Real>) -> Complex<T::Real> {
        self.sections()
            .iter()
            .fold(self.gain().to_complex(), |acc, s| acc * s.response(z))
    }
}

impl<T> FrequencyResponse<T> for Filter<T>
where
    T: RealCoefficient,
{
    fn response(&self, z: Complex<T>) -> Complex<T> {
        match self {
            Filter::Zpk(f) => f.response(z),
            Filter::Tf(f) => f.response(z),
            Filter::Biquad(f) => f.response(z),
            Filter::Sos(f) => f.response(z),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::filter::response::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_forms_agree() {
        let bq: BiquadFilter<f64> = BiquadFilter::new(0.3, -0.2, 0.1, -0.4, 0.3);
        let tf = bq.to_tf().unwrap();
        let zpk = tf.to_zpk().unwrap();
        let sos = zpk.to_sos().unwrap();
        for &w in &[0.0, 0.3, 1.0, 2.5, 3.0] {
            let z = Complex::from_polar(1.0, w);
            let expected = bq.response(z);
            for h in &[tf.response(z), zpk.response(z), sos.response(z)] {
                assert_approx_eq!(h.re, expected.re);
                assert_approx_eq!(h.im, expected.im);
            }
        }
    }

    #[test]
    fn test_dc_gain() {
        // 0.5 (z + 1) / (z - 0.5) has a DC gain of 2.
        let zpk: ZpkFilter<f64, f64, f64> = ZpkFilter::new(vec![-1.0], vec![0.5], 0.5);
        let h = zpk.response(Complex::new(1.0, 0.0));
        assert_approx_eq!(h.re, 2.0);
        assert_approx_eq!(h.im, 0.0);
        let filter: Filter<f64> = Filter::Zpk(ZpkFilter::new(
            vec![Complex::new(-1.0, 0.0)],
            vec![Complex::new(0.5, 0.0)],
            0.5,
        ));
        assert_approx_eq!(filter.freqz(&[0.0])[0].re, 2.0);
    }
}
