//! A small polynomial engine over filter coefficients.
//!
//! Polynomials are stored lowest power first, so `coeffs()[k]` is the
//! coefficient of `x^k`. High order zero coefficients are trimmed at
//! construction, keeping at least one coefficient for any non-empty input;
//! the zero polynomial is therefore `[0]` with length 1.

pub mod roots;

use crate::util::math::Coefficient;
use num::{Complex, Zero};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};
use thiserror::Error;

/// Failures raised by the polynomial engine.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PolyError {
    #[error("Polynomial error: the zero polynomial has no finite set of roots")]
    ZeroPolynomial,
    #[error(
        "Polynomial error: root finding for a degree {degree} polynomial did not converge after {iterations} iterations"
    )]
    NoConvergence { degree: usize, iterations: usize },
    #[error("Polynomial error: type conversion from generic failed")]
    ConvertError,
}

/// Polynomial with coefficients of type `T`, lowest power first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poly<T> {
    coeffs: Vec<T>,
}

impl<T> Poly<T>
where
    T: Coefficient,
{
    /// Creates a polynomial from coefficients ordered lowest power first.
    ///
    /// # Arguments
    ///
    /// * `coeffs` - Coefficients, `coeffs[k]` multiplying `x^k`.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::poly::Poly;
    ///
    /// // 1 + 2x, the trailing zero is trimmed
    /// let p = Poly::new(vec![1.0, 2.0, 0.0]);
    /// assert_eq!(p.coeffs(), &[1.0, 2.0]);
    /// assert_eq!(p.degree(), 1);
    /// ```
    pub fn new(mut coeffs: Vec<T>) -> Poly<T> {
        while coeffs.len() > 1 && coeffs[coeffs.len() - 1] == T::zero() {
            coeffs.pop();
        }
        Poly { coeffs }
    }

    /// The zero polynomial.
    pub fn zero() -> Poly<T> {
        Poly {
            coeffs: vec![T::zero()],
        }
    }

    /// The constant polynomial `1`.
    pub fn one() -> Poly<T> {
        Poly {
            coeffs: vec![T::one()],
        }
    }

    /// Builds the monic polynomial `(x - r[0]) * (x - r[1]) * ...`.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::poly::Poly;
    ///
    /// let p = Poly::from_roots(&[1.0, 2.0]);
    /// assert_eq!(p.coeffs(), &[2.0, -3.0, 1.0]);
    /// ```
    pub fn from_roots(roots: &[T]) -> Poly<T> {
        let mut coeffs = Vec::with_capacity(roots.len() + 1);
        coeffs.push(T::one());
        for &r in roots {
            coeffs.push(T::zero());
            for k in (1..coeffs.len()).rev() {
                coeffs[k] = coeffs[k - 1] - r * coeffs[k];
            }
            coeffs[0] = -r * coeffs[0];
        }
        Poly::new(coeffs)
    }

    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Number of stored coefficients, i.e. degree + 1.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Coefficient of `x^k`, zero beyond the degree.
    pub fn coeff(&self, k: usize) -> T {
        self.coeffs.get(k).copied().unwrap_or_else(T::zero)
    }

    /// Coefficient of the highest power.
    pub fn leading(&self) -> T {
        self.coeffs.last().copied().unwrap_or_else(T::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| *c == T::zero())
    }

    /// Evaluates the polynomial at `x` with Horner's rule.
    pub fn eval(&self, x: T) -> T {
        self.coeffs
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }

    /// Evaluates the polynomial at a point of the complex plane.
    pub fn eval_complex(&self, x: Complex<T::Real>) -> Complex<T::Real> {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex::zero(), |acc, &c| acc * x + c.to_complex())
    }

    /// Applies `f` to every coefficient.
    pub fn map<U, F>(&self, f: F) -> Poly<U>
    where
        U: Coefficient,
        F: Fn(T) -> U,
    {
        Poly::new(self.coeffs.iter().map(|&c| f(c)).collect())
    }

    /// Finds the roots of the polynomial.
    ///
    /// See [`roots::roots`] for the guarantees on ordering and conjugate
    /// symmetry.
    pub fn roots(&self) -> Result<Vec<Complex<T::Real>>, PolyError> {
        roots::roots(&self.coeffs)
    }
}

impl<T> Mul<T> for Poly<T>
where
    T: Coefficient,
{
    type Output = Poly<T>;

    fn mul(self, k: T) -> Poly<T> {
        Poly::new(self.coeffs.into_iter().map(|c| c * k).collect())
    }
}

impl<T> Div<T> for Poly<T>
where
    T: Coefficient,
{
    type Output = Poly<T>;

    fn div(self, k: T) -> Poly<T> {
        Poly::new(self.coeffs.into_iter().map(|c| c / k).collect())
    }
}

impl<'a, T> Mul<&'a Poly<T>> for &'a Poly<T>
where
    T: Coefficient,
{
    type Output = Poly<T>;

    fn mul(self, other: &'a Poly<T>) -> Poly<T> {
        if self.is_empty() || other.is_empty() {
            return Poly::new(vec![]);
        }
        let mut coeffs = vec![T::zero(); self.len() + other.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] = coeffs[i + j] + a * b;
            }
        }
        Poly::new(coeffs)
    }
}

impl<T> Mul<Poly<T>> for Poly<T>
where
    T: Coefficient,
{
    type Output = Poly<T>;

    fn mul(self, other: Poly<T>) -> Poly<T> {
        &self * &other
    }
}
