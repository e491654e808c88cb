//! Polynomial root finding.
//!
//! Roots at the origin are split off exactly and first and second degree
//! remainders are solved in closed form. Anything of higher degree is
//! solved as the eigenvalues of its companion matrix, through the Schur
//! decomposition in `nalgebra`, which is backward stable: multiplying the
//! roots back out reproduces the coefficients to working precision even
//! when roots are clustered. All of the work is done in `f64` and the roots
//! are cast back to the caller's precision.

use crate::poly::PolyError;
use crate::util::math::{self, Coefficient};
use log::{debug, trace};
use nalgebra::{DMatrix, Schur};
use num::{Complex, Zero};

/// Upper bound on QR sweeps of the Schur decomposition before giving up.
pub const MAX_ITERATIONS: usize = 10_000;

/// Deflation threshold of the Schur decomposition.
pub const TOLERANCE: f64 = std::f64::EPSILON;

/// Imaginary parts at or below this relative size are treated as rounding
/// noise on the roots of a real polynomial.
const REAL_AXIS_TOLERANCE: f64 = 1e-10;

type C64 = Complex<f64>;

/// Finds every root of the polynomial with coefficients `coeffs`, lowest
/// power first.
///
/// Roots at the origin come first, followed by the remaining roots. When
/// all coefficients are real, real roots are returned with an imaginary
/// part of exactly zero and complex roots as exact conjugate pairs.
///
/// # Arguments
///
/// * `coeffs` - Polynomial coefficients, `coeffs[k]` multiplying `x^k`.
///
/// # Examples
///
/// ```
/// use filter_coeffs::poly::roots::roots;
///
/// // x^2 - 3x + 2 = (x - 1)(x - 2)
/// let mut r = roots::<f64>(&[2.0, -3.0, 1.0]).unwrap();
/// r.sort_by(|a, b| a.re.partial_cmp(&b.re).unwrap());
/// assert!((r[0].re - 1.0).abs() < 1e-12 && r[0].im == 0.0);
/// assert!((r[1].re - 2.0).abs() < 1e-12 && r[1].im == 0.0);
/// ```
pub fn roots<T>(coeffs: &[T]) -> Result<Vec<Complex<T::Real>>, PolyError>
where
    T: Coefficient,
{
    let lifted = coeffs
        .iter()
        .map(|c| math::cast_complex::<T::Real, f64>(&c.to_complex()))
        .collect::<Option<Vec<C64>>>()
        .ok_or(PolyError::ConvertError)?;
    let real = lifted.iter().all(|c| c.im == 0.0);

    let end = match lifted.iter().rposition(|c| !c.is_zero()) {
        Some(ix) => ix + 1,
        None => return Err(PolyError::ZeroPolynomial),
    };
    let start = lifted.iter().position(|c| !c.is_zero()).unwrap_or(0);
    let reduced = &lifted[start..end];

    let mut found = vec![C64::zero(); start];
    let remaining = match reduced.len() - 1 {
        0 => vec![],
        1 => vec![-reduced[0] / reduced[1]],
        2 if real => real_quadratic(reduced[2].re, reduced[1].re, reduced[0].re),
        2 => complex_quadratic(reduced[2], reduced[1], reduced[0]),
        _ if real => {
            let re: Vec<f64> = reduced.iter().map(|c| c.re).collect();
            conjugate_symmetric(real_companion_roots(&re)?)
        }
        _ => complex_companion_roots(reduced)?,
    };
    found.extend(remaining);

    found
        .iter()
        .map(|r| math::cast_complex::<f64, T::Real>(r))
        .collect::<Option<Vec<_>>>()
        .ok_or(PolyError::ConvertError)
}

/// Roots of `a x^2 + b x + c` for real coefficients, using the cancellation
/// free form of the quadratic formula.
fn real_quadratic(a: f64, b: f64, c: f64) -> Vec<C64> {
    let disc = b * b - 4.0 * a * c;
    if disc >= 0.0 {
        let q = -0.5 * (b + b.signum() * disc.sqrt());
        let r1 = q / a;
        let r2 = if q == 0.0 { 0.0 } else { c / q };
        vec![C64::new(r1, 0.0), C64::new(r2, 0.0)]
    } else {
        let re = -b / (2.0 * a);
        let im = ((-disc).sqrt() / (2.0 * a)).abs();
        vec![C64::new(re, im), C64::new(re, -im)]
    }
}

fn complex_quadratic(a: C64, b: C64, c: C64) -> Vec<C64> {
    let mut d = (b * b - a * c * 4.0).sqrt();
    if (b - d).norm() > (b + d).norm() {
        d = -d;
    }
    let q = (b + d) * -0.5;
    if q.is_zero() {
        return vec![C64::zero(), C64::zero()];
    }
    vec![q / a, c / q]
}

/// Companion matrix of the polynomial `coeffs` (lowest power first, with a
/// nonzero leading coefficient): the normalized coefficients, negated and
/// highest power first, on the first row and ones on the subdiagonal.
fn companion<N>(coeffs: &[N]) -> DMatrix<N>
where
    N: nalgebra::ComplexField + Copy,
{
    let n = coeffs.len() - 1;
    let lead = coeffs[n];
    let mut m = DMatrix::<N>::zeros(n, n);
    for j in 0..n {
        m[(0, j)] = -coeffs[n - 1 - j] / lead;
    }
    for i in 1..n {
        m[(i, i - 1)] = N::one();
    }
    m
}

/// Orthogonal similarity `H m H` with a fixed Householder reflector.
///
/// Used when the QR iteration stalls on a companion matrix, as it does on
/// the scaled cyclic shift of `x^n + c` where every shift comes out zero.
fn reflect<N>(m: &DMatrix<N>) -> DMatrix<N>
where
    N: nalgebra::ComplexField + Copy,
{
    let n = m.nrows();
    let v: Vec<f64> = (0..n).map(|k| 1.0 / (k + 1) as f64).collect();
    let norm2: f64 = v.iter().map(|x| x * x).sum();
    let h = DMatrix::<N>::from_fn(n, n, |i, j| {
        let delta = if i == j { 1.0 } else { 0.0 };
        nalgebra::convert(delta - 2.0 * v[i] * v[j] / norm2)
    });
    &h * m * &h
}

/// Schur decomposition of the companion matrix of `coeffs`.
fn companion_schur<N>(coeffs: &[N]) -> Result<Schur<N, nalgebra::Dyn>, PolyError>
where
    N: nalgebra::ComplexField<RealField = f64> + Copy,
{
    let degree = coeffs.len() - 1;
    let m = companion(coeffs);
    if let Some(schur) = Schur::try_new(m.clone(), TOLERANCE, MAX_ITERATIONS) {
        return Ok(schur);
    }
    debug!("companion QR stalled at degree {}, retrying on a reflection", degree);
    Schur::try_new(reflect(&m), TOLERANCE, MAX_ITERATIONS).ok_or(PolyError::NoConvergence {
        degree,
        iterations: MAX_ITERATIONS,
    })
}

fn real_companion_roots(coeffs: &[f64]) -> Result<Vec<C64>, PolyError> {
    let schur = companion_schur(coeffs)?;
    trace!("companion roots: degree {} real polynomial", coeffs.len() - 1);
    Ok(schur.complex_eigenvalues().iter().copied().collect())
}

fn complex_companion_roots(coeffs: &[C64]) -> Result<Vec<C64>, PolyError> {
    let degree = coeffs.len() - 1;
    let schur = companion_schur(coeffs)?;
    trace!("companion roots: degree {} complex polynomial", degree);
    let eigenvalues = schur.eigenvalues().ok_or(PolyError::NoConvergence {
        degree,
        iterations: MAX_ITERATIONS,
    })?;
    Ok(eigenvalues.iter().copied().collect())
}

/// Snaps roots of a real polynomial onto the real axis and into exact
/// conjugate pairs.
///
/// Every root above the axis is paired with the nearest unclaimed mirror
/// image below it and both are replaced by the average pair. Roots left
/// without a partner are moved onto the real axis.
fn conjugate_symmetric(estimates: Vec<C64>) -> Vec<C64> {
    let threshold = |z: &C64| REAL_AXIS_TOLERANCE * z.norm().max(1.0);
    let mut upper = Vec::new();
    let mut lower = Vec::new();
    let mut out = Vec::with_capacity(estimates.len());
    for z in estimates {
        if z.im > threshold(&z) {
            upper.push(z);
        } else if z.im < -threshold(&z) {
            lower.push(z);
        } else {
            out.push(C64::new(z.re, 0.0));
        }
    }

    let mut taken = vec![false; lower.len()];
    for u in upper {
        let mirror = C64::new(u.re, -u.im);
        let mut best: Option<(usize, f64)> = None;
        for (j, l) in lower.iter().enumerate() {
            if taken[j] {
                continue;
            }
            let dist = (*l - mirror).norm();
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((j, dist));
            }
        }
        match best {
            Some((j, _)) => {
                taken[j] = true;
                let l = lower[j];
                let m = C64::new((u.re + l.re) * 0.5, (u.im - l.im) * 0.5);
                out.push(m);
                out.push(C64::new(m.re, -m.im));
            }
            None => out.push(C64::new(u.re, 0.0)),
        }
    }
    out.extend(
        lower
            .iter()
            .zip(taken)
            .filter(|(_, t)| !*t)
            .map(|(l, _)| C64::new(l.re, 0.0)),
    );
    out
}
