//! Zero-pole-gain representation.
//!
//! A ZPK filter describes
//!
//! ```text
//! H(x) = k * (x - z[0]) * (x - z[1]) * ... / ((x - p[0]) * (x - p[1]) * ...)
//! ```
//!
//! Zeros and poles that coincide exactly cancel at construction, one unit of
//! multiplicity at a time.

use crate::filter::biquad::BiquadFilter;
use crate::filter::sos::SosFilter;
use crate::filter::tf::TfFilter;
use crate::filter::FilterError;
use crate::poly::Poly;
use crate::util::math::{self, Coefficient, ExactKey, RealCoefficient};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use log::{debug, trace};
use num::{Complex, Float, One, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Mul;

/// Filter stored as zeros `Z`, poles `P` and gain `K`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZpkFilter<Z, P, K> {
    zeros: Vec<Z>,
    poles: Vec<P>,
    gain: K,
}

impl<Z, P, K> ZpkFilter<Z, P, K>
where
    Z: Coefficient,
    P: Coefficient<Real = Z::Real>,
    K: Coefficient<Real = Z::Real>,
{
    /// Creates a new `ZpkFilter`, cancelling every zero against an equal
    /// pole.
    ///
    /// Equality is exact, no tolerance is applied. A zero of multiplicity
    /// two and a single equal pole leave one zero behind.
    ///
    /// # Arguments
    ///
    /// * `zeros` - Roots of the numerator.
    /// * `poles` - Roots of the denominator.
    /// * `gain` - Overall gain.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::ZpkFilter;
    ///
    /// let zpk = ZpkFilter::new(vec![2.0, 2.0], vec![2.0, 0.5], 3.0);
    /// assert_eq!(zpk.zeros(), &[2.0]);
    /// assert_eq!(zpk.poles(), &[0.5]);
    /// assert_eq!(zpk.gain(), 3.0);
    /// ```
    pub fn new(zeros: Vec<Z>, poles: Vec<P>, gain: K) -> ZpkFilter<Z, P, K> {
        let (zeros, poles) = cancel_common(zeros, poles);
        ZpkFilter { zeros, poles, gain }
    }

    pub fn zeros(&self) -> &[Z] {
        &self.zeros
    }

    pub fn poles(&self) -> &[P] {
        &self.poles
    }

    pub fn gain(&self) -> K {
        self.gain
    }

    /// Expands the filter into numerator and denominator polynomials.
    ///
    /// The products are formed in the complex plane and only their real
    /// parts are kept, so zeros and poles are expected to come in conjugate
    /// pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::ZpkFilter;
    ///
    /// let zpk = ZpkFilter::new(vec![-1.0], vec![0.5], 2.0);
    /// let tf = zpk.to_tf().unwrap();
    /// assert_eq!(tf.numerator_coefficients(), vec![2.0, 2.0]);
    /// assert_eq!(tf.denominator_coefficients(), vec![1.0, -0.5]);
    /// ```
    pub fn to_tf(&self) -> Result<TfFilter<Z::Real>, FilterError> {
        let zeros: Vec<Complex<Z::Real>> = self.zeros.iter().map(|z| z.to_complex()).collect();
        let poles: Vec<Complex<Z::Real>> = self.poles.iter().map(|p| p.to_complex()).collect();
        let numerator = Poly::from_roots(&zeros) * self.gain.to_complex();
        let denominator = Poly::from_roots(&poles);
        TfFilter::new(numerator.map(|c| c.re), denominator.map(|c| c.re))
    }

    /// Collapses the filter into a single biquad, through TF.
    pub fn to_biquad(&self) -> Result<BiquadFilter<Z::Real>, FilterError> {
        self.to_tf()?.to_biquad()
    }

    /// Splits the filter into second-order sections.
    ///
    /// Poles are ordered by their distance from the unit circle, farthest
    /// first, with complex poles ahead of real ones. Each zero is then
    /// assigned to the nearest pole not yet claimed, and consecutive pole
    /// pairs become a section together with the zeros assigned to them. An
    /// odd pole count leaves a last first-order section. The gain is kept
    /// on the returned `SosFilter` rather than spread over the sections.
    ///
    /// # Examples
    ///
    /// ```
    /// use filter_coeffs::filter::ZpkFilter;
    /// use num::Complex;
    ///
    /// let p = Complex::new(0.5, 0.5);
    /// let zpk = ZpkFilter::new(
    ///     vec![Complex::new(-1.0, 0.0), Complex::new(-1.0, 0.0)],
    ///     vec![p, p.conj(), Complex::new(0.2, 0.0)],
    ///     0.1,
    /// );
    /// let sos = zpk.to_sos().unwrap();
    /// assert_eq!(sos.sections().len(), 2);
    /// assert_eq!(sos.gain(), 0.1);
    /// ```
    pub fn to_sos(&self) -> Result<SosFilter<Z::Real, K>, FilterError> {
        if self.zeros.len() > self.poles.len() {
            return Err(FilterError::DimensionMismatch {
                zeros: self.zeros.len(),
                poles: self.poles.len(),
            });
        }

        let poles = order_poles(&self.poles);
        let zeros: Vec<Complex<Z::Real>> = self.zeros.iter().map(|z| z.to_complex()).collect();
        let slots = assign_zeros(&zeros, &poles);

        let mut sections = Vec::with_capacity((poles.len() + 1) / 2);
        for (ix, pair) in poles.chunks(2).enumerate() {
            let section_zeros: Vec<Complex<Z::Real>> = zeros
                .iter()
                .zip(slots.iter())
                .filter(|(_, slot)| **slot / 2 == ix)
                .map(|(z, _)| *z)
                .collect();
            let section = ZpkFilter::new(section_zeros, pair.to_vec(), Z::Real::one());
            sections.push(section.to_biquad()?);
        }
        debug!(
            "zpk to sos: {} zeros, {} poles, {} sections",
            self.zeros.len(),
            self.poles.len(),
            sections.len()
        );
        Ok(SosFilter::new(sections, self.gain))
    }
}

/// Sorts poles for pairing into sections.
///
/// A lexicographic sort puts conjugates next to each other, a stable sort by
/// distance from the unit circle (descending) follows, and complex poles are
/// moved ahead of real poles keeping their relative order.
fn order_poles<P>(poles: &[P]) -> Vec<Complex<P::Real>>
where
    P: Coefficient,
{
    let mut sorted: Vec<Complex<P::Real>> = poles.iter().map(|p| p.to_complex()).collect();
    sorted.sort_by(math::lexicographic);
    sorted.sort_by(|a, b| {
        unit_circle_distance(*b)
            .partial_cmp(&unit_circle_distance(*a))
            .unwrap_or(Ordering::Equal)
    });
    let (mut ordered, real): (Vec<_>, Vec<_>) = sorted
        .into_iter()
        .partition(|p| p.im != P::Real::zero());
    ordered.extend(real);
    trace!("pole order: {:?}", ordered);
    ordered
}

/// `||p| - 1|`
fn unit_circle_distance<R>(p: Complex<R>) -> R
where
    R: RealCoefficient,
{
    Float::abs(p.modulus() - R::one())
}

/// Greedily assigns each zero, in order, the index of the nearest pole that
/// no earlier zero has claimed.
///
/// Expects no more zeros than poles.
fn assign_zeros<R>(zeros: &[Complex<R>], poles: &[Complex<R>]) -> Vec<usize>
where
    R: RealCoefficient,
{
    let mut claimed = vec![false; poles.len()];
    let mut slots = Vec::with_capacity(zeros.len());
    for z in zeros {
        let mut nearest: Option<(usize, R)> = None;
        for (ix, p) in poles.iter().enumerate() {
            if claimed[ix] {
                continue;
            }
            let dist = (*z - *p).modulus();
            if nearest.map_or(true, |(_, d)| dist < d) {
                nearest = Some((ix, dist));
            }
        }
        if let Some((ix, _)) = nearest {
            claimed[ix] = true;
            slots.push(ix);
        }
    }
    trace!("zero to pole slots: {:?}", slots);
    slots
}

/// Removes zero/pole pairs with exactly equal values.
///
/// Zeros are counted by value in order of first appearance; each pole
/// consumes one unit of a matching zero's count. When nothing cancels the
/// inputs are handed back untouched.
fn cancel_common<Z, P>(zeros: Vec<Z>, poles: Vec<P>) -> (Vec<Z>, Vec<P>)
where
    Z: Coefficient,
    P: Coefficient<Real = Z::Real>,
{
    if zeros.is_empty() || poles.is_empty() {
        return (zeros, poles);
    }

    let mut index: HashMap<ExactKey, usize> = HashMap::with_capacity(zeros.len());
    let mut counts: Vec<(Z, usize)> = Vec::new();
    for &z in &zeros {
        match index.entry(z.exact_key()) {
            Entry::Occupied(e) => counts[*e.get()].1 += 1,
            Entry::Vacant(e) => {
                e.insert(counts.len());
                counts.push((z, 1));
            }
        }
    }

    let mut keep = Vec::with_capacity(poles.len());
    let mut cancelled = 0;
    for p in &poles {
        let hit = match index.get(&p.exact_key()) {
            Some(&ix) => {
                let (z, n) = &mut counts[ix];
                if *n > 0 && z.to_complex() == p.to_complex() {
                    *n -= 1;
                    true
                } else {
                    false
                }
            }
            None => false,
        };
        if hit {
            cancelled += 1;
        }
        keep.push(!hit);
    }
    if cancelled == 0 {
        return (zeros, poles);
    }
    trace!("cancelled {} zero/pole pairs", cancelled);

    let zeros = counts
        .into_iter()
        .flat_map(|(z, n)| std::iter::repeat(z).take(n))
        .collect();
    let poles = poles
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| if k { Some(p) } else { None })
        .collect();
    (zeros, poles)
}

impl<Z, P, K> Mul<K> for ZpkFilter<Z, P, K>
where
    K: Coefficient,
{
    type Output = ZpkFilter<Z, P, K>;

    /// Scales the gain.
    fn mul(self, k: K) -> ZpkFilter<Z, P, K> {
        ZpkFilter {
            zeros: self.zeros,
            poles: self.poles,
            gain: self.gain * k,
        }
    }
}

impl<Z, P, K> Mul<ZpkFilter<Z, P, K>> for ZpkFilter<Z, P, K>
where
    Z: Coefficient,
    P: Coefficient<Real = Z::Real>,
    K: Coefficient<Real = Z::Real>,
{
    type Output = ZpkFilter<Z, P, K>;

    /// Cascades two filters: zeros and poles are concatenated, cancelling
    /// where they meet, and the gains multiply.
    fn mul(self, other: ZpkFilter<Z, P, K>) -> ZpkFilter<Z, P, K> {
        let mut zeros = self.zeros;
        zeros.extend(other.zeros);
        let mut poles = self.poles;
        poles.extend(other.poles);
        ZpkFilter::new(zeros, poles, self.gain * other.gain)
    }
}
