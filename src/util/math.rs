use num::{Complex, Float, Num};
use num_traits::NumCast;
use std::fmt::Debug;
use std::ops::Neg;

/// Key identifying a coefficient by its exact value.
///
/// Holds the bit patterns of the real and imaginary parts, with `-0.0`
/// folded onto `0.0` so that numerically equal values share a key.
pub type ExactKey = (u64, u64);

/// Numeric element type of filter coefficients, zeros, poles and gains.
///
/// Implemented for the real floats `f32`, `f64` and their complex
/// counterparts. Every value can be lifted into `Complex<Self::Real>`,
/// which is the common ground used by root finding and pole-zero pairing.
pub trait Coefficient:
    Copy + PartialEq + Debug + Num + Neg<Output = Self> + Send + Sync + 'static
{
    /// The real component type.
    type Real: RealCoefficient;

    /// Real part of the value.
    fn re(self) -> Self::Real;

    /// Imaginary part of the value, always zero for real types.
    fn im(self) -> Self::Real;

    /// Complex conjugate; the identity on real types.
    fn conj(self) -> Self;

    /// Absolute value (complex modulus).
    fn modulus(self) -> Self::Real;

    /// Lifts the value into the complex plane.
    fn to_complex(self) -> Complex<Self::Real>;

    /// Builds a value from a real number.
    fn from_real(re: Self::Real) -> Self;

    /// The key used to count values by exact equality.
    fn exact_key(self) -> ExactKey;
}

/// A real floating point `Coefficient`.
pub trait RealCoefficient: Coefficient<Real = Self> + Float {
    /// Bit pattern of the value widened to 64 bits, with `-0.0` mapped to
    /// the pattern of `0.0`.
    fn key_bits(self) -> u64;
}

macro_rules! impl_real_coefficient {
    ($t:ty) => {
        impl Coefficient for $t {
            type Real = $t;

            fn re(self) -> $t {
                self
            }

            fn im(self) -> $t {
                0.0
            }

            fn conj(self) -> $t {
                self
            }

            fn modulus(self) -> $t {
                self.abs()
            }

            fn to_complex(self) -> Complex<$t> {
                Complex::new(self, 0.0)
            }

            fn from_real(re: $t) -> $t {
                re
            }

            fn exact_key(self) -> ExactKey {
                (self.key_bits(), (0.0 as $t).key_bits())
            }
        }

        impl RealCoefficient for $t {
            fn key_bits(self) -> u64 {
                if self == 0.0 {
                    <u64 as From<_>>::from((0.0 as $t).to_bits())
                } else {
                    <u64 as From<_>>::from(self.to_bits())
                }
            }
        }
    };
}

impl_real_coefficient!(f32);
impl_real_coefficient!(f64);

impl<R> Coefficient for Complex<R>
where
    R: RealCoefficient,
{
    type Real = R;

    fn re(self) -> R {
        self.re
    }

    fn im(self) -> R {
        self.im
    }

    fn conj(self) -> Complex<R> {
        Complex::new(self.re, -self.im)
    }

    fn modulus(self) -> R {
        self.re.hypot(self.im)
    }

    fn to_complex(self) -> Complex<R> {
        self
    }

    fn from_real(re: R) -> Complex<R> {
        Complex::new(re, R::zero())
    }

    fn exact_key(self) -> ExactKey {
        (self.re.key_bits(), self.im.key_bits())
    }
}

/// Casts a Complex<T> to a Complex<U>. All of the normal caveats with using
/// the `as` keyword apply here for the conversion.
pub fn cast_complex<T, U>(input: &Complex<T>) -> Option<Complex<U>>
where
    T: Clone + Num + NumCast,
    U: Clone + Num + NumCast,
{
    let re = U::from(input.re.clone())?;
    let im = U::from(input.im.clone())?;
    Some(Complex::new(re, im))
}

/// Lexicographic order on complex values: real part, then imaginary part.
///
/// NaN components compare equal to everything so that sorting stays total.
pub fn lexicographic<R: RealCoefficient>(
    a: &Complex<R>,
    b: &Complex<R>,
) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    a.re.partial_cmp(&b.re)
        .unwrap_or(Ordering::Equal)
        .then(a.im.partial_cmp(&b.im).unwrap_or(Ordering::Equal))
}
