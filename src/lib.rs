//! Digital filter coefficients in zero-pole-gain, transfer function, biquad
//! and second-order-sections form, and the conversions between them.
//!
//! Designing a filter and running samples through it are left to the
//! callers; this crate only holds and converts the coefficients.
//!
//! # Example
//!
//! ```
//! use filter_coeffs::prelude::*;
//! use num::Complex;
//!
//! // A resonator with a pair of zeros at +/-1 and poles near the unit circle.
//! let p = Complex::from_polar(0.9, 0.5);
//! let zpk = ZpkFilter::new(
//!     vec![Complex::new(1.0, 0.0), Complex::new(-1.0, 0.0)],
//!     vec![p, p.conj()],
//!     0.1,
//! );
//! let sos = convert(FilterForm::SecondOrderSections, &Filter::Zpk(zpk)).unwrap();
//! let tf = sos.convert(FilterForm::TransferFunction).unwrap();
//! match tf {
//!     Filter::Tf(tf) => assert_eq!(tf.denominator_coefficients().len(), 3),
//!     _ => unreachable!(),
//! }
//! ```

pub mod filter;
pub mod poly;
pub mod prelude;
pub mod util;
