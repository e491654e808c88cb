//! This module provides an easy single import for those using this crate.

pub use crate::filter::response::FrequencyResponse;
pub use crate::filter::{
    convert, BiquadFilter, Filter, FilterError, FilterForm, SosFilter, TfFilter, Zpk, ZpkFilter,
};
pub use crate::poly::{Poly, PolyError};
pub use crate::util::math::{Coefficient, RealCoefficient};
