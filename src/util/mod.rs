//! Numeric helpers shared by the polynomial engine and the filter forms.

/// The coefficient trait and some basic math functions used elsewhere in
/// the project
pub mod math;
