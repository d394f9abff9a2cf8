//! examples of usage of RustedPolyTensor
/// polynomial functions: construction, algebra, calculus, total derivative, series and parsing
pub mod poly_examples;
