//! different utility modules used throughout the project
/// terminal and file logging with simplelog
pub mod logger;
/// parse a configuration document with structure like "render variables: x, y series terms: 12" into `CalcConfig`
pub mod config;
/// plain text, LaTeX and table forms of polynomial functions
pub mod render;
/// turns "f(x, y) = x^2 + 3xy" into a polynomial function
pub mod poly_parser;
