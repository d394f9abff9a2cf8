//! Error type shared by every layer of the crate: scalar arithmetic, the tensor
//! engine, the polynomial functions, the total-derivative solver and the text
//! front-ends (expression parser, configuration document parser, logger setup).
use std::fmt;

/// Result alias used by all fallible operations of the crate
pub type CalcResult<T> = Result<T, CalcError>;

/// Error types for the polynomial/tensor engine
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// wrong number of arguments passed to a function evaluation
    Domain { expected: usize, got: usize },
    /// scalar division by a zero-magnitude value
    DivisionByZero,
    /// operation that has no polynomial result (negative powers, division by a function)
    UnsupportedOperation(String),
    /// cycle found in the dependency graph of a total derivative
    CyclicDependency { mode: usize },
    /// structurally incompatible shapes
    InvalidShape(String),
    /// mode (variable index) outside of the function arity
    InvalidMode { mode: usize, arity: usize },
    /// malformed expression or configuration text
    Parse(String),
    /// failure to open a log file
    Io(String),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalcError::Domain { expected, got } => write!(
                f,
                "Domain error: function expects {} arguments, got {}",
                expected, got
            ),
            CalcError::DivisionByZero => write!(f, "Division by zero"),
            CalcError::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {}", msg),
            CalcError::CyclicDependency { mode } => {
                write!(f, "Cyclic dependency detected at mode {}", mode)
            }
            CalcError::InvalidShape(msg) => write!(f, "Invalid shape: {}", msg),
            CalcError::InvalidMode { mode, arity } => write!(
                f,
                "Invalid mode {} for function of {} arguments",
                mode, arity
            ),
            CalcError::Parse(msg) => write!(f, "Parse error: {}", msg),
            CalcError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for CalcError {}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::Io(err.to_string())
    }
}
