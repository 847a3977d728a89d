//! Error types for the unitdc stack machine

use thiserror::Error;
use unitdc_units::{ExponentOverflow, IncompatibleUnits, UnitCombination};

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Per-token evaluation errors. None of them is fatal to the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid operation: stack empty")]
    EmptyStack,

    #[error("invalid operation: {0}")]
    IncompatibleUnit(#[from] IncompatibleUnits),

    #[error("invalid operation: {0}")]
    ExponentOverflow(#[from] ExponentOverflow),

    #[error("invalid operation: unknown operation {0}")]
    UnknownOperation(String),

    #[error("invalid operation: unknown unit identifier {0}")]
    UnknownUnit(String),

    #[error("could not interpret numeric literal {literal}: {reason}")]
    InvalidNumber {
        literal: String,
        reason: NumberError,
    },

    #[error("unknown token: {0}")]
    UnknownToken(String),

    #[error("output error: {0}")]
    Output(String),
}

impl Error {
    /// The dimensions involved in an incompatible-unit failure.
    pub fn incompatible_units(&self) -> Option<(Option<&UnitCombination>, &UnitCombination)> {
        match self {
            Error::IncompatibleUnit(e) => Some((e.target.as_ref(), &e.offending)),
            _ => None,
        }
    }
}

/// Why a numeric literal was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    #[error("more than one exponent notation")]
    MultipleExponents,

    #[error("exponent {0} is not valid")]
    InvalidExponent(String),

    #[error("base {0} is not valid")]
    InvalidMantissa(String),
}
