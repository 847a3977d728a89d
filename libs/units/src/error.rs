use thiserror::Error;

use crate::unit::UnitCombination;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling a unit catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unit identifier '{0}' is declared more than once")]
    DuplicateIdentifier(String),

    #[error("base unit id {id} is used by both '{first}' and '{second}'")]
    DuplicateId {
        id: u32,
        first: String,
        second: String,
    },

    #[error("'{0}' is reserved for dimensionless quantities")]
    ReservedIdentifier(String),

    #[error("unknown base unit '{0}'")]
    UnknownBaseUnit(String),

    #[error("unknown engineering prefix '{0}'")]
    UnknownPrefix(String),

    #[error("derived unit '{0}' must have a finite, non-zero multiplier")]
    InvalidMultiplier(String),

    #[error("derived unit '{0}' does not reference any base unit")]
    EmptyDimension(String),
}

/// Two quantities whose dimensions cannot be reconciled.
///
/// `target` is the dimension the operation expected (absent when there is no
/// specific expectation, e.g. a square root), `offending` the one it got.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("incompatible units: {}", describe(.target, .offending))]
pub struct IncompatibleUnits {
    pub target: Option<UnitCombination>,
    pub offending: UnitCombination,
}

fn describe(target: &Option<UnitCombination>, offending: &UnitCombination) -> String {
    match target {
        Some(target) => format!("expected {target}, got {offending}"),
        None => format!("{offending}"),
    }
}

/// A dimension exponent left the `i32` range while combining two quantities.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unit exponent out of range combining {left} and {right}")]
pub struct ExponentOverflow {
    pub left: UnitCombination,
    pub right: UnitCombination,
}
