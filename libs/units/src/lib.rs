//! Dimensional algebra for unitdc.
//!
//! Quantities carry their magnitude in raw base units together with a
//! [`UnitCombination`] (integer exponents over base units) and a list of
//! preferred [`DerivedUnit`]s that only affect how they are displayed.

#![forbid(unsafe_code)]

mod derived;
mod error;
mod format;
mod quantity;
mod registry;
mod unit;

pub use derived::{DerivedUnit, DerivedUnitList, Prefix};
pub use error::{Error, ExponentOverflow, IncompatibleUnits, Result};
pub use format::{FormattedQuantity, UnitDisplay};
pub use quantity::Quantity;
pub use registry::{
    BaseUnitDecl, DerivedUnitDecl, Registry, RegistryBuilder, UnitDeclarations, UnitRef,
    DIMENSIONLESS,
};
pub use unit::{BaseUnit, UnitCombination, UnitExponent};
