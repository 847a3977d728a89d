use crate::derived::{DerivedUnit, DerivedUnitList};
use crate::error::{ExponentOverflow, IncompatibleUnits};
use crate::unit::{BaseUnit, UnitCombination};

/// A magnitude in raw base units, its dimension, and how to display it.
#[derive(Clone, Debug, Default)]
pub struct Quantity {
    pub number: f64,
    pub combination: UnitCombination,
    pub preferred: DerivedUnitList,
}

impl Quantity {
    pub fn dimensionless(number: f64) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn new(number: f64, combination: UnitCombination) -> Self {
        Self {
            number,
            combination,
            preferred: DerivedUnitList::new(),
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.combination.is_no_unit()
    }

    /// Addition. See [`Quantity::additive`] for the unit rules.
    pub fn try_add(&self, rhs: &Quantity) -> Result<Quantity, IncompatibleUnits> {
        self.additive(rhs, |a, b| a + b)
    }

    pub fn try_sub(&self, rhs: &Quantity) -> Result<Quantity, IncompatibleUnits> {
        self.additive(rhs, |a, b| a - b)
    }

    /// A dimensionless operand takes the other operand's dimension; otherwise
    /// both dimensions must be equal.
    fn additive(
        &self,
        rhs: &Quantity,
        op: impl FnOnce(f64, f64) -> f64,
    ) -> Result<Quantity, IncompatibleUnits> {
        let combination = match (self.is_dimensionless(), rhs.is_dimensionless()) {
            (true, _) => rhs.combination.simplified(),
            (false, true) => self.combination.simplified(),
            (false, false) if self.combination == rhs.combination => {
                self.combination.simplified()
            }
            (false, false) => {
                return Err(IncompatibleUnits {
                    target: Some(self.combination.simplified()),
                    offending: rhs.combination.simplified(),
                })
            }
        };
        Ok(Quantity {
            number: op(self.number, rhs.number),
            combination,
            preferred: self.preferred.merge(&rhs.preferred),
        })
    }

    /// Square root; every exponent must be even.
    pub fn try_sqrt(&self) -> Result<Quantity, IncompatibleUnits> {
        let combination = self.combination.root(2).ok_or_else(|| IncompatibleUnits {
            target: None,
            offending: self.combination.simplified(),
        })?;
        Ok(Quantity {
            number: self.number.sqrt(),
            combination,
            preferred: self.preferred.clone(),
        })
    }

    /// Drop the dimension. Display preferences are kept; they no longer match
    /// anything.
    pub fn clear_unit(&mut self) {
        self.combination = UnitCombination::none();
    }

    /// Apply a base unit: a dimensionless quantity becomes `unit¹`, and
    /// preferences involving `unit` are dropped.
    pub fn assign_base_unit(&mut self, unit: &BaseUnit) {
        if self.is_dimensionless() {
            self.combination = UnitCombination::single(unit.clone(), 1);
        }
        self.preferred.forget(unit);
    }

    /// Apply a derived unit: a dimensionless quantity is read as a value in
    /// `unit`, and `unit` becomes the display preference for its base units.
    pub fn assign_derived_unit(&mut self, unit: &DerivedUnit) {
        if self.is_dimensionless() {
            self.combination = unit.exponents().clone();
            self.number = unit.to_raw(self.number);
        }
        self.preferred.prefer(unit);
    }

    /// Multiply, merging display preferences. Fails only if a combined
    /// exponent leaves the `i32` range.
    pub fn try_mul(&self, rhs: &Quantity) -> Result<Quantity, ExponentOverflow> {
        let combination = self
            .combination
            .checked_product(&rhs.combination)
            .ok_or_else(|| self.overflow(rhs))?;
        Ok(Quantity {
            number: self.number * rhs.number,
            combination,
            preferred: self.preferred.merge(&rhs.preferred),
        })
    }

    pub fn try_div(&self, rhs: &Quantity) -> Result<Quantity, ExponentOverflow> {
        let combination = self
            .combination
            .checked_quotient(&rhs.combination)
            .ok_or_else(|| self.overflow(rhs))?;
        Ok(Quantity {
            number: self.number / rhs.number,
            combination,
            preferred: self.preferred.merge(&rhs.preferred),
        })
    }

    fn overflow(&self, rhs: &Quantity) -> ExponentOverflow {
        ExponentOverflow {
            left: self.combination.simplified(),
            right: rhs.combination.simplified(),
        }
    }
}
