//! Derived units: named linear views (multiplier + offset) of a dimension
//! vector, and the preference lists quantities keep of them.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::unit::{BaseUnit, UnitCombination};

/// Engineering prefixes understood by the unit catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prefix {
    Kilo,
    Deci,
    Centi,
    Milli,
    Micro,
    Nano,
    Pico,
}

impl Prefix {
    pub const ALL: [Prefix; 7] = [
        Prefix::Kilo,
        Prefix::Deci,
        Prefix::Centi,
        Prefix::Milli,
        Prefix::Micro,
        Prefix::Nano,
        Prefix::Pico,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Prefix::Kilo => "k",
            Prefix::Deci => "d",
            Prefix::Centi => "c",
            Prefix::Milli => "m",
            Prefix::Micro => "u",
            Prefix::Nano => "n",
            Prefix::Pico => "p",
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            Prefix::Kilo => 1e3,
            Prefix::Deci => 1e-1,
            Prefix::Centi => 1e-2,
            Prefix::Milli => 1e-3,
            Prefix::Micro => 1e-6,
            Prefix::Nano => 1e-9,
            Prefix::Pico => 1e-12,
        }
    }
}

impl FromStr for Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Prefix::ALL
            .into_iter()
            .find(|p| p.symbol() == s)
            .ok_or_else(|| Error::UnknownPrefix(s.to_string()))
    }
}

/// A named linear transform of a dimension vector.
///
/// A raw value `x` in base units reads as `x / multiplier - offset` in this
/// unit; entering `y` in this unit stores `y * multiplier + offset`.
#[derive(Clone, Debug)]
pub struct DerivedUnit {
    identifier: String,
    multiplier: f64,
    offset: f64,
    exponents: UnitCombination,
}

impl DerivedUnit {
    pub fn new(
        identifier: impl Into<String>,
        multiplier: f64,
        offset: f64,
        exponents: UnitCombination,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            multiplier,
            offset,
            exponents: exponents.simplified(),
        }
    }

    /// `prefix` applied to a base unit, e.g. `mg` from `g`.
    pub fn prefixed(base: &BaseUnit, prefix: Prefix) -> Self {
        Self::new(
            format!("{}{}", prefix.symbol(), base.identifier()),
            prefix.factor(),
            0.0,
            UnitCombination::single(base.clone(), 1),
        )
    }

    /// `prefix` applied to this unit, e.g. `kDa` from `Da`. The offset is kept.
    pub fn with_prefix(&self, prefix: Prefix) -> Self {
        Self {
            identifier: format!("{}{}", prefix.symbol(), self.identifier),
            multiplier: self.multiplier * prefix.factor(),
            offset: self.offset,
            exponents: self.exponents.clone(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn exponents(&self) -> &UnitCombination {
        &self.exponents
    }

    pub fn covers(&self, unit: &BaseUnit) -> bool {
        self.exponents.contains(unit)
    }

    /// Two derived units are compatible when they share no base unit.
    pub fn is_compatible(&self, other: &DerivedUnit) -> bool {
        !self
            .exponents
            .iter()
            .any(|e| other.exponents.contains(&e.unit))
    }

    /// Convert a raw magnitude into this unit raised to `power`.
    pub fn from_raw(&self, mut number: f64, power: i32) -> f64 {
        for _ in 0..power.max(0) {
            number /= self.multiplier;
            number -= self.offset;
        }
        for _ in power.min(0)..0 {
            number += self.offset;
            number *= self.multiplier;
        }
        number
    }

    /// Convert a magnitude entered in this unit into its raw representation.
    pub fn to_raw(&self, number: f64) -> f64 {
        number * self.multiplier + self.offset
    }
}

impl PartialEq for DerivedUnit {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl fmt::Display for DerivedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.identifier)
    }
}

/// Ordered display preferences. No two entries share a base unit as long as
/// entries are only added through [`DerivedUnitList::prefer`] and
/// [`DerivedUnitList::merge`].
#[derive(Clone, Debug, Default)]
pub struct DerivedUnitList(Vec<DerivedUnit>);

impl DerivedUnitList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DerivedUnit> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `unit` shares no base unit with any entry.
    pub fn is_compatible(&self, unit: &DerivedUnit) -> bool {
        self.0.iter().all(|d| d.is_compatible(unit))
    }

    /// Make `unit` the preference for its base units, evicting every entry
    /// that overlaps it.
    pub fn prefer(&mut self, unit: &DerivedUnit) {
        self.0
            .retain(|d| !d.exponents().has_overlap(unit.exponents()));
        self.0.push(unit.clone());
    }

    /// Drop every entry that references `unit`.
    pub fn forget(&mut self, unit: &BaseUnit) {
        self.0.retain(|d| !d.covers(unit));
    }

    /// `self` followed by the entries of `other` that do not collide with
    /// anything already kept. Entries of `self` win.
    pub fn merge(&self, other: &DerivedUnitList) -> DerivedUnitList {
        let mut out = self.clone();
        for unit in other.iter() {
            if out.is_compatible(unit) {
                out.0.push(unit.clone());
            }
        }
        out
    }
}

impl FromIterator<DerivedUnit> for DerivedUnitList {
    fn from_iter<T: IntoIterator<Item = DerivedUnit>>(iter: T) -> Self {
        let mut out = DerivedUnitList::new();
        for unit in iter {
            out.prefer(&unit);
        }
        out
    }
}

impl<'a> IntoIterator for &'a DerivedUnitList {
    type Item = &'a DerivedUnit;
    type IntoIter = std::slice::Iter<'a, DerivedUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
