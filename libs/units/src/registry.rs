//! The unit catalog a calculator session resolves identifiers against.
//!
//! A [`Registry`] is assembled once (see [`RegistryBuilder`]) and is read-only
//! afterwards, so it can be shared between sessions behind an `Arc`.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::derived::{DerivedUnit, Prefix};
use crate::error::{Error, Result};
use crate::unit::{BaseUnit, UnitCombination};

/// Identifier that marks a quantity as dimensionless.
pub const DIMENSIONLESS: &str = "1";

/// What a unit identifier resolves to.
#[derive(Clone, Copy, Debug)]
pub enum UnitRef<'a> {
    Dimensionless,
    Base(&'a BaseUnit),
    Derived(&'a DerivedUnit),
}

#[derive(Clone, Debug, Default)]
pub struct Registry {
    base_units: Vec<BaseUnit>,
    derived_units: Vec<DerivedUnit>,
}

impl Registry {
    /// The built-in catalog of laboratory units.
    pub fn builtin() -> Self {
        let builder = RegistryBuilder::seeded();
        Self {
            base_units: builder.base_units,
            derived_units: builder.derived_units,
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::seeded()
    }

    pub fn lookup(&self, identifier: &str) -> Option<UnitRef<'_>> {
        if identifier == DIMENSIONLESS {
            return Some(UnitRef::Dimensionless);
        }
        if let Some(derived) = self.derived_unit(identifier) {
            return Some(UnitRef::Derived(derived));
        }
        self.base_unit(identifier).map(UnitRef::Base)
    }

    pub fn base_unit(&self, identifier: &str) -> Option<&BaseUnit> {
        self.base_units
            .iter()
            .find(|u| u.identifier() == identifier)
    }

    pub fn derived_unit(&self, identifier: &str) -> Option<&DerivedUnit> {
        self.derived_units
            .iter()
            .find(|u| u.identifier() == identifier)
    }

    pub fn base_units(&self) -> &[BaseUnit] {
        &self.base_units
    }

    pub fn derived_units(&self) -> &[DerivedUnit] {
        &self.derived_units
    }
}

/// A base unit declared outside the built-in catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BaseUnitDecl {
    pub identifier: String,
    pub id: u32,
}

/// A derived unit declared outside the built-in catalog.
///
/// `exponents` maps base-unit identifiers to their power. Every symbol in
/// `prefixes` yields one more unit named `prefix + identifier`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DerivedUnitDecl {
    pub identifier: String,
    #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
    pub multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: f64,
    pub exponents: BTreeMap<String, i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefixes: Vec<String>,
}

#[cfg(feature = "serde")]
fn default_multiplier() -> f64 {
    1.0
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitDeclarations {
    pub base: Vec<BaseUnitDecl>,
    pub derived: Vec<DerivedUnitDecl>,
}

/// Collects units and validates the catalog as a whole on [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    base_units: Vec<BaseUnit>,
    derived_units: Vec<DerivedUnit>,
}

impl RegistryBuilder {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in base units `g l iu m mol` and their derived units.
    pub fn seeded() -> Self {
        let gram = BaseUnit::new("g", 1);
        let liter = BaseUnit::new("l", 2);
        let iu = BaseUnit::new("iu", 3);
        let meter = BaseUnit::new("m", 4);
        let mole = BaseUnit::new("mol", 5);

        let mut dalton = UnitCombination::single(gram.clone(), 1);
        dalton.push(mole.clone(), -1);
        let dalton = DerivedUnit::new("Da", 1.0, 0.0, dalton);

        let mut molar = UnitCombination::single(mole.clone(), 1);
        molar.push(liter.clone(), -1);
        let molar = DerivedUnit::new("M", 1.0, 0.0, molar);

        use Prefix::*;
        let mut builder = Self::new();
        builder
            .derived_unit(dalton.clone())
            .derived_prefixes(&dalton, &[Kilo])
            .derived_unit(molar.clone())
            .derived_prefixes(&molar, &[Milli, Micro, Nano, Pico])
            .base_prefixes(&gram, &[Milli, Micro, Nano, Pico])
            .base_prefixes(&liter, &[Deci, Milli, Micro, Nano])
            .base_prefixes(&meter, &[Centi, Milli, Micro, Nano])
            .base_prefixes(&mole, &[Milli, Micro, Nano, Pico]);
        for unit in [gram, liter, iu, meter, mole] {
            builder.base_unit(unit);
        }
        builder
    }

    pub fn base_unit(&mut self, unit: BaseUnit) -> &mut Self {
        self.base_units.push(unit);
        self
    }

    pub fn derived_unit(&mut self, unit: DerivedUnit) -> &mut Self {
        self.derived_units.push(unit);
        self
    }

    /// Add `prefix + base` for every prefix.
    pub fn base_prefixes(&mut self, base: &BaseUnit, prefixes: &[Prefix]) -> &mut Self {
        for &prefix in prefixes {
            self.derived_units.push(DerivedUnit::prefixed(base, prefix));
        }
        self
    }

    /// Add `prefix + unit` for every prefix.
    pub fn derived_prefixes(&mut self, unit: &DerivedUnit, prefixes: &[Prefix]) -> &mut Self {
        for &prefix in prefixes {
            self.derived_units.push(unit.with_prefix(prefix));
        }
        self
    }

    /// Add user-declared units. Base declarations are registered first so
    /// derived declarations may reference them.
    pub fn declare(&mut self, decls: &UnitDeclarations) -> Result<&mut Self> {
        for decl in &decls.base {
            self.base_unit(BaseUnit::new(decl.identifier.clone(), decl.id));
        }

        for decl in &decls.derived {
            if !decl.multiplier.is_finite() || decl.multiplier == 0.0 {
                return Err(Error::InvalidMultiplier(decl.identifier.clone()));
            }

            let mut exponents = UnitCombination::none();
            for (identifier, &exponent) in &decl.exponents {
                let unit = self
                    .base_units
                    .iter()
                    .find(|u| u.identifier() == identifier)
                    .cloned()
                    .ok_or_else(|| Error::UnknownBaseUnit(identifier.clone()))?;
                exponents.push(unit, exponent);
            }
            if exponents.is_no_unit() {
                return Err(Error::EmptyDimension(decl.identifier.clone()));
            }

            let unit = DerivedUnit::new(
                decl.identifier.clone(),
                decl.multiplier,
                decl.offset,
                exponents,
            );
            let prefixes = decl
                .prefixes
                .iter()
                .map(|symbol| symbol.parse::<Prefix>())
                .collect::<Result<Vec<_>>>()?;
            self.derived_prefixes(&unit, &prefixes);
            self.derived_unit(unit);
        }
        Ok(self)
    }

    /// Validate and freeze the catalog.
    ///
    /// Identifiers must be unique across base and derived units and must not
    /// shadow the dimensionless marker; base-unit ids must be unique.
    pub fn build(&self) -> Result<Registry> {
        let mut ids: HashMap<u32, &str> = HashMap::new();
        for unit in &self.base_units {
            if let Some(first) = ids.insert(unit.id(), unit.identifier()) {
                return Err(Error::DuplicateId {
                    id: unit.id(),
                    first: first.to_string(),
                    second: unit.identifier().to_string(),
                });
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let identifiers = self
            .base_units
            .iter()
            .map(BaseUnit::identifier)
            .chain(self.derived_units.iter().map(DerivedUnit::identifier));
        for identifier in identifiers {
            if identifier == DIMENSIONLESS {
                return Err(Error::ReservedIdentifier(identifier.to_string()));
            }
            if !seen.insert(identifier) {
                return Err(Error::DuplicateIdentifier(identifier.to_string()));
            }
        }

        tracing::debug!(
            base_units = self.base_units.len(),
            derived_units = self.derived_units.len(),
            "unit registry built"
        );

        Ok(Registry {
            base_units: self.base_units.clone(),
            derived_units: self.derived_units.clone(),
        })
    }
}
