//! Base units and the dimension vectors built from them.
//!
//! A [`UnitCombination`] is a list of base units raised to integer powers.
//! Most operations first bring it into canonical form (see
//! [`UnitCombination::simplify`]): one entry per base unit, no zero exponents,
//! ordered by exponent descending and then by unit id descending.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

/// An indivisible unit of measure. Identity is the numeric `id`.
#[derive(Clone, Debug)]
pub struct BaseUnit {
    identifier: String,
    id: u32,
}

impl BaseUnit {
    pub fn new(identifier: impl Into<String>, id: u32) -> Self {
        Self {
            identifier: identifier.into(),
            id,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl PartialEq for BaseUnit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BaseUnit {}

impl Hash for BaseUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.identifier)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitExponent {
    pub unit: BaseUnit,
    pub exponent: i32,
}

impl UnitExponent {
    pub fn new(unit: BaseUnit, exponent: i32) -> Self {
        Self { unit, exponent }
    }
}

/// Canonical order: exponent descending, then unit id descending.
fn canonical_order(a: &UnitExponent, b: &UnitExponent) -> Ordering {
    b.exponent
        .cmp(&a.exponent)
        .then_with(|| b.unit.id.cmp(&a.unit.id))
}

/// A dimension vector.
///
/// The raw entry list may be un-simplified (e.g. right after
/// [`UnitCombination::concat`]). Equality (`==`) compares canonical forms, so
/// `g·l·g⁻¹` equals `l`.
#[derive(Clone, Debug, Default)]
pub struct UnitCombination(SmallVec<[UnitExponent; 4]>);

impl UnitCombination {
    /// The dimensionless combination.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(unit: BaseUnit, exponent: i32) -> Self {
        let mut entries = SmallVec::new();
        entries.push(UnitExponent::new(unit, exponent));
        Self(entries)
    }

    pub fn push(&mut self, unit: BaseUnit, exponent: i32) {
        self.0.push(UnitExponent::new(unit, exponent));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnitExponent> {
        self.0.iter()
    }

    /// Number of raw entries, which is only meaningful once simplified.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of the exponents recorded for `unit`, or `None` if it does not appear.
    pub fn exponent_of(&self, unit: &BaseUnit) -> Option<i32> {
        self.0
            .iter()
            .filter(|e| e.unit == *unit)
            .map(|e| e.exponent)
            .reduce(i32::saturating_add)
    }

    pub fn contains(&self, unit: &BaseUnit) -> bool {
        self.0.iter().any(|e| e.unit == *unit)
    }

    /// Merge exponents per base unit, drop zeros and sort canonically.
    ///
    /// Merged exponents saturate at the `i32` bounds; arithmetic on
    /// quantities goes through [`checked_product`](Self::checked_product)
    /// instead, which reports overflow.
    pub fn simplify(&mut self) {
        let entries = std::mem::take(&mut self.0);
        self.0 = merge_entries(entries, |a, b| Some(a.saturating_add(b))).unwrap_or_default();
    }

    pub fn simplified(&self) -> Self {
        let mut out = self.clone();
        out.simplify();
        out
    }

    /// Negate every exponent in place. `i32::MIN` saturates to `i32::MAX`.
    pub fn invert(&mut self) {
        for entry in self.0.iter_mut() {
            entry.exponent = entry.exponent.saturating_neg();
        }
    }

    pub fn inverted(&self) -> Self {
        let mut out = self.clone();
        out.invert();
        out
    }

    /// Concatenate two combinations without simplifying.
    pub fn concat(&self, other: &UnitCombination) -> Self {
        let mut out = self.clone();
        out.0.extend(other.0.iter().cloned());
        out
    }

    /// `self · other`, simplified. `None` if a merged exponent leaves the
    /// `i32` range.
    pub fn checked_product(&self, other: &UnitCombination) -> Option<Self> {
        merge_entries(self.concat(other).0, i32::checked_add).map(Self)
    }

    /// `self · other⁻¹`, simplified, with the same overflow rule as
    /// [`checked_product`](Self::checked_product).
    pub fn checked_quotient(&self, other: &UnitCombination) -> Option<Self> {
        if other.iter().any(|e| e.exponent == i32::MIN) {
            return None;
        }
        self.checked_product(&other.inverted())
    }

    /// True when the combination reduces to nothing.
    pub fn is_no_unit(&self) -> bool {
        self.simplified().is_empty()
    }

    /// Canonical-form equality.
    pub fn equal(&self, other: &UnitCombination) -> bool {
        self.simplified().0 == other.simplified().0
    }

    /// True when any base unit appears (with a non-zero net exponent) in both.
    pub fn has_overlap(&self, other: &UnitCombination) -> bool {
        let other = other.simplified();
        self.simplified()
            .iter()
            .any(|e| other.contains(&e.unit))
    }

    /// Express `source` as `self^k` times a remainder.
    ///
    /// `self` is the target pattern and is expected to be simplified. Returns
    /// the simplified remainder and `k`; `k == 0` means no match, in which case
    /// the remainder is simply `source` simplified.
    ///
    /// Every target unit must be present in `source`, and each yields a
    /// candidate `k` by truncating division. The smallest positive and the
    /// smallest-magnitude negative candidates are tracked separately; a zero
    /// candidate, or candidates of both signs, mean no match.
    pub fn derive(&self, source: &UnitCombination) -> (UnitCombination, i32) {
        let mut remain = source.simplified();

        let mut min_positive = 0;
        let mut max_negative = 0;
        for target in self.iter() {
            let Some(found) = remain.exponent_of(&target.unit) else {
                return (remain, 0);
            };
            let Some(candidate) = found.checked_div(target.exponent) else {
                return (remain, 0);
            };
            match candidate.cmp(&0) {
                Ordering::Greater => {
                    if min_positive == 0 || candidate < min_positive {
                        min_positive = candidate;
                    }
                }
                Ordering::Less => {
                    if max_negative == 0 || candidate > max_negative {
                        max_negative = candidate;
                    }
                }
                Ordering::Equal => return (remain, 0),
            }
        }

        let k = match (min_positive, max_negative) {
            (0, negative) => negative,
            (positive, 0) => positive,
            _ => return (remain, 0),
        };
        if k == 0 {
            return (remain, 0);
        }

        for entry in remain.0.iter_mut() {
            if let Some(target_exponent) = self.exponent_of(&entry.unit) {
                entry.exponent -= target_exponent * k;
            }
        }
        remain.simplify();
        (remain, k)
    }

    /// Take the `n`-th root of the dimension: every simplified exponent must be
    /// divisible by `n`.
    pub fn root(&self, n: i32) -> Option<Self> {
        let mut out = self.simplified();
        for entry in out.0.iter_mut() {
            if entry.exponent % n != 0 {
                return None;
            }
            entry.exponent /= n;
        }
        Some(out)
    }
}

/// Sum exponents per base unit with `add`, drop zeros and sort canonically.
/// `None` as soon as `add` does.
fn merge_entries<I>(
    entries: I,
    add: impl Fn(i32, i32) -> Option<i32>,
) -> Option<SmallVec<[UnitExponent; 4]>>
where
    I: IntoIterator<Item = UnitExponent>,
{
    let mut merged: SmallVec<[UnitExponent; 4]> = SmallVec::new();
    for entry in entries {
        match merged.iter_mut().find(|m| m.unit == entry.unit) {
            Some(existing) => existing.exponent = add(existing.exponent, entry.exponent)?,
            None => merged.push(entry),
        }
    }
    merged.retain(|e| e.exponent != 0);
    merged.sort_by(canonical_order);
    Some(merged)
}

impl PartialEq for UnitCombination {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for UnitCombination {}

impl FromIterator<UnitExponent> for UnitCombination {
    fn from_iter<T: IntoIterator<Item = UnitExponent>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a UnitCombination {
    type Item = &'a UnitExponent;
    type IntoIter = std::slice::Iter<'a, UnitExponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders the canonical form, e.g. `(mol)(l)-1`, or `(1)` when dimensionless.
impl fmt::Display for UnitCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simplified = self.simplified();
        if simplified.is_empty() {
            return f.write_str("(1)");
        }
        for entry in simplified.iter() {
            write!(f, "{}", entry.unit)?;
            if entry.exponent != 1 {
                write!(f, "{}", entry.exponent)?;
            }
        }
        Ok(())
    }
}
