use std::cmp::Ordering;
use std::fmt;

use crate::quantity::Quantity;

/// One unit in a rendered quantity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnitDisplay {
    pub identifier: String,
    pub exponent: i32,
}

/// A quantity resolved against its preferred units, ready to print.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormattedQuantity {
    pub number: f64,
    pub units: Vec<UnitDisplay>,
}

impl FormattedQuantity {
    /// The unit part alone, e.g. `(mol)(l)-1`.
    pub fn unit_string(&self) -> String {
        let mut out = String::new();
        for unit in &self.units {
            out.push('(');
            out.push_str(&unit.identifier);
            out.push(')');
            if unit.exponent != 1 {
                out.push_str(&unit.exponent.to_string());
                out.push(' ');
            }
        }
        out.trim_end().to_string()
    }
}

/// `1000.000000 (ml)`. The formatter precision (default 6) applies to the number.
impl fmt::Display for FormattedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(6);
        write!(f, "{:.*}", precision, self.number)?;
        if !self.units.is_empty() {
            write!(f, " {}", self.unit_string())?;
        }
        Ok(())
    }
}

fn display_order(a: &UnitDisplay, b: &UnitDisplay) -> Ordering {
    b.exponent
        .cmp(&a.exponent)
        .then_with(|| b.identifier.cmp(&a.identifier))
}

impl Quantity {
    /// Render using the preferred units, in priority order, then whatever base
    /// units remain. The quantity itself is not modified.
    pub fn format(&self) -> FormattedQuantity {
        let mut number = self.number;
        let mut remaining = self.combination.clone();
        let mut units = Vec::new();

        for preferred in self.preferred.iter() {
            let (remain, power) = preferred.exponents().derive(&remaining);
            if power == 0 {
                continue;
            }
            remaining = remain;
            number = preferred.from_raw(number, power);
            units.push(UnitDisplay {
                identifier: preferred.identifier().to_string(),
                exponent: power,
            });
        }

        remaining.simplify();
        units.extend(remaining.iter().map(|e| UnitDisplay {
            identifier: e.unit.identifier().to_string(),
            exponent: e.exponent,
        }));
        units.sort_by(display_order);

        FormattedQuantity { number, units }
    }
}
