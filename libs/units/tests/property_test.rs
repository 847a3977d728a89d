//! Property-based tests using QuickCheck

use quickcheck::{quickcheck, Arbitrary, Gen};
use unitdc_units::{BaseUnit, UnitCombination, UnitExponent};

/// A small pool so generated combinations collide on units often.
const POOL: [(&str, u32); 4] = [("g", 1), ("l", 2), ("m", 4), ("mol", 5)];

#[derive(Clone, Debug)]
struct Comb(UnitCombination);

impl Arbitrary for Comb {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 6;
        let entries = (0..len)
            .map(|_| {
                let (identifier, id) = *g.choose(&POOL).unwrap();
                let exponent = i32::from(i8::arbitrary(g) % 4);
                UnitExponent::new(BaseUnit::new(identifier, id), exponent)
            })
            .collect();
        Comb(entries)
    }
}

quickcheck! {
    fn prop_simplify_idempotent(c: Comb) -> bool {
        let once = c.0.simplified();
        let twice = once.simplified();
        once.iter().eq(twice.iter())
    }

    fn prop_equal_reflexive(c: Comb) -> bool {
        c.0.equal(&c.0)
    }

    fn prop_equal_symmetric(a: Comb, b: Comb) -> bool {
        a.0.equal(&b.0) == b.0.equal(&a.0)
    }

    fn prop_equal_implies_overlap(a: Comb, b: Comb) -> bool {
        !a.0.equal(&b.0) || a.0.is_no_unit() || a.0.has_overlap(&b.0)
    }

    fn prop_simplified_has_no_zero_or_duplicate(c: Comb) -> bool {
        let s = c.0.simplified();
        let no_zero = s.iter().all(|e| e.exponent != 0);
        let unique = s
            .iter()
            .enumerate()
            .all(|(i, e)| s.iter().skip(i + 1).all(|o| o.unit != e.unit));
        no_zero && unique
    }

    fn prop_checked_product_matches_concat(a: Comb, b: Comb) -> bool {
        let expected = a.0.concat(&b.0).simplified();
        a.0.checked_product(&b.0)
            .is_some_and(|p| p.iter().eq(expected.iter()))
    }

    fn prop_inverse_cancels(c: Comb) -> bool {
        c.0.concat(&c.0.inverted()).is_no_unit()
    }

    fn prop_derive_remainder_recombines(target: Comb, source: Comb) -> bool {
        let target = target.0.simplified();
        let (remain, k) = target.derive(&source.0);
        if k == 0 {
            return remain.equal(&source.0);
        }
        let mut rebuilt = remain;
        for _ in 0..k.abs() {
            rebuilt = if k > 0 {
                rebuilt.concat(&target)
            } else {
                rebuilt.concat(&target.inverted())
            };
        }
        rebuilt.equal(&source.0)
    }
}
