//! Unit algebra - combine the atom sequences of two operands
//!
//! Multiplying or dividing quantities merges their numerators and
//! denominators term by term. Every distinct unit keeps a running power;
//! matching units cancel, and prefixes that differ between occurrences of
//! the same unit fold into a scale factor for the scalar.

use mensura_core::{div_safe, QtyError};

use crate::registry::Atom;

/// Combined unit sequences plus the scale absorbed from prefix differences
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTerms {
    pub numerator: Vec<Atom>,
    pub denominator: Vec<Atom>,
    pub scale: f64,
}

/// Running state for one distinct unit
struct Term {
    unit: Atom,
    power: i32,
    /// Prefix of the first occurrence; later occurrences are expressed in it
    prefix: Option<Atom>,
    num_scale: f64,
    den_scale: f64,
}

/// Merge `left_num/left_den` with `right_num/right_den`.
///
/// For a product pass the right operand as is; for a quotient pass it
/// swapped. Output order follows first appearance of each unit.
pub fn clean_terms(
    left_num: &[Atom],
    left_den: &[Atom],
    right_num: &[Atom],
    right_den: &[Atom],
) -> Result<CombinedTerms, QtyError> {
    let mut terms: Vec<Term> = Vec::new();
    accumulate(&mut terms, left_num, 1)?;
    accumulate(&mut terms, left_den, -1)?;
    accumulate(&mut terms, right_num, 1)?;
    accumulate(&mut terms, right_den, -1)?;

    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    let mut scale = 1.0;
    for term in &terms {
        let side = if term.power > 0 {
            &mut numerator
        } else {
            &mut denominator
        };
        for _ in 0..term.power.unsigned_abs() {
            if let Some(prefix) = term.prefix {
                side.push(prefix);
            }
            side.push(term.unit);
        }
        scale *= div_safe(term.num_scale, term.den_scale)?;
    }

    Ok(CombinedTerms {
        numerator,
        denominator,
        scale,
    })
}

fn accumulate(terms: &mut Vec<Term>, atoms: &[Atom], direction: i32) -> Result<(), QtyError> {
    let mut i = 0;
    while i < atoms.len() {
        let (prefix, unit) = if atoms[i].is_prefix() {
            let unit = atoms.get(i + 1).copied();
            i += 2;
            match unit {
                Some(unit) => (Some(atoms[i - 2]), unit),
                None => break,
            }
        } else {
            i += 1;
            (None, atoms[i - 1])
        };
        if unit.is_unity() {
            continue;
        }

        match terms.iter_mut().find(|term| term.unit == unit) {
            Some(term) => {
                term.power += direction;
                let first = term.prefix.map_or(1.0, Atom::scalar);
                let ratio = div_safe(prefix.map_or(1.0, Atom::scalar), first)?;
                if direction == 1 {
                    term.num_scale *= ratio;
                } else {
                    term.den_scale *= ratio;
                }
            }
            None => terms.push(Term {
                unit,
                power: direction,
                prefix,
                num_scale: 1.0,
                den_scale: 1.0,
            }),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::UNITS;

    fn atoms(ids: &[&str]) -> Vec<Atom> {
        ids.iter().map(|id| UNITS.atom(id).unwrap()).collect()
    }

    fn ids(atoms: &[Atom]) -> Vec<&'static str> {
        atoms.iter().map(|a| a.id()).collect()
    }

    #[test]
    fn test_product_accumulates_powers() {
        let m = atoms(&["<meter>"]);
        let combined = clean_terms(&m, &[], &m, &[]).unwrap();
        assert_eq!(ids(&combined.numerator), vec!["<meter>", "<meter>"]);
        assert!(combined.denominator.is_empty());
        assert_eq!(combined.scale, 1.0);
    }

    #[test]
    fn test_quotient_cancels() {
        let m = atoms(&["<meter>"]);
        let s = atoms(&["<second>"]);
        // (m/s) / (m) : right operand passed swapped
        let combined = clean_terms(&m, &s, &[], &m).unwrap();
        assert!(combined.numerator.is_empty());
        assert_eq!(ids(&combined.denominator), vec!["<second>"]);
    }

    #[test]
    fn test_prefix_difference_becomes_scale() {
        let km = atoms(&["<kilo>", "<meter>"]);
        let mm = atoms(&["<milli>", "<meter>"]);
        let combined = clean_terms(&km, &[], &mm, &[]).unwrap();
        assert_eq!(
            ids(&combined.numerator),
            vec!["<kilo>", "<meter>", "<kilo>", "<meter>"]
        );
        assert_eq!(combined.scale, 0.000001);
    }

    #[test]
    fn test_first_appearance_order() {
        let left = atoms(&["<second>", "<meter>"]);
        let right = atoms(&["<kilogram>", "<meter>"]);
        let combined = clean_terms(&left, &[], &right, &[]).unwrap();
        assert_eq!(
            ids(&combined.numerator),
            vec!["<second>", "<meter>", "<meter>", "<kilogram>"]
        );
    }

    #[test]
    fn test_unity_dropped() {
        let one = atoms(&["<1>"]);
        let combined = clean_terms(&one, &one, &one, &one).unwrap();
        assert!(combined.numerator.is_empty());
        assert!(combined.denominator.is_empty());
    }
}
