//! Dimensional signatures
//!
//! A quantity's dimension is a 10-element exponent vector over the
//! fundamental dimensions below. The vector is packed into one integer,
//! `Σ exponent[i] * 20^i`, so two quantities are compatible exactly when
//! their signatures are equal.

use std::fmt;

use serde::Serialize;

use crate::registry::Atom;

/// Fundamental dimensions, in signature digit order
pub const SIGNATURE_VECTOR: [&str; 10] = [
    "length",
    "time",
    "temperature",
    "mass",
    "current",
    "substance",
    "luminosity",
    "currency",
    "information",
    "angle",
];

/// Display symbols, same order as `SIGNATURE_VECTOR`
const SYMBOLS: [&str; 10] = ["L", "T", "Θ", "M", "I", "N", "J", "$", "B", "A"];

/// Radix of each signature digit
const RADIX: i64 = 20;

/// Exponents of the fundamental dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DimensionVector {
    /// [length, time, temperature, mass, current, substance, luminosity,
    ///  currency, information, angle]
    pub exponents: [i32; 10],
}

impl DimensionVector {
    pub const DIMENSIONLESS: DimensionVector = DimensionVector { exponents: [0; 10] };

    /// Count the dimension of every base atom: +1 per numerator atom,
    /// -1 per denominator atom. Atoms tagged with anything other than a
    /// fundamental dimension (counting, solid angle, decibel) count nothing.
    pub fn from_base_atoms(numerator: &[Atom], denominator: &[Atom]) -> Self {
        let mut exponents = [0i32; 10];
        for atom in numerator {
            if let Some(slot) = dimension_index(atom.kind()) {
                exponents[slot] += 1;
            }
        }
        for atom in denominator {
            if let Some(slot) = dimension_index(atom.kind()) {
                exponents[slot] -= 1;
            }
        }
        DimensionVector { exponents }
    }

    /// Pack the vector into a single integer
    pub fn signature(&self) -> i64 {
        let mut signature = 0i64;
        let mut weight = 1i64;
        for exp in self.exponents {
            signature += i64::from(exp) * weight;
            weight *= RADIX;
        }
        signature
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }

        let parts: Vec<String> = self
            .exponents
            .iter()
            .zip(SYMBOLS)
            .filter(|(exp, _)| **exp != 0)
            .map(|(exp, sym)| {
                if *exp == 1 {
                    sym.to_string()
                } else {
                    format!("{}^{}", sym, exp)
                }
            })
            .collect();

        write!(f, "{}", parts.join(" "))
    }
}

fn dimension_index(kind: &str) -> Option<usize> {
    SIGNATURE_VECTOR.iter().position(|d| *d == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::UNITS;

    fn atoms(ids: &[&str]) -> Vec<Atom> {
        ids.iter().map(|id| UNITS.atom(id).unwrap()).collect()
    }

    #[test]
    fn test_dimensionless() {
        assert!(DimensionVector::DIMENSIONLESS.is_dimensionless());
        assert_eq!(DimensionVector::DIMENSIONLESS.signature(), 0);
        assert_eq!(format!("{}", DimensionVector::DIMENSIONLESS), "1");
    }

    #[test]
    fn test_radix_twenty_digits() {
        let temp = DimensionVector::from_base_atoms(&atoms(&["<kelvin>"]), &[]);
        assert_eq!(temp.signature(), 400);
        let mass = DimensionVector::from_base_atoms(&atoms(&["<kilogram>"]), &[]);
        assert_eq!(mass.signature(), 8000);
        let angle = DimensionVector::from_base_atoms(&atoms(&["<radian>"]), &[]);
        assert_eq!(angle.signature(), 512_000_000_000);
    }

    #[test]
    fn test_energy() {
        let energy = DimensionVector::from_base_atoms(
            &atoms(&["<meter>", "<meter>", "<kilogram>"]),
            &atoms(&["<second>", "<second>"]),
        );
        assert_eq!(energy.signature(), 7962);
        assert_eq!(format!("{}", energy), "L^2 T^-2 M");
    }

    #[test]
    fn test_non_dimensional_atoms_ignored() {
        let v = DimensionVector::from_base_atoms(&atoms(&["<each>", "<steradian>"]), &[]);
        assert!(v.is_dimensionless());
    }

    #[test]
    fn test_speed() {
        let speed =
            DimensionVector::from_base_atoms(&atoms(&["<meter>"]), &atoms(&["<second>"]));
        assert_eq!(speed.signature(), -19);
    }
}
