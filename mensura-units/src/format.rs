//! Rendering - unit strings and quantity strings

use std::fmt;

use mensura_core::{format_scalar, round_to, QtyError};

use crate::quantity::{Operand, Quantity};
use crate::registry::Atom;

/// Normalized unit string: `"kg*m/s2"`, `"1/s"`, `""` when unitless
pub(crate) fn unit_string(numerator: &[Atom], denominator: &[Atom]) -> String {
    let num_unity = is_unity(numerator);
    let den_unity = is_unity(denominator);
    if num_unity && den_unity {
        return String::new();
    }

    let mut out = stringify(numerator);
    if !den_unity {
        out.push('/');
        out.push_str(&stringify(denominator));
    }
    out
}

fn is_unity(atoms: &[Atom]) -> bool {
    atoms.iter().all(|atom| atom.is_unity())
}

/// One side of a unit string; repeated names collapse to `name<count>`
/// in first-seen order
fn stringify(atoms: &[Atom]) -> String {
    if is_unity(atoms) {
        return "1".to_string();
    }

    let mut counts: Vec<(String, usize)> = Vec::new();
    for name in output_names(atoms) {
        match counts.iter_mut().find(|(seen, _)| *seen == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }

    counts
        .into_iter()
        .map(|(name, count)| {
            if count > 1 {
                format!("{}{}", name, count)
            } else {
                name
            }
        })
        .collect::<Vec<_>>()
        .join("*")
}

/// Output name per unit, a prefix glued to the unit after it
fn output_names(atoms: &[Atom]) -> Vec<String> {
    let mut names = Vec::new();
    let mut iter = atoms.iter().filter(|atom| !atom.is_unity());
    while let Some(atom) = iter.next() {
        if atom.is_prefix() {
            let unit = iter.next().map_or("", |unit| unit.output_name());
            names.push(format!("{}{}", atom.output_name(), unit));
        } else {
            names.push(atom.output_name().to_string());
        }
    }
    names
}

/// `"{scalar} {units}"`, trimmed
pub fn default_formatter(scalar: f64, units: &str) -> String {
    format!("{} {}", format_scalar(scalar), units)
        .trim()
        .to_string()
}

impl Quantity {
    /// Render in `target` units (current units when `None`), optionally
    /// rounded to `max_decimals` decimal places
    pub fn to_string_in(
        &self,
        target: Option<&str>,
        max_decimals: Option<i32>,
    ) -> Result<String, QtyError> {
        let out = match target {
            Some(target) => self.to(target)?,
            None => self.clone(),
        };
        let scalar = match max_decimals {
            Some(decimals) => round_to(out.scalar(), decimals),
            None => out.scalar(),
        };
        Ok(default_formatter(scalar, out.unit()))
    }

    /// Round to the nearest multiple of `precision` first, then render
    pub fn to_string_with_precision<'a>(
        &self,
        precision: impl Into<Operand<'a>>,
        max_decimals: Option<i32>,
    ) -> Result<String, QtyError> {
        self.to_prec(precision)?.to_string_in(None, max_decimals)
    }

    /// Render through a custom formatter receiving the converted scalar and
    /// unit string
    pub fn format<F>(&self, target: Option<&str>, formatter: F) -> Result<String, QtyError>
    where
        F: Fn(f64, &str) -> String,
    {
        let out = match target {
            Some(target) => self.to(target)?,
            None => self.clone(),
        };
        Ok(formatter(out.scalar(), out.unit()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&default_formatter(self.scalar(), self.unit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(text: &str) -> Quantity {
        Quantity::parse(text).unwrap()
    }

    #[test]
    fn test_unit_strings() {
        assert_eq!(qty("1 m").unit(), "m");
        assert_eq!(qty("1 m^2").unit(), "m2");
        assert_eq!(qty("1 m*s*m").unit(), "m2*s");
        assert_eq!(qty("1 kg*m/s^2").unit(), "kg*m/s2");
        assert_eq!(qty("1 /s").unit(), "1/s");
        assert_eq!(qty("1 km").unit(), "km");
        assert_eq!(qty("12").unit(), "");
    }

    #[test]
    fn test_display() {
        assert_eq!(qty("2 m").to_string(), "2 m");
        assert_eq!(qty("7").to_string(), "7");
        assert_eq!(qty("1.5e-7 m").to_string(), "1.5e-7 m");
        assert_eq!(qty("-0 m").to_string(), "0 m");
    }

    #[test]
    fn test_to_string_in() {
        let q = qty("1 m");
        assert_eq!(q.to_string_in(Some("cm"), None).unwrap(), "100 cm");
        assert_eq!(qty("2.987654321 m").to_string_in(None, Some(3)).unwrap(), "2.988 m");
        assert!(q.to_string_in(Some("s"), None).is_err());
    }

    #[test]
    fn test_to_string_with_precision() {
        assert_eq!(
            qty("5.17 ft").to_string_with_precision("0.05 ft", None).unwrap(),
            "5.15 ft"
        );
        assert_eq!(
            qty("1.146 MPa").to_string_with_precision("0.1 bar", None).unwrap(),
            "1.15 MPa"
        );
    }

    #[test]
    fn test_format() {
        let q = qty("1 m");
        assert_eq!(q.format(Some("cm"), default_formatter).unwrap(), "100 cm");
        let custom = q
            .format(None, |scalar, units| format!("{}:{}", scalar * 2.0, units))
            .unwrap();
        assert_eq!(custom, "2:m");
    }

    #[test]
    fn test_round_trip() {
        for text in ["2 m", "3.5 kg*m/s2", "1 1/s", "4 tempC", "2 °C*°F"] {
            let q = qty(text);
            assert!(qty(&q.to_string()).same(&q), "{}", text);
        }
    }
}
