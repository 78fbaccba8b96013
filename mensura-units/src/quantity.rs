//! Quantity type - an immutable scalar with a normalized unit expression

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use mensura_core::{mul_safe, QtyError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::algebra::clean_terms;
use crate::convert::reduce_to_base;
use crate::format::unit_string;
use crate::kind::kind_of;
use crate::parse::parse_expression;
use crate::registry::{Atom, UNITS};
use crate::signature::DimensionVector;
use crate::temperature::{self, TempScale};

/// Signature shared by temperatures, degrees and kelvin-based units
pub(crate) const TEMPERATURE_SIGNATURE: i64 = 400;

/// A physical quantity: a scalar with numerator and denominator atoms.
///
/// Cloning is cheap and yields the same instance (see [`Quantity::ptr_eq`]);
/// [`Quantity::from_quantity`] makes an independent copy.
pub struct Quantity {
    inner: Arc<Inner>,
}

struct Inner {
    scalar: f64,
    /// Never empty: `[<1>]` when there are no units
    numerator: Vec<Atom>,
    denominator: Vec<Atom>,
    base_scalar: f64,
    signature: i64,
    is_base: bool,
    input: Option<String>,
    unit: OnceLock<String>,
    /// Target unit string -> converted quantity
    conversions: Mutex<HashMap<String, Quantity>>,
}

/// Right-hand side of arithmetic and comparison
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Bare number: scales directly in `mul`/`div`, unitless elsewhere
    Number(f64),
    /// Quantity string, parsed on use
    Text(&'a str),
    Quantity(&'a Quantity),
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Number(value)
    }
}

impl<'a> From<&'a str> for Operand<'a> {
    fn from(text: &'a str) -> Self {
        Operand::Text(text)
    }
}

impl<'a> From<&'a String> for Operand<'a> {
    fn from(text: &'a String) -> Self {
        Operand::Text(text)
    }
}

impl<'a> From<&'a Quantity> for Operand<'a> {
    fn from(qty: &'a Quantity) -> Self {
        Operand::Quantity(qty)
    }
}

impl<'a> Operand<'a> {
    pub fn into_quantity(self) -> Result<Cow<'a, Quantity>, QtyError> {
        match self {
            Operand::Number(value) => Ok(Cow::Owned(Quantity::from_number(value))),
            Operand::Text(text) => Quantity::parse(text).map(Cow::Owned),
            Operand::Quantity(qty) => Ok(Cow::Borrowed(qty)),
        }
    }
}

/// Target units of a conversion. A quantity target contributes its units
/// only; its scalar is ignored.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Text(&'a str),
    Quantity(&'a Quantity),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(text: &'a str) -> Self {
        Target::Text(text)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(text: &'a String) -> Self {
        Target::Text(text)
    }
}

impl<'a> From<&'a Quantity> for Target<'a> {
    fn from(qty: &'a Quantity) -> Self {
        Target::Quantity(qty)
    }
}

/// Raw serialized form of a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityRecord {
    pub scalar: f64,
    /// Atom ids, e.g. `["<kilo>", "<meter>"]`
    pub numerator: Vec<String>,
    pub denominator: Vec<String>,
}

impl Quantity {
    // ========== Construction ==========

    /// Parse a quantity string such as `"2.5 kg*m/s^2"`
    pub fn parse(text: &str) -> Result<Self, QtyError> {
        let parsed = parse_expression(text)?;
        Self::build(
            parsed.scalar,
            parsed.numerator,
            parsed.denominator,
            Some(text.to_string()),
        )
    }

    /// Unitless quantity
    pub fn from_number(value: f64) -> Self {
        Self::assemble(value, vec![UNITS.unity()], vec![UNITS.unity()], None)
    }

    /// `value` in `units`; any scalar written in `units` is discarded
    pub fn from_number_and_unit(value: f64, units: &str) -> Result<Self, QtyError> {
        if !value.is_finite() {
            return Err(QtyError::InvalidArgument(
                "Only number accepted as initialization value when units are explicitly provided"
                    .to_string(),
            ));
        }
        let parsed = parse_expression(units)?;
        Self::build(
            value,
            parsed.numerator,
            parsed.denominator,
            Some(format!("{} {}", value, units)),
        )
    }

    /// Build from a scalar and atom ids (`"<kilo>", "<meter>"`)
    pub fn from_record(
        scalar: f64,
        numerator: &[&str],
        denominator: &[&str],
    ) -> Result<Self, QtyError> {
        if !scalar.is_finite() {
            return Err(QtyError::InvalidArgument(
                "Scalar must be a finite number".to_string(),
            ));
        }
        let numerator = atoms_from_ids(numerator)?;
        let denominator = atoms_from_ids(denominator)?;
        Self::build(scalar, numerator, denominator, None)
    }

    /// Build from a scalar and already resolved atoms
    pub fn from_atoms(
        scalar: f64,
        numerator: Vec<Atom>,
        denominator: Vec<Atom>,
    ) -> Result<Self, QtyError> {
        Self::build(scalar, numerator, denominator, None)
    }

    /// Build from atoms that need no validation: base atoms, or a single
    /// kelvin temperature with a non-negative reading
    pub(crate) fn from_base_atoms(scalar: f64, numerator: Vec<Atom>, denominator: Vec<Atom>) -> Self {
        Self::assemble(scalar, normalize(numerator), normalize(denominator), None)
    }

    /// Independent copy with fresh caches
    pub fn from_quantity(other: &Quantity) -> Self {
        Self::assemble(
            other.scalar(),
            other.numerator().to_vec(),
            other.denominator().to_vec(),
            other.inner.input.clone(),
        )
    }

    fn build(
        scalar: f64,
        numerator: Vec<Atom>,
        denominator: Vec<Atom>,
        input: Option<String>,
    ) -> Result<Self, QtyError> {
        let numerator = normalize(numerator);
        let denominator = normalize(denominator);
        check_temperature_placement(&numerator, &denominator)?;

        let qty = Self::assemble(scalar, numerator, denominator, input);
        if qty.is_temperature() && qty.base_scalar() < 0.0 {
            return Err(QtyError::temperature(
                "Temperatures must not be less than absolute zero",
            ));
        }
        Ok(qty)
    }

    /// Compute the derived fields; atoms must already be normalized
    fn assemble(
        scalar: f64,
        numerator: Vec<Atom>,
        denominator: Vec<Atom>,
        input: Option<String>,
    ) -> Self {
        let is_base = is_base_units(&numerator, &denominator);
        let (base_scalar, signature) = if is_base {
            let dims = DimensionVector::from_base_atoms(&numerator, &denominator);
            (scalar, dims.signature())
        } else if let Some(scale) = temperature_scale(&numerator, &denominator) {
            (scale.to_kelvin(scalar), TEMPERATURE_SIGNATURE)
        } else {
            let base = reduce_to_base(&numerator, &denominator);
            (mul_safe(&[base.factor, scalar]), base.signature)
        };

        Quantity {
            inner: Arc::new(Inner {
                scalar,
                numerator,
                denominator,
                base_scalar,
                signature,
                is_base,
                input,
                unit: OnceLock::new(),
                conversions: Mutex::new(HashMap::new()),
            }),
        }
    }

    // ========== Introspection ==========

    pub fn scalar(&self) -> f64 {
        self.inner.scalar
    }

    /// Scalar expressed in base units (kelvin for temperatures)
    pub fn base_scalar(&self) -> f64 {
        self.inner.base_scalar
    }

    pub fn numerator(&self) -> &[Atom] {
        &self.inner.numerator
    }

    pub fn denominator(&self) -> &[Atom] {
        &self.inner.denominator
    }

    /// Dimensional signature; equal signatures mean convertible units
    pub fn signature(&self) -> i64 {
        self.inner.signature
    }

    /// Kind name, `None` for uncategorized composites
    pub fn kind(&self) -> Option<&'static str> {
        kind_of(self.signature())
    }

    /// Normalized unit string, e.g. `"kg*m/s2"`
    pub fn unit(&self) -> &str {
        self.inner
            .unit
            .get_or_init(|| unit_string(self.numerator(), self.denominator()))
    }

    /// Exponents of the fundamental dimensions
    pub fn dimension(&self) -> DimensionVector {
        let base = self.to_base();
        DimensionVector::from_base_atoms(base.numerator(), base.denominator())
    }

    /// The string this quantity was parsed from, if any
    pub fn input(&self) -> Option<&str> {
        self.inner.input.as_deref()
    }

    /// Whether both handles point at the same instance
    pub fn ptr_eq(&self, other: &Quantity) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ========== Predicates ==========

    pub fn is_unitless(&self) -> bool {
        is_unity(self.numerator()) && is_unity(self.denominator())
    }

    /// Units are all base units (or a single kelvin degree/temperature)
    pub fn is_base(&self) -> bool {
        self.inner.is_base
    }

    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.signature() == other.signature()
    }

    /// Whether `other` measures the reciprocal of this quantity
    pub fn is_inverse(&self, other: &Quantity) -> bool {
        self.signature() == -other.signature()
    }

    /// A single degree or absolute temperature atom over unity
    pub fn is_degrees(&self) -> bool {
        degree_atom(self.numerator(), self.denominator()).is_some()
    }

    /// A single absolute temperature atom over unity
    pub fn is_temperature(&self) -> bool {
        temperature_scale(self.numerator(), self.denominator()).is_some()
    }

    /// Exact scalar and unit string match, no conversion
    pub fn same(&self, other: &Quantity) -> bool {
        self.scalar() == other.scalar() && self.unit() == other.unit()
    }

    // ========== Comparison ==========

    /// Compare by base scalar. Incompatible units fail.
    pub fn compare_to<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Ordering, QtyError> {
        let other = other.into().into_quantity()?;
        if !self.is_compatible(&other) {
            return Err(QtyError::incompatible(self.unit(), other.unit()));
        }
        self.base_scalar()
            .partial_cmp(&other.base_scalar())
            .ok_or_else(|| QtyError::InvalidArgument("Cannot compare NaN scalars".to_string()))
    }

    pub fn eq<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool, QtyError> {
        Ok(self.compare_to(other)? == Ordering::Equal)
    }

    pub fn lt<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool, QtyError> {
        Ok(self.compare_to(other)? == Ordering::Less)
    }

    pub fn lte<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool, QtyError> {
        Ok(self.compare_to(other)? != Ordering::Greater)
    }

    pub fn gt<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool, QtyError> {
        Ok(self.compare_to(other)? == Ordering::Greater)
    }

    pub fn gte<'a>(&self, other: impl Into<Operand<'a>>) -> Result<bool, QtyError> {
        Ok(self.compare_to(other)? != Ordering::Less)
    }

    // ========== Arithmetic ==========

    /// Sum in this quantity's units
    pub fn add<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Quantity, QtyError> {
        let other = other.into().into_quantity()?;
        if !self.is_compatible(&other) {
            return Err(QtyError::incompatible(self.unit(), other.unit()));
        }
        if self.is_temperature() && other.is_temperature() {
            return Err(QtyError::temperature("Cannot add two temperatures"));
        }
        if self.is_temperature() {
            return temperature::shift_temperature(self, &other, 1.0);
        }
        if other.is_temperature() {
            return temperature::shift_temperature(&other, self, 1.0);
        }
        let converted = other.to(self)?;
        self.with_scalar(self.scalar() + converted.scalar())
    }

    /// Difference in this quantity's units; two temperatures give a degree
    pub fn sub<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Quantity, QtyError> {
        let other = other.into().into_quantity()?;
        if !self.is_compatible(&other) {
            return Err(QtyError::incompatible(self.unit(), other.unit()));
        }
        if self.is_temperature() && other.is_temperature() {
            return temperature::difference(self, &other);
        }
        if self.is_temperature() {
            return temperature::shift_temperature(self, &other, -1.0);
        }
        if other.is_temperature() {
            return Err(QtyError::temperature(
                "Cannot subtract a temperature from a differential degree unit",
            ));
        }
        let converted = other.to(self)?;
        self.with_scalar(self.scalar() - converted.scalar())
    }

    pub fn mul<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Quantity, QtyError> {
        let other = match other.into() {
            Operand::Number(value) => return self.with_scalar(mul_safe(&[self.scalar(), value])),
            operand => operand.into_quantity()?,
        };
        if (self.is_temperature() || other.is_temperature())
            && !(self.is_unitless() || other.is_unitless())
        {
            return Err(QtyError::temperature("Cannot multiply by temperatures"));
        }

        let other = self.align(other)?;
        let terms = clean_terms(
            self.numerator(),
            self.denominator(),
            other.numerator(),
            other.denominator(),
        )?;
        Self::from_atoms(
            mul_safe(&[self.scalar(), other.scalar(), terms.scale]),
            terms.numerator,
            terms.denominator,
        )
    }

    pub fn div<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Quantity, QtyError> {
        let other = match other.into() {
            Operand::Number(value) => {
                if value == 0.0 {
                    return Err(QtyError::DivideByZero);
                }
                return self.with_scalar(self.scalar() / value);
            }
            operand => operand.into_quantity()?,
        };
        if other.scalar() == 0.0 {
            return Err(QtyError::DivideByZero);
        }
        if other.is_temperature() || (self.is_temperature() && !other.is_unitless()) {
            return Err(QtyError::temperature("Cannot divide with temperatures"));
        }

        let other = self.align(other)?;
        let terms = clean_terms(
            self.numerator(),
            self.denominator(),
            other.denominator(),
            other.numerator(),
        )?;
        Self::from_atoms(
            mul_safe(&[self.scalar(), terms.scale]) / other.scalar(),
            terms.numerator,
            terms.denominator,
        )
    }

    /// Reciprocal: scalar inverted, numerator and denominator swapped
    pub fn inverse(&self) -> Result<Quantity, QtyError> {
        if self.is_degrees() {
            return Err(QtyError::temperature("Cannot divide with temperatures"));
        }
        if self.scalar() == 0.0 {
            return Err(QtyError::DivideByZero);
        }
        Self::from_atoms(
            1.0 / self.scalar(),
            self.denominator().to_vec(),
            self.numerator().to_vec(),
        )
    }

    /// Express a compatible operand in this quantity's units so products
    /// keep intuitive units. Operands carrying degree atoms keep their tags,
    /// so `degK*degC / degC^2` cancels to `K/°C` on the raw atoms.
    fn align<'a>(&self, other: Cow<'a, Quantity>) -> Result<Cow<'a, Quantity>, QtyError> {
        let keep_tags = self.signature() == TEMPERATURE_SIGNATURE
            || has_degree_atoms(self)
            || has_degree_atoms(&other);
        if self.is_compatible(&other) && !keep_tags {
            Ok(Cow::Owned(other.to(self)?))
        } else {
            Ok(other)
        }
    }

    /// Same units, new scalar
    pub(crate) fn with_scalar(&self, scalar: f64) -> Result<Quantity, QtyError> {
        Self::from_atoms(
            scalar,
            self.numerator().to_vec(),
            self.denominator().to_vec(),
        )
    }

    // ========== Conversion cache ==========

    pub(crate) fn cached_conversion(&self, target: &str) -> Option<Quantity> {
        self.inner
            .conversions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .cloned()
    }

    /// Insert if absent; returns whichever entry ends up cached
    pub(crate) fn store_conversion(&self, target: String, converted: Quantity) -> Quantity {
        self.inner
            .conversions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(target)
            .or_insert(converted)
            .clone()
    }

    // ========== Serialization ==========

    pub fn to_record(&self) -> QuantityRecord {
        let ids = |atoms: &[Atom]| -> Vec<String> {
            atoms
                .iter()
                .filter(|atom| !atom.is_unity())
                .map(|atom| atom.id().to_string())
                .collect()
        };
        QuantityRecord {
            scalar: self.scalar(),
            numerator: ids(self.numerator()),
            denominator: ids(self.denominator()),
        }
    }

    pub fn from_quantity_record(record: &QuantityRecord) -> Result<Self, QtyError> {
        let numerator: Vec<&str> = record.numerator.iter().map(String::as_str).collect();
        let denominator: Vec<&str> = record.denominator.iter().map(String::as_str).collect();
        Self::from_record(record.scalar, &numerator, &denominator)
    }
}

// ========== Helpers ==========

fn is_unity(atoms: &[Atom]) -> bool {
    matches!(atoms, [atom] if atom.is_unity())
}

/// Drop unity atoms; an empty list becomes the unity sentinel
fn normalize(mut atoms: Vec<Atom>) -> Vec<Atom> {
    atoms.retain(|atom| !atom.is_unity());
    if atoms.is_empty() {
        atoms.push(UNITS.unity());
    }
    atoms
}

fn atoms_from_ids(ids: &[&str]) -> Result<Vec<Atom>, QtyError> {
    let atoms = ids
        .iter()
        .map(|id| {
            UNITS
                .atom(id)
                .ok_or_else(|| QtyError::InvalidArgument(format!("Unknown unit atom: {}", id)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut expect_unit = false;
    for atom in &atoms {
        if expect_unit && atom.is_prefix() {
            return Err(QtyError::InvalidArgument(format!(
                "Prefix must be followed by a unit: {}",
                atom.id()
            )));
        }
        expect_unit = atom.is_prefix();
    }
    if expect_unit {
        return Err(QtyError::InvalidArgument(
            "Prefix must be followed by a unit".to_string(),
        ));
    }
    Ok(atoms)
}

/// Absolute temperatures may only stand alone over unity
fn check_temperature_placement(numerator: &[Atom], denominator: &[Atom]) -> Result<(), QtyError> {
    let is_temp = |atom: &Atom| TempScale::of_temperature(*atom).is_some();
    if denominator.iter().any(is_temp) {
        return Err(QtyError::temperature("Cannot divide with temperatures"));
    }
    if numerator.iter().any(is_temp) {
        if numerator.len() > 1 {
            return Err(QtyError::temperature("Cannot multiply by temperatures"));
        }
        if !is_unity(denominator) {
            return Err(QtyError::temperature("Cannot divide with temperatures"));
        }
    }
    Ok(())
}

/// Any temperature degree atom (`<celsius>`, `<kelvin>`, ...) in the units
fn has_degree_atoms(qty: &Quantity) -> bool {
    qty.numerator()
        .iter()
        .chain(qty.denominator())
        .any(|atom| TempScale::of_degree(*atom).is_some())
}

fn degree_atom(numerator: &[Atom], denominator: &[Atom]) -> Option<Atom> {
    match numerator {
        [atom] if is_unity(denominator) && TempScale::of_atom(*atom).is_some() => Some(*atom),
        _ => None,
    }
}

fn temperature_scale(numerator: &[Atom], denominator: &[Atom]) -> Option<TempScale> {
    degree_atom(numerator, denominator).and_then(TempScale::of_temperature)
}

fn is_base_units(numerator: &[Atom], denominator: &[Atom]) -> bool {
    if let Some(atom) = degree_atom(numerator, denominator) {
        if matches!(atom.id(), "<kelvin>" | "<temp-K>") {
            return true;
        }
    }
    numerator
        .iter()
        .chain(denominator)
        .all(|atom| atom.is_unity() || atom.is_base())
}

// ========== Trait impls ==========

impl Clone for Quantity {
    fn clone(&self) -> Self {
        Quantity {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("scalar", &self.scalar())
            .field("unit", &self.unit())
            .finish()
    }
}

/// Equal by converted value; incompatible quantities are never equal
impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare_to(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare_to(other).ok()
    }
}

impl std::str::FromStr for Quantity {
    type Err = QtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::parse(s)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = QuantityRecord::deserialize(deserializer)?;
        Quantity::from_quantity_record(&record).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(text: &str) -> Quantity {
        Quantity::parse(text).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn test_parse_basic() {
            let q = qty("2.5 kg*m/s^2");
            assert_eq!(q.scalar(), 2.5);
            assert_eq!(q.unit(), "kg*m/s2");
            assert_eq!(q.kind(), Some("force"));
            assert_eq!(q.input(), Some("2.5 kg*m/s^2"));
        }

        #[test]
        fn test_empty_is_unitless_one() {
            let q = qty("");
            assert_eq!(q.scalar(), 1.0);
            assert!(q.is_unitless());
            assert_eq!(q.unit(), "");
            assert_eq!(q.kind(), Some("unitless"));
        }

        #[test]
        fn test_from_number_and_unit_discards_unit_scalar() {
            let q = Quantity::from_number_and_unit(3.0, "5 m").unwrap();
            assert_eq!(q.scalar(), 3.0);
            assert_eq!(q.unit(), "m");
            assert!(matches!(
                Quantity::from_number_and_unit(f64::NAN, "m"),
                Err(QtyError::InvalidArgument(_))
            ));
        }

        #[test]
        fn test_from_record() {
            let q = Quantity::from_record(2.0, &["<kilo>", "<meter>"], &["<hour>"]).unwrap();
            assert_eq!(q.unit(), "km/h");
            assert!(matches!(
                Quantity::from_record(2.0, &["<bogus>"], &[]),
                Err(QtyError::InvalidArgument(_))
            ));
            assert!(matches!(
                Quantity::from_record(2.0, &["<kilo>"], &[]),
                Err(QtyError::InvalidArgument(_))
            ));
        }

        #[test]
        fn test_from_record_unity_sentinel() {
            let q = Quantity::from_record(4.0, &["<1>"], &["<1>"]).unwrap();
            assert!(q.is_unitless());
        }

        #[test]
        fn test_from_quantity_is_independent() {
            let q = qty("1 m");
            let copy = Quantity::from_quantity(&q);
            assert!(copy.same(&q));
            assert!(!copy.ptr_eq(&q));
            assert!(q.clone().ptr_eq(&q));
        }

        #[test]
        fn test_below_absolute_zero() {
            assert!(matches!(
                Quantity::parse("-273.16 tempC"),
                Err(QtyError::TemperatureDomain(_))
            ));
            assert!(Quantity::parse("-273.15 tempC").is_ok());
            assert!(Quantity::parse("-1 tempK").is_err());
            // degrees carry no absolute floor
            assert!(Quantity::parse("-500 degC").is_ok());
        }

        #[test]
        fn test_temperature_placement() {
            assert_eq!(
                Quantity::parse("1 m/tempC").unwrap_err(),
                QtyError::temperature("Cannot divide with temperatures")
            );
            assert_eq!(
                Quantity::parse("1 tempC*m").unwrap_err(),
                QtyError::temperature("Cannot multiply by temperatures")
            );
            assert_eq!(
                Quantity::parse("1 tempC/s").unwrap_err(),
                QtyError::temperature("Cannot divide with temperatures")
            );
        }
    }

    mod predicate_tests {
        use super::*;

        #[test]
        fn test_is_base() {
            assert!(qty("1 m").is_base());
            assert!(qty("1 kg*m/s^2").is_base());
            assert!(!qty("1 N").is_base());
            assert!(!qty("1 km").is_base());
            assert!(qty("1 tempK").is_base());
            assert!(qty("1 degK").is_base());
            assert!(!qty("1 tempC").is_base());
        }

        #[test]
        fn test_states() {
            assert!(qty("1 tempF").is_temperature());
            assert!(qty("1 tempF").is_degrees());
            assert!(qty("1 degF").is_degrees());
            assert!(!qty("1 degF").is_temperature());
            assert!(!qty("1 degF*m").is_degrees());
            assert!(!qty("1 m").is_degrees());
        }

        #[test]
        fn test_compatibility() {
            assert!(qty("1 ft").is_compatible(&qty("3 km")));
            assert!(!qty("1 ft").is_compatible(&qty("3 s")));
            assert!(qty("1 tempC").is_compatible(&qty("1 degF")));
            assert!(qty("1 ohm").is_inverse(&qty("1 S")));
            assert!(!qty("1 ohm").is_inverse(&qty("1 V")));
        }

        #[test]
        fn test_same_is_stricter_than_eq() {
            let a = qty("100 cm");
            let b = qty("1 m");
            assert!(a.eq(&b).unwrap());
            assert!(!a.same(&b));
            assert!(a.same(&qty("100 cm")));
        }

        #[test]
        fn test_signature_and_kind() {
            assert_eq!(qty("1 J").signature(), 7962);
            assert_eq!(qty("1 J").kind(), Some("energy"));
            assert_eq!(qty("1 m*s*A").kind(), None);
            assert_eq!(format!("{}", qty("1 N").dimension()), "L T^-2 M");
        }
    }

    mod comparison_tests {
        use super::*;

        #[test]
        fn test_compare_to() {
            let a = qty("1 km");
            assert_eq!(a.compare_to("999 m").unwrap(), Ordering::Greater);
            assert_eq!(a.compare_to("1000 m").unwrap(), Ordering::Equal);
            assert_eq!(a.compare_to("1 mi").unwrap(), Ordering::Less);
            assert!(a.lt("1 mi").unwrap());
            assert!(a.lte("1000 m").unwrap());
            assert!(a.gt("1 ft").unwrap());
            assert!(a.gte("1 km").unwrap());
        }

        #[test]
        fn test_compare_incompatible() {
            assert!(matches!(
                qty("1 m").compare_to("1 s"),
                Err(QtyError::IncompatibleUnits { .. })
            ));
        }

        #[test]
        fn test_ordering_antisymmetric() {
            let a = qty("3 ft");
            let b = qty("1 m");
            assert_eq!(
                a.compare_to(&b).unwrap(),
                b.compare_to(&a).unwrap().reverse()
            );
            assert!(a < b);
            assert!(a != b);
        }

        #[test]
        fn test_number_operand_is_unitless() {
            assert!(qty("5").eq(5.0).unwrap());
            assert!(qty("5 m").eq(5.0).is_err());
        }
    }

    mod arithmetic_tests {
        use super::*;

        #[test]
        fn test_add_in_left_units() {
            let sum = qty("1 m").add("20 cm").unwrap();
            assert_eq!(sum.unit(), "m");
            assert!(close(sum.scalar(), 1.2));
            assert!(matches!(
                qty("1 m").add("1 s"),
                Err(QtyError::IncompatibleUnits { .. })
            ));
        }

        #[test]
        fn test_sub() {
            let diff = qty("1 m").sub("20 cm").unwrap();
            assert!(close(diff.scalar(), 0.8));
            assert_eq!(diff.unit(), "m");
        }

        #[test]
        fn test_mul_aligns_compatible_units() {
            let product = qty("2.5 m").mul("3 cm").unwrap();
            assert_eq!(product.unit(), "m2");
            assert_eq!(product.scalar(), 0.075);

            let product = qty("3 cm").mul("2.5 m").unwrap();
            assert_eq!(product.unit(), "cm2");
            assert_eq!(product.scalar(), 750.0);
        }

        #[test]
        fn test_mul_by_number() {
            let q = qty("0.1 m").mul(0.1).unwrap();
            assert_eq!(q.scalar(), 0.01);
            assert_eq!(q.unit(), "m");
        }

        #[test]
        fn test_mul_incompatible_keeps_both() {
            let q = qty("2 N").mul("3 m").unwrap();
            assert_eq!(q.unit(), "N*m");
            assert_eq!(q.scalar(), 6.0);
        }

        #[test]
        fn test_div_cancels() {
            let q = qty("10 m").div("2 s").unwrap();
            assert_eq!(q.unit(), "m/s");
            assert_eq!(q.scalar(), 5.0);

            let q = qty("6 m").div("3 m").unwrap();
            assert!(q.is_unitless());
            assert_eq!(q.scalar(), 2.0);
        }

        #[test]
        fn test_div_by_zero() {
            assert_eq!(qty("1 m").div(0.0).unwrap_err(), QtyError::DivideByZero);
            assert_eq!(qty("1 m").div("0 s").unwrap_err(), QtyError::DivideByZero);
        }

        #[test]
        fn test_inverse() {
            let q = qty("4 s").inverse().unwrap();
            assert_eq!(q.unit(), "1/s");
            assert_eq!(q.scalar(), 0.25);
            assert!(q.inverse().unwrap().eq("4 s").unwrap());
            assert_eq!(qty("0 s").inverse().unwrap_err(), QtyError::DivideByZero);
            assert!(matches!(
                qty("1 degC").inverse(),
                Err(QtyError::TemperatureDomain(_))
            ));
        }

        #[test]
        fn test_ptr_eq_clone() {
            let q = qty("1 m");
            let c = q.clone();
            assert!(c.ptr_eq(&q));
        }
    }

    mod temperature_tests {
        use super::*;

        #[test]
        fn test_add_two_temperatures_fails() {
            assert_eq!(
                qty("1 tempC").add("1 tempF").unwrap_err(),
                QtyError::temperature("Cannot add two temperatures")
            );
        }

        #[test]
        fn test_temperature_plus_degree() {
            let q = qty("3 tempF").add("2 degC").unwrap();
            assert_eq!(q.unit(), "tempF");
            assert!(close(q.scalar(), 6.6));

            let q = qty("2 degC").add("3 tempF").unwrap();
            assert_eq!(q.unit(), "tempF");
            assert!(close(q.scalar(), 6.6));
        }

        #[test]
        fn test_temperature_minus_temperature_is_degree() {
            let q = qty("2 tempC").sub("1.5 tempK").unwrap();
            assert_eq!(q.unit(), "°C");
            assert!(close(q.scalar(), 273.65));
            assert!(q.is_degrees());
            assert!(!q.is_temperature());
        }

        #[test]
        fn test_temperature_minus_degree() {
            let q = qty("100 tempC").sub("10 degC").unwrap();
            assert_eq!(q.unit(), "tempC");
            assert_eq!(q.scalar(), 90.0);
        }

        #[test]
        fn test_degree_minus_temperature_fails() {
            assert!(matches!(
                qty("10 degC").sub("1 tempC"),
                Err(QtyError::TemperatureDomain(_))
            ));
        }

        #[test]
        fn test_multiply_temperature() {
            assert_eq!(
                qty("2 tempC").mul("2 m").unwrap_err(),
                QtyError::temperature("Cannot multiply by temperatures")
            );
            let scaled = qty("2 tempC").mul(3.0).unwrap();
            assert_eq!(scaled.scalar(), 6.0);
            assert_eq!(scaled.unit(), "tempC");
            let scaled = qty("2 tempC").mul("3").unwrap();
            assert_eq!(scaled.scalar(), 6.0);
        }

        #[test]
        fn test_divide_temperature() {
            assert!(qty("2 m").div("1 tempC").is_err());
            assert!(qty("2 tempC").div("1 m").is_err());
            assert_eq!(qty("4 tempC").div(2.0).unwrap().scalar(), 2.0);
        }

        #[test]
        fn test_degrees_keep_tags() {
            let q = qty("2 degC").mul("2 degF").unwrap();
            assert_eq!(q.unit(), "°C*°F");
            assert_eq!(q.scalar(), 4.0);

            let q = qty("2 degC").mul("2 degK").unwrap();
            assert_eq!(q.unit(), "°C*K");

            let q = qty("4 degF").div("2 degC").unwrap();
            assert_eq!(q.unit(), "°F/°C");
            assert_eq!(q.scalar(), 2.0);
        }

        #[test]
        fn test_compound_degrees_cancel_on_raw_atoms() {
            let product = qty("1 degK").mul("1 degC").unwrap();
            assert_eq!(product.unit(), "K*°C");

            let q = product.div("1 degC^2").unwrap();
            assert_eq!(q.unit(), "K/°C");
            assert_eq!(q.scalar(), 1.0);
            assert_eq!(q.signature(), 0);

            let q = qty("3 degC*m").mul("2 degC*m").unwrap();
            assert_eq!(q.unit(), "°C2*m2");
            assert_eq!(q.scalar(), 6.0);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_serialize_record() {
            let json = serde_json::to_value(qty("3 km/h")).unwrap();
            assert_eq!(
                json,
                serde_json::json!({
                    "scalar": 3.0,
                    "numerator": ["<kilo>", "<meter>"],
                    "denominator": ["<hour>"]
                })
            );
        }

        #[test]
        fn test_deserialize_validates() {
            let q: Quantity = serde_json::from_str(
                r#"{"scalar": 2, "numerator": ["<temp-C>"], "denominator": []}"#,
            )
            .unwrap();
            assert_eq!(q.unit(), "tempC");

            let below_zero: Result<Quantity, _> = serde_json::from_str(
                r#"{"scalar": -300, "numerator": ["<temp-C>"], "denominator": []}"#,
            );
            assert!(below_zero.is_err());
        }

        #[test]
        fn test_atom_serializes_as_id() {
            let atom = UNITS.atom("<meter>").unwrap();
            assert_eq!(serde_json::to_string(&atom).unwrap(), "\"<meter>\"");
        }
    }
}
