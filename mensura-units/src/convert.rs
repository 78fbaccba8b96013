//! Conversion - base reduction, unit conversion, rounding to a precision
//! and bulk converters

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use mensura_core::{div_safe, js_round, mul_safe, QtyError};

use crate::parse::parse_expression;
use crate::quantity::{Operand, Quantity, Target};
use crate::registry::{Atom, UNITS};
use crate::signature::DimensionVector;
use crate::temperature;

/// Reduction of a unit expression to base atoms; independent of the scalar
#[derive(Debug)]
pub(crate) struct BaseReduction {
    pub factor: f64,
    pub numerator: Vec<Atom>,
    pub denominator: Vec<Atom>,
    pub signature: i64,
}

/// Process-wide cache of base reductions, keyed by atom ids
static BASE_REDUCTIONS: LazyLock<RwLock<HashMap<String, Arc<BaseReduction>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn reduction_key(numerator: &[Atom], denominator: &[Atom]) -> String {
    let mut key = String::new();
    for atom in numerator {
        key.push_str(atom.id());
    }
    key.push('/');
    for atom in denominator {
        key.push_str(atom.id());
    }
    key
}

/// Reduce a unit expression to base atoms, memoized per expression
pub(crate) fn reduce_to_base(numerator: &[Atom], denominator: &[Atom]) -> Arc<BaseReduction> {
    let key = reduction_key(numerator, denominator);
    {
        let cache = BASE_REDUCTIONS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(reduction) = cache.get(&key) {
            return Arc::clone(reduction);
        }
    }

    let reduction = Arc::new(compute_reduction(numerator, denominator));
    tracing::trace!(key = %key, factor = reduction.factor, "caching base reduction");
    let mut cache = BASE_REDUCTIONS.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(cache.entry(key).or_insert(reduction))
}

fn compute_reduction(numerator: &[Atom], denominator: &[Atom]) -> BaseReduction {
    let mut factor = 1.0;
    let mut num = Vec::new();
    let mut den = Vec::new();

    for atom in numerator.iter().filter(|a| !a.is_unity()) {
        if atom.is_prefix() {
            factor = mul_safe(&[factor, atom.scalar()]);
        } else {
            factor *= atom.scalar();
            let def = atom.definition();
            num.extend(resolve(def.numerator));
            den.extend(resolve(def.denominator));
        }
    }
    for atom in denominator.iter().filter(|a| !a.is_unity()) {
        factor /= atom.scalar();
        if !atom.is_prefix() {
            let def = atom.definition();
            den.extend(resolve(def.numerator));
            num.extend(resolve(def.denominator));
        }
    }

    let signature = DimensionVector::from_base_atoms(&num, &den).signature();
    BaseReduction {
        factor,
        numerator: num,
        denominator: den,
        signature,
    }
}

/// Definition ids -> atoms, skipping unity
fn resolve(ids: &'static [&'static str]) -> impl Iterator<Item = Atom> {
    ids.iter()
        .filter_map(|id| UNITS.atom(id))
        .filter(|atom| !atom.is_unity())
}

impl Quantity {
    // ========== Conversion ==========

    /// Same quantity in base units; temperatures become kelvin
    pub fn to_base(&self) -> Quantity {
        if self.is_base() {
            return self.clone();
        }
        let (scalar, numerator, denominator) = if self.is_temperature() {
            let kelvin = UNITS.atom("<temp-K>");
            (self.base_scalar(), kelvin.into_iter().collect(), Vec::new())
        } else {
            let base = reduce_to_base(self.numerator(), self.denominator());
            (
                mul_safe(&[base.factor, self.scalar()]),
                base.numerator.clone(),
                base.denominator.clone(),
            )
        };
        Quantity::from_base_atoms(scalar, numerator, denominator)
    }

    /// Convert to other units. Results are memoized per target string; a
    /// target equal to the current units returns this same instance.
    pub fn to<'a>(&self, target: impl Into<Target<'a>>) -> Result<Quantity, QtyError> {
        let (key, target) = match target.into() {
            Target::Text(text) => {
                if let Some(hit) = self.cached_conversion(text) {
                    return Ok(hit);
                }
                let parsed = parse_expression(text)?;
                let units = Quantity::from_atoms(1.0, parsed.numerator, parsed.denominator)?;
                (text.to_string(), units)
            }
            Target::Quantity(qty) => {
                if let Some(hit) = self.cached_conversion(qty.unit()) {
                    return Ok(hit);
                }
                let units = qty.with_scalar(1.0)?;
                (qty.unit().to_string(), units)
            }
        };

        if target.unit() == self.unit() {
            return Ok(self.clone());
        }

        let converted = if !self.is_compatible(&target) {
            if !self.is_inverse(&target) {
                return Err(QtyError::incompatible(self.unit(), target.unit()));
            }
            self.inverse()?.to(&target)?
        } else if target.is_temperature() {
            temperature::to_temp(self, &target)?
        } else if target.is_degrees() {
            temperature::to_degrees(self, &target)?
        } else {
            let scalar = div_safe(self.base_scalar(), target.base_scalar())?;
            target.with_scalar(scalar)?
        };

        Ok(self.store_conversion(key, converted))
    }

    /// Scalar of a unitless quantity
    pub fn to_float(&self) -> Result<f64, QtyError> {
        if self.is_unitless() {
            Ok(self.scalar())
        } else {
            Err(QtyError::InvalidArgument(
                "Can't convert to Float unless unitless.  Use Unit#scalar".to_string(),
            ))
        }
    }

    /// Round to the nearest multiple of `precision`. A bare number is read
    /// in this quantity's units.
    pub fn to_prec<'a>(&self, precision: impl Into<Operand<'a>>) -> Result<Quantity, QtyError> {
        let precision = match precision.into() {
            Operand::Number(value) => self.with_scalar(value)?,
            operand => operand.into_quantity()?.into_owned(),
        };

        let precision = if !self.is_unitless() {
            precision.to(self)?
        } else if !precision.is_unitless() {
            return Err(QtyError::incompatible(self.unit(), precision.unit()));
        } else {
            precision
        };

        if precision.scalar() == 0.0 {
            return Err(QtyError::DivideByZero);
        }
        let steps = js_round(self.scalar() / precision.scalar());
        self.with_scalar(mul_safe(&[steps, precision.scalar()]))
    }

    /// Replace one simple unit factor (`kWh`, `m`) inside a compound unit,
    /// wherever it occurs, scaling the scalar to match.
    ///
    /// Both sides must be a single unit with an optional prefix; the
    /// factor must occur at least once.
    pub fn convert_single_unit<'a, 'b>(
        &self,
        from: impl Into<Target<'a>>,
        to: impl Into<Target<'b>>,
    ) -> Result<Quantity, QtyError> {
        let from = unit_only(from.into())?;
        let to = unit_only(to.into())?;

        if !is_unity(from.denominator()) || !is_unity(to.denominator()) {
            return Err(QtyError::InvalidArgument(
                "Units should have no denominator for a single unit conversion".to_string(),
            ));
        }
        if !is_single_unit(from.numerator()) || !is_single_unit(to.numerator()) {
            return Err(QtyError::InvalidArgument(
                "Numerator units should be a single unit with an (optional) prefix".to_string(),
            ));
        }

        let factor = from.to(&to)?.scalar();
        let inverted = to.to(&from)?.scalar();

        let mut scalar = self.scalar();
        let (numerator, hits_num) = replace_factor(self.numerator(), from.numerator(), to.numerator());
        for _ in 0..hits_num {
            scalar = mul_safe(&[scalar, factor]);
        }
        let (denominator, hits_den) =
            replace_factor(self.denominator(), from.numerator(), to.numerator());
        for _ in 0..hits_den {
            scalar = mul_safe(&[scalar, inverted]);
        }

        if hits_num + hits_den == 0 {
            return Err(QtyError::InvalidArgument(format!(
                "Unit {} not found in {}",
                from.unit(),
                self.unit()
            )));
        }
        Quantity::from_atoms(scalar, numerator, denominator)
    }
}

/// Units of a conversion target with scalar 1
fn unit_only(target: Target<'_>) -> Result<Quantity, QtyError> {
    match target {
        Target::Text(text) => {
            let parsed = parse_expression(text)?;
            Quantity::from_atoms(1.0, parsed.numerator, parsed.denominator)
        }
        Target::Quantity(qty) => qty.with_scalar(1.0),
    }
}

fn is_unity(atoms: &[Atom]) -> bool {
    matches!(atoms, [atom] if atom.is_unity())
}

fn is_single_unit(atoms: &[Atom]) -> bool {
    match atoms {
        [unit] => !unit.is_prefix() && !unit.is_unity(),
        [prefix, unit] => prefix.is_prefix() && !unit.is_prefix(),
        _ => false,
    }
}

/// Replace every occurrence of `pattern` in `atoms` in one left-to-right
/// pass. A bare unit never matches the unit half of a prefixed pair.
fn replace_factor(atoms: &[Atom], pattern: &[Atom], replacement: &[Atom]) -> (Vec<Atom>, usize) {
    let mut out = Vec::with_capacity(atoms.len());
    let mut hits = 0;
    let mut i = 0;
    while i < atoms.len() {
        let window = atoms.get(i..i + pattern.len());
        let after_prefix = i > 0 && atoms[i - 1].is_prefix();
        if window == Some(pattern) && (pattern.len() != 1 || !after_prefix) {
            out.extend_from_slice(replacement);
            hits += 1;
            i += pattern.len();
        } else {
            out.push(atoms[i]);
            i += 1;
        }
    }
    (out, hits)
}

// ========== Bulk conversion ==========

/// Precomputed converter between two units for many raw numbers.
///
/// Linear pairs multiply by a fixed ratio without the safe rounding;
/// temperature sources convert through a full quantity per value.
#[derive(Debug, Clone)]
pub struct SwiftConverter {
    mode: ConverterMode,
}

#[derive(Debug, Clone)]
enum ConverterMode {
    Identity,
    Ratio { src_base: f64, dst_base: f64 },
    Temperature { src: Quantity, dst: Quantity },
}

impl SwiftConverter {
    pub fn new(src_units: &str, dst_units: &str) -> Result<Self, QtyError> {
        let src = Quantity::parse(src_units)?;
        let dst = Quantity::parse(dst_units)?;

        let mode = if src.eq(&dst)? {
            ConverterMode::Identity
        } else if !src.is_temperature() {
            ConverterMode::Ratio {
                src_base: src.base_scalar(),
                dst_base: dst.base_scalar(),
            }
        } else {
            ConverterMode::Temperature { src, dst }
        };
        Ok(SwiftConverter { mode })
    }

    pub fn convert(&self, value: f64) -> Result<f64, QtyError> {
        match &self.mode {
            ConverterMode::Identity => Ok(value),
            ConverterMode::Ratio { src_base, dst_base } => Ok(value * src_base / dst_base),
            ConverterMode::Temperature { src, dst } => Ok(src.mul(value)?.to(dst)?.scalar()),
        }
    }

    pub fn convert_all(&self, values: &[f64]) -> Result<Vec<f64>, QtyError> {
        values.iter().map(|&value| self.convert(value)).collect()
    }
}

/// Converter from `src_units` to `dst_units`; incompatible units fail
pub fn swift_converter(src_units: &str, dst_units: &str) -> Result<SwiftConverter, QtyError> {
    SwiftConverter::new(src_units, dst_units)
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

    mod base_tests {
        use super::*;

        #[test]
        fn test_to_base() {
            let base = qty("1 km").to_base();
            assert_eq!(base.scalar(), 1000.0);
            assert_eq!(base.unit(), "m");

            let base = qty("2 N").to_base();
            assert_eq!(base.scalar(), 2.0);
            assert_eq!(base.unit(), "kg*m/s2");
        }

        #[test]
        fn test_to_base_always_lands_on_base_units() {
            for text in ["1 km/h", "2 kWh", "3 psi", "0 tempF", "4 degR", "5 mi/gal", "6 ohm"] {
                let q = qty(text);
                let base = q.to_base();
                assert!(base.is_base(), "{} -> {}", text, base);
                assert!(base.is_compatible(&q), "{}", text);
                assert!(close(base.base_scalar(), q.base_scalar()), "{}", text);
            }
        }

        #[test]
        fn test_to_base_is_identity_for_base() {
            let q = qty("3 m/s");
            assert!(q.to_base().ptr_eq(&q));
        }

        #[test]
        fn test_to_base_temperature() {
            let base = qty("0 tempC").to_base();
            assert_eq!(base.unit(), "tempK");
            assert_eq!(base.scalar(), 273.15);
        }

        #[test]
        fn test_degrees_to_base() {
            let base = qty("1 degC").to_base();
            assert_eq!(base.unit(), "K");
            assert_eq!(base.scalar(), 1.0);
        }

        #[test]
        fn test_prefix_in_denominator() {
            let base = qty("1 g/cm^3").to_base();
            assert_eq!(base.unit(), "kg/m3");
            assert!(close(base.scalar(), 1000.0));
        }

        #[test]
        fn test_reduction_shared_across_scalars() {
            let a = reduce_to_base(qty("1 ft").numerator(), qty("1 ft").denominator());
            let b = reduce_to_base(qty("7 ft").numerator(), qty("7 ft").denominator());
            assert!(Arc::ptr_eq(&a, &b));
            assert_eq!(a.factor, 0.3048);
        }
    }

    mod to_tests {
        use super::*;

        #[test]
        fn test_linear() {
            assert_eq!(qty("1 km").to("m").unwrap().scalar(), 1000.0);
            assert_eq!(qty("0.000773 m").to("um").unwrap().scalar(), 773.0);
            let lb = qty("25 kg").to("lb").unwrap();
            assert!(close(lb.scalar(), 55.11556554621939));
        }

        #[test]
        fn test_same_units_returns_self() {
            let q = qty("3 m");
            assert!(q.to("m").unwrap().ptr_eq(&q));
            assert!(q.to("meters").unwrap().ptr_eq(&q));
        }

        #[test]
        fn test_memoized() {
            let q = qty("3 m");
            let first = q.to("ft").unwrap();
            let second = q.to("ft").unwrap();
            assert!(first.ptr_eq(&second));
            assert!(first.to("ft").unwrap().ptr_eq(&first));
        }

        #[test]
        fn test_quantity_target_ignores_scalar() {
            let target = qty("3 g");
            assert_eq!(qty("25 kg").to(&target).unwrap().scalar(), 25000.0);
        }

        #[test]
        fn test_incompatible() {
            assert_eq!(
                qty("1 m").to("s").unwrap_err(),
                QtyError::incompatible("m", "s")
            );
        }

        #[test]
        fn test_inverse_units() {
            let s = qty("10 ohm").to("siemens").unwrap();
            assert_eq!(s.scalar(), 0.1);
            assert_eq!(s.kind(), Some("conductance"));
        }

        #[test]
        fn test_temperatures() {
            assert_eq!(qty("0 tempC").to("tempK").unwrap().scalar(), 273.15);
            assert_eq!(qty("0 tempK").to("tempC").unwrap().scalar(), -273.15);
            assert!((qty("0 tempF").to("tempK").unwrap().scalar() - 255.372).abs() < 1e-3);
            assert!(close(qty("0 tempC").to("tempF").unwrap().scalar(), 32.0));
        }

        #[test]
        fn test_degrees() {
            assert_eq!(qty("0 degK").to("degC").unwrap().scalar(), 0.0);
            assert_eq!(qty("10 degC").to("degF").unwrap().scalar(), 18.0);
            assert_eq!(qty("100 cm/degF").to("m/degF").unwrap().scalar(), 1.0);
        }

        #[test]
        fn test_degrees_to_temperatures() {
            assert!(close(qty("100 degC").to("tempC").unwrap().scalar(), -173.15));
            assert_eq!(qty("273.15 degC").to("tempC").unwrap().scalar(), 0.0);
        }

        #[test]
        fn test_temperatures_to_degrees() {
            assert_eq!(qty("100 tempC").to("degC").unwrap().scalar(), 100.0);
            assert_eq!(qty("0 tempF").to("degK").unwrap().scalar(), 0.0);
            assert_eq!(qty("18 tempF").to("degC").unwrap().scalar(), 10.0);
            assert_eq!(qty("10 tempC").to("degF").unwrap().scalar(), 18.0);
        }

        #[test]
        fn test_to_float() {
            assert_eq!(qty("5").to_float().unwrap(), 5.0);
            assert_eq!(qty("5 m").div("1 km").unwrap().to_float().unwrap(), 0.005);
            assert!(matches!(
                qty("5 m").to_float(),
                Err(QtyError::InvalidArgument(_))
            ));
        }
    }

    mod prec_tests {
        use super::*;

        #[test]
        fn test_to_prec() {
            assert_eq!(qty("5.17 ft").to_prec("0.05 ft").unwrap().to_string(), "5.15 ft");
            assert_eq!(qty("5.5 ft").to_prec("2 ft").unwrap().to_string(), "6 ft");
            assert_eq!(qty("0.8 cu").to_prec("0.25 cu").unwrap().to_string(), "0.75 cu");
            assert_eq!(qty("6.3782 m").to_prec("cm").unwrap().to_string(), "6.38 m");
        }

        #[test]
        fn test_to_prec_number_in_own_units() {
            assert_eq!(qty("5.5 ft").to_prec(2.0).unwrap().to_string(), "6 ft");
        }

        #[test]
        fn test_to_prec_zero() {
            assert_eq!(qty("1 m").to_prec("0 m").unwrap_err(), QtyError::DivideByZero);
        }

        #[test]
        fn test_to_prec_unitless() {
            assert_eq!(qty("7.3").to_prec(0.5).unwrap().scalar(), 7.5);
            assert!(matches!(
                qty("7.3").to_prec("1 m"),
                Err(QtyError::IncompatibleUnits { .. })
            ));
        }
    }

    mod single_unit_tests {
        use super::*;

        #[test]
        fn test_simple_units() {
            let q = qty("10 kWh");
            let mwh = q.convert_single_unit("kWh", "MWh").unwrap();
            assert_eq!(mwh.scalar(), 0.01);
            assert_eq!(mwh.unit(), "MWh");
            assert_eq!(q.convert_single_unit("kWh", "Wh").unwrap().scalar(), 10000.0);

            let q = qty("1.68784e-4 m");
            assert_eq!(q.convert_single_unit("m", "dm").unwrap().scalar(), 1.68784e-3);
            assert_eq!(q.convert_single_unit("m", "km").unwrap().scalar(), 1.68784e-7);
        }

        #[test]
        fn test_compound_units() {
            let q = qty("42 m/s");
            let km = q.convert_single_unit("m", "km").unwrap();
            assert_eq!(km.scalar(), 0.042);
            assert_eq!(km.unit(), "km/s");

            let per_hour = q.convert_single_unit("s", "h").unwrap();
            assert_eq!(per_hour.scalar(), 151200.0);
            assert_eq!(per_hour.unit(), "m/h");
        }

        #[test]
        fn test_incompatible() {
            let q = Quantity::from_number_and_unit(1337.0, "N").unwrap();
            assert!(q.convert_single_unit("N", "m").is_err());
            assert!(q.convert_single_unit("A", "J").is_err());
        }

        #[test]
        fn test_not_simple() {
            let q = Quantity::from_number_and_unit(1664.0, "m/s").unwrap();
            assert!(matches!(
                q.convert_single_unit("m/s", "km/h"),
                Err(QtyError::InvalidArgument(_))
            ));
            assert!(q.convert_single_unit("USD/kWh", "USD/MWh").is_err());
        }

        #[test]
        fn test_prefixed_unit_not_split() {
            // the meter inside "km" is not a bare meter
            let q = qty("3 km*m");
            let converted = q.convert_single_unit("m", "cm").unwrap();
            assert_eq!(converted.unit(), "km*cm");
            assert_eq!(converted.scalar(), 300.0);
        }

        #[test]
        fn test_replacement_not_rescanned() {
            let q = qty("2 m");
            let converted = q.convert_single_unit("m", "m").unwrap();
            assert_eq!(converted.scalar(), 2.0);
            assert_eq!(converted.unit(), "m");
        }

        #[test]
        fn test_factor_not_found() {
            assert!(matches!(
                qty("2 m").convert_single_unit("s", "h"),
                Err(QtyError::InvalidArgument(_))
            ));
        }
    }

    mod swift_tests {
        use super::*;

        #[test]
        fn test_identity() {
            let convert = swift_converter("m", "meter").unwrap();
            assert_eq!(convert.convert(2.5).unwrap(), 2.5);
        }

        #[test]
        fn test_ratio() {
            let convert = swift_converter("m/h", "m/s").unwrap();
            let expected = qty("2500 m/h").to("m/s").unwrap().scalar();
            assert_eq!(convert.convert(2500.0).unwrap(), expected);
        }

        #[test]
        fn test_convert_all() {
            let convert = swift_converter("MPa", "bar").unwrap();
            let all = convert.convert_all(&[250.0, 10.0, 15.0]).unwrap();
            assert_eq!(all, vec![2500.0, 100.0, 150.0]);
        }

        #[test]
        fn test_degrees() {
            let convert = swift_converter("degC", "degF").unwrap();
            assert_eq!(convert.convert(10.0).unwrap(), 18.0);
        }

        #[test]
        fn test_temperature_source() {
            let convert = swift_converter("tempF", "tempC").unwrap();
            assert_eq!(convert.convert(32.0).unwrap(), 0.0);
            let convert = swift_converter("tempC", "tempK").unwrap();
            assert_eq!(convert.convert(0.0).unwrap(), 273.15);
            assert!(convert.convert(-300.0).is_err());
        }

        #[test]
        fn test_incompatible() {
            assert!(matches!(
                swift_converter("m", "s"),
                Err(QtyError::IncompatibleUnits { .. })
            ));
        }
    }
}
