//! Temperature scales
//!
//! Absolute temperatures (`tempC`) are points on an affine scale and
//! convert with an offset; temperature degrees (`degC`) are differences
//! and convert with the slope alone.

use mensura_core::QtyError;

use crate::quantity::Quantity;
use crate::registry::Atom;

/// Offset between 0 °C and 0 K
const CELSIUS_OFFSET: f64 = 273.15;
/// Offset between 0 °F and 0 °R
const FAHRENHEIT_OFFSET: f64 = 459.67;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempScale {
    Kelvin,
    Celsius,
    Fahrenheit,
    Rankine,
}

impl TempScale {
    /// Scale of an absolute temperature atom (`<temp-C>`)
    pub fn of_temperature(atom: Atom) -> Option<Self> {
        match atom.id() {
            "<temp-K>" => Some(TempScale::Kelvin),
            "<temp-C>" => Some(TempScale::Celsius),
            "<temp-F>" => Some(TempScale::Fahrenheit),
            "<temp-R>" => Some(TempScale::Rankine),
            _ => None,
        }
    }

    /// Scale of a temperature degree atom (`<celsius>`)
    pub fn of_degree(atom: Atom) -> Option<Self> {
        match atom.id() {
            "<kelvin>" => Some(TempScale::Kelvin),
            "<celsius>" => Some(TempScale::Celsius),
            "<fahrenheit>" => Some(TempScale::Fahrenheit),
            "<rankine>" => Some(TempScale::Rankine),
            _ => None,
        }
    }

    /// Scale of either atom family
    pub fn of_atom(atom: Atom) -> Option<Self> {
        Self::of_temperature(atom).or_else(|| Self::of_degree(atom))
    }

    /// Unit string of this scale's degree
    pub fn degree_units(self) -> &'static str {
        match self {
            TempScale::Kelvin => "degK",
            TempScale::Celsius => "degC",
            TempScale::Fahrenheit => "degF",
            TempScale::Rankine => "degR",
        }
    }

    /// Absolute reading on this scale -> kelvin
    pub fn to_kelvin(self, value: f64) -> f64 {
        match self {
            TempScale::Kelvin => value,
            TempScale::Celsius => value + CELSIUS_OFFSET,
            TempScale::Fahrenheit => (value + FAHRENHEIT_OFFSET) * 5.0 / 9.0,
            TempScale::Rankine => value * 5.0 / 9.0,
        }
    }

    /// Kelvin -> absolute reading on this scale
    pub fn from_kelvin(self, kelvin: f64) -> f64 {
        match self {
            TempScale::Kelvin => kelvin,
            TempScale::Celsius => kelvin - CELSIUS_OFFSET,
            TempScale::Fahrenheit => kelvin * 9.0 / 5.0 - FAHRENHEIT_OFFSET,
            TempScale::Rankine => kelvin * 9.0 / 5.0,
        }
    }

    /// Degree difference on this scale -> kelvin difference
    fn degrees_to_kelvin(self, value: f64) -> f64 {
        match self {
            TempScale::Kelvin | TempScale::Celsius => value,
            TempScale::Fahrenheit | TempScale::Rankine => value * 5.0 / 9.0,
        }
    }

    /// Kelvin difference -> degree difference on this scale
    fn kelvin_to_degrees(self, kelvin: f64) -> f64 {
        match self {
            TempScale::Kelvin | TempScale::Celsius => kelvin,
            TempScale::Fahrenheit | TempScale::Rankine => kelvin * 9.0 / 5.0,
        }
    }
}

/// Single-atom scale of a quantity in the degree or temperature state
fn scale_of(qty: &Quantity) -> Option<TempScale> {
    if qty.is_degrees() {
        qty.numerator().first().copied().and_then(TempScale::of_atom)
    } else {
        None
    }
}

/// Convert `src` to the absolute temperature units of `dst`.
///
/// The source is read as kelvin through its base scalar, so a degree
/// source lands its magnitude onto 0 K.
pub(crate) fn to_temp(src: &Quantity, dst: &Quantity) -> Result<Quantity, QtyError> {
    let scale = scale_of(dst)
        .filter(|_| dst.is_temperature())
        .ok_or_else(|| QtyError::temperature("Unknown type for temperature conversion"))?;
    Quantity::from_atoms(
        scale.from_kelvin(src.base_scalar()),
        dst.numerator().to_vec(),
        dst.denominator().to_vec(),
    )
}

/// Convert `src` to the degree units of `dst`, dropping any offset.
pub(crate) fn to_degrees(src: &Quantity, dst: &Quantity) -> Result<Quantity, QtyError> {
    let scale = scale_of(dst)
        .ok_or_else(|| QtyError::temperature("Unknown type for degree conversion"))?;
    let kelvin = match scale_of(src) {
        Some(src_scale) if src.is_temperature() => src_scale.degrees_to_kelvin(src.scalar()),
        _ => src.base_scalar(),
    };
    Quantity::from_atoms(
        scale.kelvin_to_degrees(kelvin),
        dst.numerator().to_vec(),
        dst.denominator().to_vec(),
    )
}

/// `temp ± deg`: the degree is read on the temperature's own scale.
pub(crate) fn shift_temperature(
    temp: &Quantity,
    deg: &Quantity,
    sign: f64,
) -> Result<Quantity, QtyError> {
    let scale = scale_of(temp)
        .ok_or_else(|| QtyError::temperature("Unknown temperature units"))?;
    let shift = deg.to(scale.degree_units())?;
    Quantity::from_atoms(
        temp.scalar() + sign * shift.scalar(),
        temp.numerator().to_vec(),
        temp.denominator().to_vec(),
    )
}

/// `temp - temp`: the difference is a degree on the left operand's scale.
pub(crate) fn difference(lhs: &Quantity, rhs: &Quantity) -> Result<Quantity, QtyError> {
    let scale = scale_of(lhs)
        .ok_or_else(|| QtyError::temperature("Unknown temperature units"))?;
    let rhs = rhs.to(lhs)?;
    let degrees = Quantity::parse(scale.degree_units())?;
    Quantity::from_atoms(
        lhs.scalar() - rhs.scalar(),
        degrees.numerator().to_vec(),
        degrees.denominator().to_vec(),
    )
}
