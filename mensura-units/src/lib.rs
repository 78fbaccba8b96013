//! Mensura Units - Physical quantities with dimensional analysis
//!
//! Parses quantity strings such as `"2.5 kg*m/s^2"` into immutable
//! [`Quantity`] values and supports arithmetic, comparison and conversion
//! between compatible units, including affine temperature scales.
//!
//! Pieces:
//! - `parse`: scanner turning unit expressions into prefix/unit atoms
//! - `algebra`: term combination behind `mul` and `div`
//! - `signature`: packed dimension vectors for O(1) compatibility checks
//! - `convert` / `temperature`: base reduction, linear and affine conversion
//! - `kind`: kind names and registry introspection
//!
//! ```ignore
//! use mensura_units::Quantity;
//!
//! let speed = Quantity::parse("36 km/h")?;
//! assert_eq!(speed.to("m/s")?.scalar(), 10.0);
//! ```

mod algebra;
mod convert;
mod definitions;
mod format;
mod kind;
mod parse;
mod quantity;
mod registry;
mod signature;
mod temperature;

pub use algebra::{clean_terms, CombinedTerms};
pub use convert::{swift_converter, SwiftConverter};
pub use definitions::{UnitDef, BASE_UNITS, DEFINITIONS};
pub use format::default_formatter;
pub use kind::{get_aliases, get_kinds, get_units, kind_of};
pub use parse::{parse_expression, parse_units, ParsedQuantity};
pub use quantity::{Operand, Quantity, QuantityRecord, Target};
pub use registry::{Atom, UnitRegistry, UNITS};
pub use signature::{DimensionVector, SIGNATURE_VECTOR};
pub use temperature::TempScale;

pub use mensura_core::{div_safe, mul_safe, round_to, QtyError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a quantity string, `None` when it is not a valid quantity
pub fn parse_quantity(text: &str) -> Option<Quantity> {
    Quantity::parse(text).ok()
}
