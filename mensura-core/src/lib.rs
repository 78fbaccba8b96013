//! Mensura Core - Fundamental types
//!
//! This crate provides the types shared by the unit engine and its hosts:
//! - `QtyError`: every failure a quantity operation can raise
//! - `ErrorReport`: structured error view for hosts
//! - float-safe `mul_safe` / `div_safe` / `round_to` helpers and JS-style
//!   scalar rendering

mod error;
mod numeric;

pub use error::{codes, ErrorReport, QtyError};
pub use numeric::{div_safe, format_scalar, fractional_digits, js_round, mul_safe, round_to};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{div_safe, mul_safe, ErrorReport, QtyError};
}
