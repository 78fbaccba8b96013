//! Quantity errors
//!
//! Every failure in the engine is a synchronous validation failure: nothing
//! is retried and nothing is partially applied. Hosts that need structured
//! output turn a `QtyError` into an `ErrorReport`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
    pub const TEMPERATURE_DOMAIN: &str = "TEMPERATURE_DOMAIN";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const UNKNOWN_KIND: &str = "UNKNOWN_KIND";
}

/// Error type for quantity operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QtyError {
    /// Malformed literal, malformed exponent or unknown unit token
    #[error("{0}")]
    Parse(String),

    /// Constructor or operand of the wrong shape
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Incompatible units: {left} and {right}")]
    IncompatibleUnits { left: String, right: String },

    /// Below absolute zero, or arithmetic that has no meaning on a temperature scale
    #[error("{0}")]
    TemperatureDomain(String),

    #[error("Divide by zero")]
    DivideByZero,

    #[error("Kind not recognized: {0}")]
    UnknownKind(String),
}

impl QtyError {
    pub fn unit_not_recognized() -> Self {
        QtyError::Parse("Unit not recognized".to_string())
    }

    pub fn quantity_not_recognized() -> Self {
        QtyError::Parse("Quantity not recognized".to_string())
    }

    pub fn incompatible(left: impl Into<String>, right: impl Into<String>) -> Self {
        QtyError::IncompatibleUnits {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn temperature(details: impl Into<String>) -> Self {
        QtyError::TemperatureDomain(details.into())
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            QtyError::Parse(_) => codes::PARSE_ERROR,
            QtyError::InvalidArgument(_) => codes::INVALID_ARGUMENT,
            QtyError::IncompatibleUnits { .. } => codes::INCOMPATIBLE_UNITS,
            QtyError::TemperatureDomain(_) => codes::TEMPERATURE_DOMAIN,
            QtyError::DivideByZero => codes::DIV_ZERO,
            QtyError::UnknownKind(_) => codes::UNKNOWN_KIND,
        }
    }

    /// Suggestion for fixing the error, when there is an obvious one
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            QtyError::Parse(_) => Some("Check the number and unit spelling, e.g. \"2.5 kg*m/s^2\""),
            QtyError::IncompatibleUnits { .. } => {
                Some("Both sides must measure the same kind of quantity")
            }
            QtyError::DivideByZero => Some("Ensure divisor is not zero"),
            QtyError::UnknownKind(_) => Some("List valid kinds with list_kinds"),
            QtyError::InvalidArgument(_) | QtyError::TemperatureDomain(_) => None,
        }
    }
}

/// Structured error for hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&QtyError> for ErrorReport {
    fn from(err: &QtyError) -> Self {
        ErrorReport {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion: err.suggestion().map(str::to_string),
        }
    }
}

impl From<QtyError> for ErrorReport {
    fn from(err: QtyError) -> Self {
        ErrorReport::from(&err)
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}
