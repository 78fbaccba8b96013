//! Float-safe arithmetic
//!
//! Binary doubles turn `0.1 * 0.1` into `0.010000000000000002`. The helpers
//! here count the decimal digits of every operand and round the raw IEEE
//! result back to that many digits. Rounding is half-up toward +infinity
//! and scalars render the way a JavaScript `Number` does, so results stay
//! identical across hosts that share unit data with JS tooling.

use crate::QtyError;

/// Powers of ten exactly representable as f64
const EXACT_POWERS: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Correctly rounded 10^exp
fn pow10(exp: i32) -> f64 {
    if exp >= 0 {
        if let Some(p) = EXACT_POWERS.get(exp as usize) {
            return *p;
        }
    }
    // The decimal parser rounds correctly; repeated multiplication does not.
    format!("1e{}", exp).parse().unwrap_or(f64::NAN)
}

/// Number of decimal digits needed to make `value` integral.
///
/// Non-finite values have none.
pub fn fractional_digits(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let mut x = value;
    let mut count = 0u32;
    while x % 1.0 != 0.0 {
        x *= 10.0;
        count += 1;
        if !x.is_finite() {
            break;
        }
    }
    count
}

/// Round half up toward +infinity (`-2.5` rounds to `-2`)
pub fn js_round(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round `value` to `decimals` decimal places.
///
/// Returns `value` untouched when scaling would overflow.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = pow10(decimals);
    let scaled = value * factor;
    if !factor.is_finite() || factor == 0.0 || !scaled.is_finite() {
        return value;
    }
    js_round(scaled) / factor
}

/// Multiply all factors, rounding the product to the sum of their decimal digits.
pub fn mul_safe(factors: &[f64]) -> f64 {
    let mut result = 1.0;
    let mut decimals = 0u32;
    for &factor in factors {
        decimals = decimals.saturating_add(fractional_digits(factor));
        result *= factor;
    }
    if decimals == 0 {
        return result;
    }
    round_to(result, i32::try_from(decimals).unwrap_or(i32::MAX))
}

/// Divide through an inverted, digit-scaled denominator.
///
/// `0.3 / 0.05` gives `6` rather than `5.999999999999999`.
pub fn div_safe(numerator: f64, denominator: f64) -> Result<f64, QtyError> {
    if denominator == 0.0 {
        return Err(QtyError::DivideByZero);
    }
    let digits = i32::try_from(fractional_digits(denominator)).unwrap_or(i32::MAX);
    let factor = pow10(digits);
    let inverse = factor / (factor * denominator);
    Ok(mul_safe(&[numerator, inverse]))
}

/// Render a scalar the way `Number.prototype.toString` does:
/// plain decimal notation for magnitudes in `[1e-6, 1e21)`, exponent
/// notation with an explicit exponent sign otherwise.
pub fn format_scalar(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }
    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}
