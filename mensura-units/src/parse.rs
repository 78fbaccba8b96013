//! Quantity string parsing - turn "2.5 kg*m/s^2" into a scalar plus
//! normalized atom sequences
//!
//! Supported formats:
//! - Bare numbers: "2", "-1.5e3", "- 4" (sign may be spaced from the digits)
//! - Bare units: "kg", "GPa" (scalar defaults to 1)
//! - Products: "kg*m", "kg m", "N m"
//! - Quotients: "m/s", "kg/m^2"
//! - Powers: "m2", "m^2", "m**2", "s^-1" (exponents -4..=4)
//!
//! Parsing runs in two passes: exponents are expanded by literal
//! repetition ("m^2 s^-1" becomes "m m " over "s "), then each side is
//! scanned into `[prefix?, unit]` atoms, longest match first.

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use mensura_core::QtyError;

use crate::registry::{Atom, UNITS};

/// Highest supported power of a single unit
const MAX_EXPONENT: u32 = 4;

/// Process-wide cache of tokenized unit expressions
static PARSED_UNITS: LazyLock<RwLock<HashMap<String, Vec<Atom>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Result of parsing a quantity string
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    pub scalar: f64,
    pub numerator: Vec<Atom>,
    pub denominator: Vec<Atom>,
}

/// Parse a quantity string
pub fn parse_expression(text: &str) -> Result<ParsedQuantity, QtyError> {
    let text = text.trim();
    let (literal, rest) = split_number(text);

    let scalar = match literal {
        Some(literal) => {
            let compact: String = literal.chars().filter(|c| !c.is_whitespace()).collect();
            let value = compact
                .parse::<f64>()
                .map_err(|_| QtyError::quantity_not_recognized())?;
            // "1e400" overflows to infinity
            if !value.is_finite() {
                return Err(QtyError::quantity_not_recognized());
            }
            value
        }
        None => 1.0,
    };

    let rest = rest.trim_start();
    let (top, bottom) = match rest.split_once('/') {
        Some((top, bottom)) => {
            if bottom.is_empty() || bottom.contains(is_line_terminator) {
                return Err(QtyError::quantity_not_recognized());
            }
            (top.to_string(), bottom.to_string())
        }
        None => (rest.to_string(), String::new()),
    };

    let (top, bottom) = expand_exponents(top, bottom)?;

    let numerator = if top.trim().is_empty() {
        Vec::new()
    } else {
        parse_units(top.trim())?
    };
    let denominator = if bottom.trim().is_empty() {
        Vec::new()
    } else {
        parse_units(bottom.trim())?
    };

    Ok(ParsedQuantity {
        scalar,
        numerator,
        denominator,
    })
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Split a leading numeric literal off `text`.
///
/// Accepts `[+-]? \s* (digits (. digits)? | . digits) ([eE] [+-]? digits)?`.
fn split_number(text: &str) -> (Option<&str>, &str) {
    let bytes = text.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos = 1;
        // interior whitespace between sign and mantissa
        while let Some(c) = text[pos..].chars().next() {
            if !c.is_whitespace() {
                break;
            }
            pos += c.len_utf8();
        }
    }

    let digits = |from: usize| -> usize {
        bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
    };

    let int_len = digits(pos);
    let mut end = pos + int_len;
    if int_len > 0 {
        if bytes.get(end) == Some(&b'.') {
            let frac_len = digits(end + 1);
            if frac_len > 0 {
                end += 1 + frac_len;
            }
        }
    } else if bytes.get(end) == Some(&b'.') {
        let frac_len = digits(end + 1);
        if frac_len == 0 {
            return (None, text);
        }
        end += 1 + frac_len;
    } else {
        return (None, text);
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_len = digits(exp);
        if exp_len > 0 {
            end = exp + exp_len;
        }
    }

    (Some(&text[..end]), &text[end..])
}

/// A `<unit><power>` occurrence found inside a unit expression
#[derive(Debug, PartialEq)]
struct Power {
    start: usize,
    end: usize,
    base_end: usize,
    exponent: i32,
}

/// Characters a powered unit may be spelled with
fn is_unit_char(c: char) -> bool {
    c != ' ' && c != '*' && !c.is_ascii_digit()
}

/// Leftmost `<unit>[^|**]<digit>` occurrence, shortest unit first.
///
/// The digit must not be followed by an ASCII letter ("cmH2O" is a unit,
/// not `cmH` squared), and a second digit means the power is out of range.
fn find_power(text: &str, allow_negative: bool) -> Result<Option<Power>, QtyError> {
    // A later start inside the same run of unit characters can only see the
    // candidate ends its run start already saw, so one pass per run suffices.
    let mut run_start = None;
    for (offset, c) in text.char_indices() {
        if !is_unit_char(c) {
            run_start = None;
            continue;
        }
        let start = *run_start.get_or_insert(offset);
        let base_end = offset + c.len_utf8();
        if let Some(found) = match_exponent(text, start, base_end, allow_negative)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn match_exponent(
    text: &str,
    start: usize,
    base_end: usize,
    allow_negative: bool,
) -> Result<Option<Power>, QtyError> {
    let rest = &text[base_end..];
    let operators: &[&str] = if rest.starts_with('^') {
        &["^", ""]
    } else if rest.starts_with("**") {
        &["**", ""]
    } else {
        &[""]
    };

    for op in operators {
        let after_op = &rest[op.len()..];
        let (negative, digits) = match after_op.strip_prefix('-') {
            Some(tail) if allow_negative => (true, tail),
            _ => (false, after_op),
        };
        let bytes = digits.as_bytes();
        let power = match bytes.first() {
            Some(b) if b.is_ascii_digit() => u32::from(b - b'0'),
            _ => continue,
        };
        if matches!(bytes.get(1), Some(b) if b.is_ascii_alphabetic()) {
            continue;
        }
        let oversized = matches!(bytes.get(1), Some(b) if b.is_ascii_digit());
        if power > MAX_EXPONENT || oversized {
            if op.is_empty() {
                // "m5" is not a power, and "180" is not a unit
                continue;
            }
            return Err(QtyError::Parse(format!(
                "Unit exponent out of supported range (-{max}..{max})",
                max = MAX_EXPONENT
            )));
        }
        let exponent = if negative { -(power as i32) } else { power as i32 };
        let end = base_end + op.len() + usize::from(negative) + 1;
        return Ok(Some(Power {
            start,
            end,
            base_end,
            exponent,
        }));
    }
    Ok(None)
}

/// Rewrite every powered unit by repetition; negative powers move to the bottom.
fn expand_exponents(mut top: String, mut bottom: String) -> Result<(String, String), QtyError> {
    while let Some(power) = find_power(&top, true)? {
        let base = &top[power.start..power.base_end];
        if power.exponent == 0 && parse_units(base).is_err() {
            return Err(QtyError::unit_not_recognized());
        }
        let repeated = format!("{} ", base).repeat(power.exponent.unsigned_abs() as usize);
        if power.exponent >= 0 {
            top.replace_range(power.start..power.end, &repeated);
        } else {
            top.replace_range(power.start..power.end, "");
            if !bottom.is_empty() {
                bottom.push(' ');
            }
            bottom.push_str(&repeated);
        }
    }

    while let Some(power) = find_power(&bottom, false)? {
        let base = &bottom[power.start..power.base_end];
        if power.exponent == 0 && parse_units(base).is_err() {
            return Err(QtyError::unit_not_recognized());
        }
        let repeated = format!("{} ", base).repeat(power.exponent as usize);
        bottom.replace_range(power.start..power.end, &repeated);
    }

    Ok((top, bottom))
}

/// ASCII word character, as a regex `\w` sees it
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A token may end at the end of input or at a word/non-word transition
fn at_boundary(text: &str, end: usize) -> bool {
    let Some(next) = text[end..].chars().next() else {
        return true;
    };
    match text[..end].chars().next_back() {
        Some(prev) => is_word(prev) != is_word(next),
        None => false,
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '*'
}

/// Match one `[prefix]unit` token at the start of `text`.
///
/// Bare units are tried before prefixed ones so that "min" is a minute
/// and "cd" a candela; within each pass longer tokens win.
fn match_token(text: &str) -> Option<(usize, Option<Atom>, Atom)> {
    for (len, unit) in UNITS.units_at(text) {
        if at_boundary(text, len) {
            return Some((len, None, unit));
        }
    }
    for (prefix_len, prefix) in UNITS.prefixes_at(text) {
        let rest = &text[prefix_len..];
        for (len, unit) in UNITS.units_at(rest) {
            if at_boundary(text, prefix_len + len) {
                return Some((prefix_len + len, Some(prefix), unit));
            }
        }
    }
    None
}

/// Tokenize a unit expression into normalized atoms.
///
/// Results are cached per exact expression string.
pub fn parse_units(units: &str) -> Result<Vec<Atom>, QtyError> {
    {
        let cache = PARSED_UNITS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(atoms) = cache.get(units) {
            return Ok(atoms.clone());
        }
    }

    let mut atoms = Vec::new();
    let mut matched = false;
    let mut pos = 0;
    while pos < units.len() {
        let rest = &units[pos..];
        if let Some(c) = rest.chars().next().filter(|c| is_separator(*c)) {
            pos += c.len_utf8();
            continue;
        }
        let (len, prefix, unit) = match_token(rest).ok_or_else(QtyError::unit_not_recognized)?;
        if let Some(prefix) = prefix {
            atoms.push(prefix);
        }
        atoms.push(unit);
        matched = true;
        pos += len;
    }
    if !matched {
        return Err(QtyError::unit_not_recognized());
    }
    atoms.retain(|atom| !atom.is_unity());

    tracing::trace!(units, atoms = atoms.len(), "caching parsed units");
    PARSED_UNITS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(units.to_string(), atoms.clone());
    Ok(atoms)
}
