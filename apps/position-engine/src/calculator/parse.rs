//! Permissive numeric parsing for text inputs.
//!
//! Inputs arrive exactly as typed, so half-finished values like `"1."`, `"-"`
//! or `"12abc"` are normal. Nothing here fails: anything that does not start
//! with a number reads as zero.

use super::types::CalculatorInputs;

/// Numeric view of [`CalculatorInputs`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericInputs {
    /// Account balance.
    pub balance: f64,
    /// Risk percentage.
    pub risk_percent: f64,
    /// Risk amount.
    pub risk_fiat: f64,
    /// Entry price.
    pub entry: f64,
    /// Stop loss price.
    pub stop_loss: f64,
    /// Stop loss distance in pips.
    pub stop_loss_pips: f64,
    /// Target price.
    pub target: f64,
    /// Leverage, never below or at zero.
    pub leverage: f64,
    /// Futures lot size, never below or at zero.
    pub lot_size: f64,
}

impl NumericInputs {
    /// Parse every numeric field of `inputs`.
    #[must_use]
    pub fn parse(inputs: &CalculatorInputs) -> Self {
        Self {
            balance: parse_number(&inputs.balance),
            risk_percent: parse_number(&inputs.risk_percent),
            risk_fiat: parse_number(&inputs.risk_fiat),
            entry: parse_number(&inputs.entry_price),
            stop_loss: parse_number(&inputs.stop_loss_price),
            stop_loss_pips: parse_number(&inputs.stop_loss_pips),
            target: parse_number(&inputs.target_price),
            leverage: parse_leverage(&inputs.leverage),
            lot_size: parse_lot_size(&inputs.lot_size),
        }
    }
}

/// Parse the longest numeric prefix of `raw`, falling back to 0.
#[must_use]
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let prefix = numeric_prefix(trimmed);
    if prefix.is_empty() {
        return 0.0;
    }
    prefix
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a leverage multiplier. Anything not strictly positive means 1x.
#[must_use]
pub fn parse_leverage(raw: &str) -> f64 {
    positive_or_one(parse_number(raw))
}

/// Parse a futures lot size. Anything not strictly positive means 1.
#[must_use]
pub fn parse_lot_size(raw: &str) -> f64 {
    positive_or_one(parse_number(raw))
}

/// Whether the field holds anything besides whitespace.
#[must_use]
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Replace NaN and infinities with 0.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn positive_or_one(value: f64) -> f64 {
    if value > 0.0 { value } else { 1.0 }
}

/// The leading `[+-]digits[.digits][e[+-]digits]` run.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}
