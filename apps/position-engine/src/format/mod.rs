//! Locale-aware rendering of calculator numbers.
//!
//! Rounding is half away from zero on the decimal value, so `0.125` renders
//! as `0.13` in every locale. Non-finite inputs render as zero.

mod locale;

pub use locale::{SupportedLocale, UnsupportedLocale, detect_locale};

use locale::{Grouping, SymbolPosition};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::calculator::finite_or_zero;

const CURRENCY_DECIMALS: u32 = 2;
const PERCENT_DECIMALS: u32 = 2;

/// Render `value` with up to `max_decimals` fraction digits, trailing zeros trimmed.
#[must_use]
pub fn format_number(value: f64, locale: SupportedLocale, max_decimals: u32) -> String {
    let (negative, body) = render(value, locale, 0, max_decimals);
    if negative { format!("-{body}") } else { body }
}

/// Render `value` as money in the locale's currency, always two decimals.
#[must_use]
pub fn format_currency(value: f64, locale: SupportedLocale) -> String {
    let (negative, body) = render(value, locale, CURRENCY_DECIMALS, CURRENCY_DECIMALS);
    let sign = if negative { "-" } else { "" };
    let symbol = locale.currency_symbol();
    let spacing = locale.symbol_spacing();
    match locale.symbol_position() {
        SymbolPosition::Prefix => format!("{sign}{symbol}{spacing}{body}"),
        SymbolPosition::Suffix => format!("{sign}{body}{spacing}{symbol}"),
    }
}

/// Render a value already in percent units (`1.5` is 1.5%), two decimals.
#[must_use]
pub fn format_percentage(value: f64, locale: SupportedLocale) -> String {
    let (negative, body) = render(value, locale, PERCENT_DECIMALS, PERCENT_DECIMALS);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{body}{}%", locale.percent_spacing())
}

/// Returns the sign separately so callers can place it around a symbol.
fn render(value: f64, locale: SupportedLocale, min_decimals: u32, max_decimals: u32) -> (bool, String) {
    let decimal = Decimal::from_f64(finite_or_zero(value)).unwrap_or(Decimal::ZERO);
    let rounded = decimal.round_dp_with_strategy(max_decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = rounded.abs().to_string();
    let (int_digits, frac_digits) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let mut fraction = frac_digits.trim_end_matches('0').to_string();
    let min_len = min_decimals as usize;
    while fraction.len() < min_len {
        fraction.push('0');
    }

    let mut body = group_integer(int_digits, locale.group_separator(), locale.grouping());
    if !fraction.is_empty() {
        body.push_str(locale.decimal_separator());
        body.push_str(&fraction);
    }
    (negative, body)
}

fn group_integer(digits: &str, separator: &str, grouping: Grouping) -> String {
    let len = digits.len();
    let boundaries: Vec<usize> = match grouping {
        Grouping::Thousands { min_digits } => {
            if len < 3 + min_digits {
                return digits.to_string();
            }
            (1..=(len - 1) / 3).map(|i| len - 3 * i).rev().collect()
        }
        Grouping::Indian => {
            if len <= 3 {
                return digits.to_string();
            }
            let head = len - 3;
            let mut cuts: Vec<usize> = (1..=(head - 1) / 2).map(|i| head - 2 * i).rev().collect();
            cuts.push(head);
            cuts
        }
    };

    let mut out = String::with_capacity(len + boundaries.len() * separator.len());
    let mut start = 0;
    for cut in boundaries {
        out.push_str(&digits[start..cut]);
        out.push_str(separator);
        start = cut;
    }
    out.push_str(&digits[start..]);
    out
}
