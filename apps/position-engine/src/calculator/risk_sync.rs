//! Two-way derivation between the percent and fiat risk fields.
//!
//! The authoritative field (per [`RiskMode`]) drives the other one. Callers run
//! this after any change to balance, risk mode or either risk value, before
//! computing.

use super::parse::parse_number;
use super::types::{CalculatorInputs, RiskMode};

/// Rewrite the non-authoritative risk field from the authoritative one.
///
/// Derived values are written with two decimals.
pub fn sync_risk(inputs: &mut CalculatorInputs) {
    let balance = parse_number(&inputs.balance);
    match inputs.risk_mode {
        RiskMode::Percent => {
            let percent = parse_number(&inputs.risk_percent);
            inputs.risk_fiat = format!("{:.2}", fiat_from_percent(balance, percent));
        }
        RiskMode::Fiat => {
            let fiat = parse_number(&inputs.risk_fiat);
            inputs.risk_percent = format!("{:.2}", percent_from_fiat(balance, fiat));
        }
    }
}

/// Currency amount at risk for `percent` of `balance`.
#[must_use]
pub fn fiat_from_percent(balance: f64, percent: f64) -> f64 {
    balance * percent / 100.0
}

/// Percentage of `balance` that `fiat` represents. Zero when there is no balance.
#[must_use]
pub fn percent_from_fiat(balance: f64, fiat: f64) -> f64 {
    if balance > 0.0 {
        fiat / balance * 100.0
    } else {
        0.0
    }
}
