//! Exchange fee presets for crypto and futures venues.
//!
//! Base VIP-0 maker/taker rates. Adding a venue is a one-line change to
//! [`EXCHANGE_PRESETS`].

use serde::{Deserialize, Serialize};

use crate::calculator::{finite_or_zero, parse_number};

/// Fee side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Adds liquidity.
    Maker,
    /// Takes liquidity.
    #[default]
    Taker,
}

/// Maker/taker fees of one exchange, as fractions (0.00045 = 0.045%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePreset {
    /// Exchange name.
    pub name: &'static str,
    /// Maker fee.
    pub maker_fee: f64,
    /// Taker fee.
    pub taker_fee: f64,
}

impl ExchangePreset {
    /// Fee rate for `order_type`.
    #[must_use]
    pub const fn fee(&self, order_type: OrderType) -> f64 {
        match order_type {
            OrderType::Maker => self.maker_fee,
            OrderType::Taker => self.taker_fee,
        }
    }
}

/// Known exchanges.
pub const EXCHANGE_PRESETS: &[ExchangePreset] = &[
    ExchangePreset { name: "Binance", maker_fee: 0.000_20, taker_fee: 0.000_45 },
    ExchangePreset { name: "Bybit", maker_fee: 0.000_20, taker_fee: 0.000_55 },
    ExchangePreset { name: "OKX", maker_fee: 0.000_20, taker_fee: 0.000_50 },
    ExchangePreset { name: "Hyperliquid", maker_fee: 0.000_15, taker_fee: 0.000_45 },
    ExchangePreset { name: "Gate.io", maker_fee: 0.000_15, taker_fee: 0.000_50 },
    ExchangePreset { name: "MEXC", maker_fee: 0.0, taker_fee: 0.000_50 },
];

/// Preset selected when nothing else is chosen.
pub const DEFAULT_EXCHANGE: &str = "Binance";

/// Look up a preset by exact name. `Custom` and unknown names return `None`.
#[must_use]
pub fn preset(name: &str) -> Option<&'static ExchangePreset> {
    EXCHANGE_PRESETS.iter().find(|p| p.name == name)
}

/// `0.00045` becomes `"0.045"`.
#[must_use]
pub fn fee_to_percent(fee: f64) -> String {
    format!("{:.3}", fee * 100.0)
}

/// `"0.045"` becomes `0.00045`. Unparsable input is a zero fee.
#[must_use]
pub fn percent_to_fee(percent: &str) -> f64 {
    parse_number(percent) / 100.0
}

/// Round-trip trading cost of a position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    /// Fee on the opening notional.
    pub entry_fee: f64,
    /// Fee on the closing notional.
    pub exit_fee: f64,
    /// Both legs.
    pub total_fees: f64,
    /// Gross profit less both legs.
    pub net_profit: f64,
}

/// Estimate fees for opening at `entry_value` and closing at `exit_value`.
///
/// Both legs pay `fee_rate` on their own notional.
#[must_use]
pub fn estimate_fees(entry_value: f64, exit_value: f64, fee_rate: f64, gross_profit: f64) -> FeeEstimate {
    let entry_fee = finite_or_zero(entry_value.abs() * fee_rate);
    let exit_fee = finite_or_zero(exit_value.abs() * fee_rate);
    let total_fees = entry_fee + exit_fee;
    FeeEstimate {
        entry_fee,
        exit_fee,
        total_fees,
        net_profit: finite_or_zero(gross_profit - total_fees),
    }
}
