//! Trading costs layered on top of a sized position.
//!
//! - `fees`: maker/taker presets for crypto and futures exchanges
//! - `india`: statutory charges and tax for NSE/BSE equity trades

mod fees;
mod india;

pub use fees::{
    DEFAULT_EXCHANGE, EXCHANGE_PRESETS, ExchangePreset, FeeEstimate, OrderType, estimate_fees,
    fee_to_percent, percent_to_fee, preset,
};
pub use india::{IndiaCharges, IndiaTradeMode, calculate_india_charges, max_margin_quantity};
