//! Position size calculator.
//!
//! Turns the raw text inputs of the calculator form into position size,
//! notional value, margin, risk and reward. The computation is pure and total:
//! bad input produces zeros and messages, never an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use position_engine::calculator::{AssetClass, CalculatorInputs, PositionSizeEngine, TouchedFields};
//! use position_engine::instruments::ForexPairTable;
//!
//! let pairs = ForexPairTable::standard();
//! let engine = PositionSizeEngine::new(&pairs);
//!
//! let inputs = CalculatorInputs {
//!     asset_class: AssetClass::Crypto,
//!     balance: "25000".into(),
//!     risk_percent: "1".into(),
//!     entry_price: "45000".into(),
//!     stop_loss_price: "43500".into(),
//!     ..Default::default()
//! };
//!
//! let out = engine.compute(&inputs, &TouchedFields::new());
//! assert_eq!(out.risk_amount, 250.0); // 1% of 25k, 0.1667 BTC at a 1500 stop
//! ```

mod engine;
mod parse;
mod risk_sync;
mod types;
mod validation;

pub use engine::{MIN_FOREX_LOT, PositionSizeEngine, RiskPercentPolicy, STOP_EQUALS_ENTRY};
pub use parse::{NumericInputs, finite_or_zero, parse_leverage, parse_lot_size, parse_number};
pub use risk_sync::{fiat_from_percent, percent_from_fiat, sync_risk};
pub use types::{
    AssetClass, CalculatorInputs, CalculatorOutputs, DEFAULT_FOREX_PAIR, DEFAULT_LEVERAGE,
    DEFAULT_LOT_SIZE, DEFAULT_RISK_PERCENT, Field, FieldErrors, RiskMode, StopLossMode,
    TouchedFields, TradeDirection,
};
pub use validation::{field_errors, is_complete};
