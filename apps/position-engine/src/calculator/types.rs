//! Core types for the position size calculator.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset class, selecting the rounding and unit-conversion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Fractional units, no rounding.
    #[default]
    Crypto,
    /// Whole shares.
    Stocks,
    /// Lots of a currency pair.
    Forex,
    /// Whole multiples of the contract lot size.
    Futures,
}

impl AssetClass {
    /// Label used for metrics and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crypto => "crypto",
            Self::Stocks => "stocks",
            Self::Forex => "forex",
            Self::Futures => "futures",
        }
    }

    /// Unit the displayed position size is expressed in.
    #[must_use]
    pub const fn unit_label(&self) -> &'static str {
        match self {
            Self::Crypto => "units",
            Self::Stocks => "shares",
            Self::Forex => "lots",
            Self::Futures => "contracts",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two risk fields is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskMode {
    /// Risk expressed as a percentage of the balance.
    #[default]
    Percent,
    /// Risk expressed as an absolute currency amount.
    Fiat,
}

impl RiskMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Percent => Self::Fiat,
            Self::Fiat => Self::Percent,
        }
    }
}

/// How the stop loss is expressed. Pips only apply to forex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopLossMode {
    /// Absolute stop price.
    #[default]
    Price,
    /// Distance from entry in pips.
    Pips,
}

/// Direction of the trade, inferred from entry versus stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeDirection {
    /// Stop below entry.
    Long,
    /// Stop above entry.
    Short,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// User-editable input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Account balance.
    Balance,
    /// Risk as a percentage.
    RiskPercent,
    /// Risk as a currency amount.
    RiskFiat,
    /// Entry price.
    EntryPrice,
    /// Stop loss price.
    StopLossPrice,
    /// Stop loss distance in pips.
    StopLossPips,
    /// Target price.
    TargetPrice,
    /// Leverage multiplier.
    Leverage,
    /// Futures contract lot size.
    LotSize,
}

/// Fields the user has interacted with. Controls which field errors are reported.
pub type TouchedFields = BTreeSet<Field>;

/// Per-field validation messages.
pub type FieldErrors = BTreeMap<Field, String>;

/// Raw calculator inputs, as typed by the user.
///
/// Numeric fields are kept as strings and parsed permissively at compute time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorInputs {
    /// Asset class.
    pub asset_class: AssetClass,
    /// Account balance.
    pub balance: String,
    /// Authoritative risk field.
    pub risk_mode: RiskMode,
    /// Percentage of balance to risk.
    pub risk_percent: String,
    /// Absolute amount to risk.
    pub risk_fiat: String,
    /// Entry price.
    pub entry_price: String,
    /// Stop loss as a price.
    pub stop_loss_price: String,
    /// Stop loss as a pip distance (forex only).
    pub stop_loss_pips: String,
    /// Stop loss mode (forex only).
    pub stop_loss_mode: StopLossMode,
    /// Optional target price.
    pub target_price: String,
    /// Leverage multiplier.
    pub leverage: String,
    /// Futures lot size.
    pub lot_size: String,
    /// Forex pair symbol, e.g. `EURUSD`.
    pub forex_pair: String,
}

/// Default risk percentage.
pub const DEFAULT_RISK_PERCENT: &str = "1";
/// Default leverage.
pub const DEFAULT_LEVERAGE: &str = "10";
/// Default futures lot size.
pub const DEFAULT_LOT_SIZE: &str = "50";
/// Default forex pair.
pub const DEFAULT_FOREX_PAIR: &str = "EURUSD";

impl Default for CalculatorInputs {
    fn default() -> Self {
        Self {
            asset_class: AssetClass::Crypto,
            balance: String::new(),
            risk_mode: RiskMode::Percent,
            risk_percent: DEFAULT_RISK_PERCENT.to_string(),
            risk_fiat: String::new(),
            entry_price: String::new(),
            stop_loss_price: String::new(),
            stop_loss_pips: String::new(),
            stop_loss_mode: StopLossMode::Price,
            target_price: String::new(),
            leverage: DEFAULT_LEVERAGE.to_string(),
            lot_size: DEFAULT_LOT_SIZE.to_string(),
            forex_pair: DEFAULT_FOREX_PAIR.to_string(),
        }
    }
}

impl CalculatorInputs {
    /// Clear the trade back to defaults, keeping asset class, balance and pair.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            asset_class: self.asset_class,
            balance: self.balance.clone(),
            forex_pair: self.forex_pair.clone(),
            ..Self::default()
        }
    }

    /// Whether the forex pip stop is the active stop-loss expression.
    #[must_use]
    pub fn uses_pips(&self) -> bool {
        self.asset_class == AssetClass::Forex && self.stop_loss_mode == StopLossMode::Pips
    }

    /// Flip between percent and fiat risk entry.
    pub fn toggle_risk_mode(&mut self) {
        self.risk_mode = self.risk_mode.toggled();
    }
}

/// Calculator outputs, produced fresh on every call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorOutputs {
    /// Displayed size in shares, lots or units.
    pub position_size_units: f64,
    /// Notional value of the position.
    pub position_size_value: f64,
    /// Capital required at the given leverage.
    pub margin_required: f64,
    /// Amount lost if the stop is hit.
    pub risk_amount: f64,
    /// Profit at the target price.
    pub potential_profit: f64,
    /// Reward divided by risk.
    pub rrr: f64,
    /// Inferred direction.
    pub trade_direction: Option<TradeDirection>,
    /// Blocking error, if any.
    pub validation_error: Option<String>,
    /// Margin exceeds the balance.
    pub insufficient_margin: bool,
    /// Minimum risk needed to trade one futures lot.
    pub futures_min_risk: Option<f64>,
    /// Minimum risk needed to trade 0.01 forex lots.
    pub forex_min_risk: Option<f64>,
    /// Value of one pip at the computed lot size.
    pub pip_value: Option<f64>,
    /// Per-field messages for touched fields.
    pub field_errors: FieldErrors,
    /// All required inputs are present and positive.
    pub is_complete: bool,
}
