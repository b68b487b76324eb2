//! Calculator behaviour and the defaults handed to new sessions.

use serde::{Deserialize, Serialize};

use crate::calculator::{AssetClass, CalculatorInputs, DEFAULT_FOREX_PAIR, RiskPercentPolicy};

/// Calculator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// What to do with a risk percentage above 100.
    #[serde(default)]
    pub risk_percent_policy: RiskPercentPolicy,
    /// Starting values for a fresh calculator.
    #[serde(default)]
    pub defaults: CalculatorDefaults,
}

/// Starting values for a fresh calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorDefaults {
    /// Asset class selected on load.
    #[serde(default)]
    pub asset_class: AssetClass,
    /// Risk percentage.
    #[serde(default = "default_risk_percent")]
    pub risk_percent: f64,
    /// Leverage multiplier.
    #[serde(default = "default_leverage")]
    pub leverage: f64,
    /// Futures lot size.
    #[serde(default = "default_lot_size")]
    pub lot_size: f64,
    /// Forex pair symbol.
    #[serde(default = "default_forex_pair")]
    pub forex_pair: String,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            asset_class: AssetClass::default(),
            risk_percent: default_risk_percent(),
            leverage: default_leverage(),
            lot_size: default_lot_size(),
            forex_pair: default_forex_pair(),
        }
    }
}

impl CalculatorDefaults {
    /// A blank set of inputs seeded with these defaults.
    #[must_use]
    pub fn inputs(&self) -> CalculatorInputs {
        CalculatorInputs {
            asset_class: self.asset_class,
            risk_percent: self.risk_percent.to_string(),
            leverage: self.leverage.to_string(),
            lot_size: self.lot_size.to_string(),
            forex_pair: self.forex_pair.clone(),
            ..CalculatorInputs::default()
        }
    }
}

const fn default_risk_percent() -> f64 {
    1.0
}

const fn default_leverage() -> f64 {
    10.0
}

const fn default_lot_size() -> f64 {
    50.0
}

fn default_forex_pair() -> String {
    DEFAULT_FOREX_PAIR.to_string()
}
