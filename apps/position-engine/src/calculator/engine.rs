//! Core position sizing logic.

use serde::{Deserialize, Serialize};

use crate::instruments::{ForexPairSpec, PairTable, STANDARD_LOT, STANDARD_PIP};

use super::parse::{NumericInputs, finite_or_zero};
use super::types::{AssetClass, CalculatorInputs, CalculatorOutputs, TouchedFields, TradeDirection};
use super::validation::{field_errors, is_complete};

/// Blocking error reported when the stop sits exactly on the entry.
pub const STOP_EQUALS_ENTRY: &str = "Stop Loss cannot equal Entry Price";

/// Smallest tradeable forex lot.
pub const MIN_FOREX_LOT: f64 = 0.01;

/// Decimal places kept on the entry/stop distance.
const PRICE_DIFF_DECIMALS: i32 = 9;

/// Forex lot steps per lot.
const LOT_STEPS: f64 = 100.0;

/// Added before flooring forex lots so exact multiples of 0.01 survive.
const LOT_EPSILON: f64 = 1e-9;

/// What to do with a risk percentage outside `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPercentPolicy {
    /// Use the value as entered.
    #[default]
    PassThrough,
    /// Limit the effective percentage to `0..=100`.
    Clamp,
}

impl RiskPercentPolicy {
    fn apply(self, percent: f64) -> f64 {
        match self {
            Self::PassThrough => percent,
            Self::Clamp => percent.clamp(0.0, 100.0),
        }
    }
}

/// Pure position size calculator.
///
/// Holds only the injected pair table and the risk policy, so one engine can
/// serve any number of callers.
#[derive(Clone, Copy)]
pub struct PositionSizeEngine<'a> {
    pairs: &'a dyn PairTable,
    risk_policy: RiskPercentPolicy,
}

impl std::fmt::Debug for PositionSizeEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionSizeEngine")
            .field("pairs", &self.pairs.pairs().len())
            .field("risk_policy", &self.risk_policy)
            .finish()
    }
}

impl<'a> PositionSizeEngine<'a> {
    /// Create an engine that resolves forex pairs from `pairs`.
    #[must_use]
    pub fn new(pairs: &'a dyn PairTable) -> Self {
        Self {
            pairs,
            risk_policy: RiskPercentPolicy::default(),
        }
    }

    /// Use a different policy for risk percentages above 100 or below 0.
    #[must_use]
    pub const fn with_risk_policy(mut self, risk_policy: RiskPercentPolicy) -> Self {
        self.risk_policy = risk_policy;
        self
    }

    /// Compute every output for `inputs`.
    ///
    /// Never fails: invalid input shows up as zeros, `validation_error` and
    /// `field_errors`. `touched` only affects `field_errors`.
    pub fn compute(&self, inputs: &CalculatorInputs, touched: &TouchedFields) -> CalculatorOutputs {
        let values = NumericInputs::parse(inputs);
        let uses_pips = inputs.uses_pips();
        let pair = self.resolve_pair(inputs);
        let contract_size = pair.map_or(STANDARD_LOT, |p| p.contract_size);

        let (direction, validation_error) = infer_direction(&values, uses_pips);

        let risk_percent = self.risk_policy.apply(values.risk_percent);
        let risk_amount = finite_or_zero(values.balance * risk_percent / 100.0);

        let price_diff = if values.entry <= 0.0 {
            0.0
        } else if uses_pips {
            values.stop_loss_pips * pair.map_or(STANDARD_PIP, |p| p.pip_size)
        } else if values.stop_loss > 0.0 {
            round_to((values.entry - values.stop_loss).abs(), PRICE_DIFF_DECIMALS)
        } else {
            // Blank stop: no distance, so nothing is sized
            0.0
        };

        let raw_units = if price_diff > 0.0 {
            risk_amount / price_diff
        } else {
            0.0
        };

        let position_size_units = finite_or_zero(match inputs.asset_class {
            AssetClass::Stocks => raw_units.floor(),
            AssetClass::Forex => floor_to_lot_step(risk_amount, price_diff, contract_size),
            AssetClass::Futures => (raw_units / values.lot_size).floor() * values.lot_size,
            AssetClass::Crypto => raw_units,
        });

        let real_units = match inputs.asset_class {
            AssetClass::Forex => position_size_units * contract_size,
            _ => position_size_units,
        };

        let position_size_value = finite_or_zero(real_units * values.entry);
        let margin_required = if values.leverage > 0.0 {
            finite_or_zero(position_size_value / values.leverage)
        } else {
            position_size_value
        };

        let futures_min_risk = (inputs.asset_class == AssetClass::Futures
            && position_size_units == 0.0
            && price_diff > 0.0)
            .then(|| finite_or_zero(values.lot_size * price_diff));

        let forex_min_risk = (inputs.asset_class == AssetClass::Forex
            && position_size_units == 0.0
            && price_diff > 0.0)
            .then(|| finite_or_zero(MIN_FOREX_LOT * price_diff * contract_size));

        let (potential_profit, rrr) = match direction {
            Some(direction) if values.target > 0.0 && values.entry > 0.0 => {
                let profit = match direction {
                    TradeDirection::Long => (values.target - values.entry) * real_units,
                    TradeDirection::Short => (values.entry - values.target) * real_units,
                };
                let rrr = if risk_amount > 0.0 {
                    profit / risk_amount
                } else {
                    0.0
                };
                (finite_or_zero(profit), finite_or_zero(rrr))
            }
            _ => (0.0, 0.0),
        };

        let pip_value = pair
            .filter(|_| position_size_units != 0.0)
            .map(|pair| finite_or_zero(pair.pip_value(position_size_units)));

        let insufficient_margin =
            margin_required > values.balance && values.balance > 0.0 && margin_required > 0.0;

        let is_complete = is_complete(&values, uses_pips);

        tracing::debug!(
            asset_class = %inputs.asset_class,
            direction = ?direction,
            position_size_units,
            risk_amount,
            is_complete,
            "Position size computed"
        );

        CalculatorOutputs {
            position_size_units,
            position_size_value,
            margin_required,
            risk_amount,
            potential_profit,
            rrr,
            trade_direction: direction,
            validation_error,
            insufficient_margin,
            futures_min_risk,
            forex_min_risk,
            pip_value,
            field_errors: field_errors(inputs, &values, direction, touched),
            is_complete,
        }
    }

    fn resolve_pair(&self, inputs: &CalculatorInputs) -> Option<&'a ForexPairSpec> {
        if inputs.asset_class != AssetClass::Forex {
            return None;
        }
        self.pairs.get(&inputs.forex_pair)
    }
}

/// Infer LONG/SHORT from the stop, or from the target in pips mode.
///
/// In pips mode a leftover price stop on the entry is ignored; the pip
/// distance is the real stop there.
fn infer_direction(
    values: &NumericInputs,
    uses_pips: bool,
) -> (Option<TradeDirection>, Option<String>) {
    let stale_stop = uses_pips && values.stop_loss == values.entry;
    if values.entry > 0.0 && values.stop_loss > 0.0 && !stale_stop {
        return if values.stop_loss < values.entry {
            (Some(TradeDirection::Long), None)
        } else if values.stop_loss > values.entry {
            (Some(TradeDirection::Short), None)
        } else {
            (None, Some(STOP_EQUALS_ENTRY.to_string()))
        };
    }

    // A pip distance has no sign, so only the target can tell the side.
    if uses_pips && values.entry > 0.0 && values.target > 0.0 {
        let direction = if values.target > values.entry {
            TradeDirection::Long
        } else {
            TradeDirection::Short
        };
        return (Some(direction), None);
    }

    (None, None)
}

/// Lots affordable with `risk_amount`, floored to the 0.01 lot step.
fn floor_to_lot_step(risk_amount: f64, price_diff: f64, contract_size: f64) -> f64 {
    let per_lot_risk = price_diff * contract_size;
    if per_lot_risk <= 0.0 {
        return 0.0;
    }
    let raw_lots = risk_amount / per_lot_risk;
    (raw_lots * LOT_STEPS + LOT_EPSILON).floor() / LOT_STEPS
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::types::{Field, StopLossMode};
    use crate::instruments::ForexPairTable;

    fn approx(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn crypto_long() -> CalculatorInputs {
        CalculatorInputs {
            asset_class: AssetClass::Crypto,
            balance: "25000".to_string(),
            risk_percent: "1".to_string(),
            entry_price: "45000".to_string(),
            stop_loss_price: "43500".to_string(),
            target_price: "50000".to_string(),
            leverage: "10".to_string(),
            ..Default::default()
        }
    }

    fn eurusd(balance: &str, entry: &str, stop: &str) -> CalculatorInputs {
        CalculatorInputs {
            asset_class: AssetClass::Forex,
            balance: balance.to_string(),
            risk_percent: "1".to_string(),
            entry_price: entry.to_string(),
            stop_loss_price: stop.to_string(),
            forex_pair: "EURUSD".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_crypto_long_scenario() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let out = engine.compute(&crypto_long(), &TouchedFields::new());

        approx(out.risk_amount, 250.0, 1e-9);
        approx(out.position_size_units, 0.166_666_67, 1e-6);
        approx(out.position_size_value, 7500.0, 1e-6);
        approx(out.margin_required, 750.0, 1e-6);
        assert_eq!(out.trade_direction, Some(TradeDirection::Long));
        approx(out.potential_profit, 833.333_333, 1e-3);
        approx(out.rrr, 3.333_333, 1e-5);
        assert!(!out.insufficient_margin);
        assert!(out.is_complete);
        assert!(out.validation_error.is_none());
        assert!(out.pip_value.is_none());
    }

    #[test]
    fn test_short_direction() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = crypto_long();
        inputs.stop_loss_price = "46500".to_string();
        inputs.target_price = "42000".to_string();

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.trade_direction, Some(TradeDirection::Short));
        approx(out.potential_profit, 3000.0 * 250.0 / 1500.0, 1e-6);
        approx(out.rrr, 2.0, 1e-9);
    }

    #[test]
    fn test_stop_equals_entry() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = crypto_long();
        inputs.stop_loss_price = "45000".to_string();

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.trade_direction, None);
        assert_eq!(out.validation_error.as_deref(), Some(STOP_EQUALS_ENTRY));
        assert_eq!(out.position_size_units, 0.0);
        assert_eq!(out.potential_profit, 0.0);
    }

    #[test]
    fn test_stocks_floor_to_whole_shares() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        // 107 / 10 = 10.7 raw shares
        let inputs = CalculatorInputs {
            asset_class: AssetClass::Stocks,
            balance: "10700".to_string(),
            risk_percent: "1".to_string(),
            entry_price: "100".to_string(),
            stop_loss_price: "90".to_string(),
            leverage: "1".to_string(),
            ..Default::default()
        };

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 10.0);
        approx(out.position_size_value, 1000.0, 1e-9);
    }

    #[test]
    fn test_futures_lot_rounding() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        // risk 1200 over a 10 point stop = 120 raw contracts
        let mut inputs = CalculatorInputs {
            asset_class: AssetClass::Futures,
            balance: "120000".to_string(),
            risk_percent: "1".to_string(),
            entry_price: "5000".to_string(),
            stop_loss_price: "4990".to_string(),
            lot_size: "50".to_string(),
            ..Default::default()
        };

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 100.0);
        assert!(out.futures_min_risk.is_none());

        // 40 raw contracts cannot fill one lot of 50
        inputs.balance = "40000".to_string();
        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.0);
        approx(out.futures_min_risk.unwrap_or_default(), 500.0, 1e-9);
    }

    #[test]
    fn test_forex_pair_aware_lots() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let out = engine.compute(&eurusd("10000", "1.2500", "1.2480"), &TouchedFields::new());

        assert_eq!(out.position_size_units, 0.5);
        approx(out.position_size_value, 62_500.0, 1e-6);
        approx(out.pip_value.unwrap_or_default(), 5.0, 1e-9);
        assert!(out.forex_min_risk.is_none());
        assert_eq!(out.trade_direction, Some(TradeDirection::Long));
    }

    #[test]
    fn test_forex_price_diff_noise_is_removed() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        // 1.2520 - 1.2500 is not exactly 0.002 in binary floating point
        let out = engine.compute(&eurusd("10000", "1.2520", "1.2500"), &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.5);
    }

    #[test]
    fn test_forex_min_risk_when_below_one_micro_lot() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        // risk 1 over a 20 pip stop affords 0.005 lots
        let out = engine.compute(&eurusd("100", "1.2500", "1.2480"), &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.0);
        approx(out.forex_min_risk.unwrap_or_default(), 2.0, 1e-9);
        assert!(out.pip_value.is_none());
    }

    #[test]
    fn test_forex_unknown_pair_falls_back_to_standard_lot() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = eurusd("10000", "1.2500", "1.2480");
        inputs.forex_pair = "ZZZZZZ".to_string();

        let out = engine.compute(&inputs, &TouchedFields::new());
        approx(out.position_size_units, 0.5, 1e-9);
        approx(out.position_size_value, 62_500.0, 1e-6);
        assert!(out.pip_value.is_none());
    }

    #[test]
    fn test_forex_unknown_pair_floors_to_micro_lot() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = eurusd("100", "1.2500", "1.2480");
        inputs.forex_pair = "ZZZZZZ".to_string();

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.0);
        assert_eq!(out.position_size_value, 0.0);
        approx(out.forex_min_risk.unwrap_or_default(), 2.0, 1e-9);

        // 0.0125 lots keeps one micro lot and reports no minimum
        inputs.balance = "250".to_string();
        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.01);
        assert!(out.forex_min_risk.is_none());
    }

    #[test]
    fn test_pips_mode_ignores_stop_left_on_entry() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = eurusd("10000", "1.2500", "1.2500");
        inputs.stop_loss_mode = StopLossMode::Pips;
        inputs.stop_loss_pips = "20".to_string();
        inputs.target_price = "1.2560".to_string();

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.5);
        assert_eq!(out.trade_direction, Some(TradeDirection::Long));
        assert!(out.validation_error.is_none());
        approx(out.potential_profit, 0.006 * 50_000.0, 1e-6);
        approx(out.rrr, 3.0, 1e-6);
    }

    #[test]
    fn test_forex_pips_mode() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = eurusd("10000", "1.2500", "");
        inputs.stop_loss_mode = StopLossMode::Pips;
        inputs.stop_loss_pips = "20".to_string();

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.5);
        assert_eq!(out.trade_direction, None);
        assert_eq!(out.potential_profit, 0.0);
        assert!(out.is_complete);

        inputs.target_price = "1.2560".to_string();
        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.trade_direction, Some(TradeDirection::Long));
        approx(out.potential_profit, 0.006 * 50_000.0, 1e-6);
        approx(out.rrr, 3.0, 1e-6);
    }

    #[test]
    fn test_usdjpy_pips_use_pair_pip_size() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let inputs = CalculatorInputs {
            asset_class: AssetClass::Forex,
            balance: "10000".to_string(),
            risk_percent: "1".to_string(),
            entry_price: "150.00".to_string(),
            stop_loss_mode: StopLossMode::Pips,
            stop_loss_pips: "50".to_string(),
            forex_pair: "USDJPY".to_string(),
            ..Default::default()
        };

        // 50 pips * 0.01 = 0.5 price distance; 100 / (0.5 * 100000) = 0.002 lots
        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.0);
        approx(out.forex_min_risk.unwrap_or_default(), 500.0, 1e-9);
    }

    #[test]
    fn test_insufficient_margin() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = crypto_long();
        inputs.leverage = "1".to_string();
        inputs.stop_loss_price = "44900".to_string();

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert!(out.margin_required > 25_000.0);
        assert!(out.insufficient_margin);
    }

    #[test]
    fn test_leverage_fallback() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = crypto_long();
        inputs.leverage = "0".to_string();

        let out = engine.compute(&inputs, &TouchedFields::new());
        approx(out.margin_required, out.position_size_value, 1e-9);
    }

    #[test]
    fn test_incomplete_inputs_produce_zeros() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let inputs = CalculatorInputs {
            balance: "0".to_string(),
            risk_percent: String::new(),
            leverage: String::new(),
            lot_size: String::new(),
            ..Default::default()
        };

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert!(!out.is_complete);
        assert_eq!(out.position_size_units, 0.0);
        assert_eq!(out.position_size_value, 0.0);
        assert_eq!(out.margin_required, 0.0);
        assert_eq!(out.risk_amount, 0.0);
        assert_eq!(out.potential_profit, 0.0);
        assert_eq!(out.rrr, 0.0);
        assert!(out.validation_error.is_none());
        assert!(out.field_errors.is_empty());
    }

    #[test]
    fn test_entry_without_stop_sizes_nothing() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = crypto_long();
        inputs.stop_loss_price = String::new();

        let out = engine.compute(&inputs, &TouchedFields::new());
        assert_eq!(out.position_size_units, 0.0);
        assert_eq!(out.trade_direction, None);
        assert!(!out.is_complete);
    }

    #[test]
    fn test_risk_policy_clamp() {
        let table = ForexPairTable::standard();
        let mut inputs = crypto_long();
        inputs.risk_percent = "150".to_string();

        let passthrough = PositionSizeEngine::new(&table).compute(&inputs, &TouchedFields::new());
        approx(passthrough.risk_amount, 37_500.0, 1e-9);

        let clamped = PositionSizeEngine::new(&table)
            .with_risk_policy(RiskPercentPolicy::Clamp)
            .compute(&inputs, &TouchedFields::new());
        approx(clamped.risk_amount, 25_000.0, 1e-9);
    }

    #[test]
    fn test_touched_only_changes_field_errors() {
        let table = ForexPairTable::standard();
        let engine = PositionSizeEngine::new(&table);
        let mut inputs = crypto_long();
        inputs.entry_price = String::new();

        let quiet = engine.compute(&inputs, &TouchedFields::new());
        let touched: TouchedFields = [Field::EntryPrice].into_iter().collect();
        let loud = engine.compute(&inputs, &touched);

        assert!(quiet.field_errors.is_empty());
        assert_eq!(loud.field_errors[&Field::EntryPrice], "Entry price is required");
        assert_eq!(quiet.position_size_units, loud.position_size_units);
        assert_eq!(quiet.is_complete, loud.is_complete);
    }
}
