//! Per-field validation messages and input completeness.
//!
//! Messages are advisory. They never change the numbers the engine produces,
//! and a field only reports once the user has touched it.

use super::parse::{NumericInputs, is_blank, parse_number};
use super::types::{
    AssetClass, CalculatorInputs, Field, FieldErrors, RiskMode, TouchedFields, TradeDirection,
};

/// Whether balance, risk, entry and stop are all present and positive.
#[must_use]
pub fn is_complete(values: &NumericInputs, uses_pips: bool) -> bool {
    values.balance > 0.0
        && values.risk_percent > 0.0
        && values.entry > 0.0
        && (values.stop_loss > 0.0 || (uses_pips && values.stop_loss_pips > 0.0))
}

/// Collect messages for every touched field that has a problem.
#[must_use]
pub fn field_errors(
    inputs: &CalculatorInputs,
    values: &NumericInputs,
    direction: Option<TradeDirection>,
    touched: &TouchedFields,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if touched.is_empty() {
        return errors;
    }

    let mut check = |field: Field, message: Option<&str>| {
        if let Some(message) = message
            && touched.contains(&field)
        {
            errors.insert(field, message.to_string());
        }
    };

    check(
        Field::Balance,
        required_positive(
            &inputs.balance,
            values.balance,
            "Account balance is required",
            "Balance must be greater than 0",
        ),
    );

    match inputs.risk_mode {
        RiskMode::Percent => check(Field::RiskPercent, risk_percent_error(inputs, values)),
        RiskMode::Fiat => check(Field::RiskFiat, risk_fiat_error(inputs, values)),
    }

    check(
        Field::EntryPrice,
        required_positive(
            &inputs.entry_price,
            values.entry,
            "Entry price is required",
            "Entry price must be greater than 0",
        ),
    );

    if inputs.uses_pips() {
        check(
            Field::StopLossPips,
            required_positive(
                &inputs.stop_loss_pips,
                values.stop_loss_pips,
                "Stop loss pips is required",
                "Pips must be greater than 0",
            ),
        );
    } else {
        check(Field::StopLossPrice, stop_loss_error(inputs, values));
    }

    check(Field::TargetPrice, target_error(inputs, values, direction));

    if !is_blank(&inputs.leverage) && parse_number(&inputs.leverage) < 1.0 {
        check(Field::Leverage, Some("Leverage must be at least 1"));
    }

    if inputs.asset_class == AssetClass::Futures
        && !is_blank(&inputs.lot_size)
        && parse_number(&inputs.lot_size) <= 0.0
    {
        check(Field::LotSize, Some("Lot size must be greater than 0"));
    }

    errors
}

fn required_positive<'m>(
    raw: &str,
    value: f64,
    required: &'m str,
    positive: &'m str,
) -> Option<&'m str> {
    if is_blank(raw) {
        Some(required)
    } else if value <= 0.0 {
        Some(positive)
    } else {
        None
    }
}

fn risk_percent_error(inputs: &CalculatorInputs, values: &NumericInputs) -> Option<&'static str> {
    required_positive(
        &inputs.risk_percent,
        values.risk_percent,
        "Risk is required",
        "Risk must be greater than 0",
    )
    .or_else(|| (values.risk_percent > 100.0).then_some("Risk cannot exceed 100%"))
}

fn risk_fiat_error(inputs: &CalculatorInputs, values: &NumericInputs) -> Option<&'static str> {
    required_positive(
        &inputs.risk_fiat,
        values.risk_fiat,
        "Risk is required",
        "Risk must be greater than 0",
    )
    .or_else(|| {
        (values.balance > 0.0 && values.risk_fiat > values.balance)
            .then_some("Risk cannot exceed account balance")
    })
}

fn stop_loss_error(inputs: &CalculatorInputs, values: &NumericInputs) -> Option<&'static str> {
    required_positive(
        &inputs.stop_loss_price,
        values.stop_loss,
        "Stop loss is required",
        "Stop loss must be greater than 0",
    )
    .or_else(|| {
        (values.entry > 0.0 && values.stop_loss == values.entry)
            .then_some("Stop loss cannot equal entry price")
    })
}

fn target_error(
    inputs: &CalculatorInputs,
    values: &NumericInputs,
    direction: Option<TradeDirection>,
) -> Option<&'static str> {
    if is_blank(&inputs.target_price) {
        return None;
    }
    if values.target <= 0.0 {
        return Some("Target must be greater than 0");
    }
    match direction {
        Some(TradeDirection::Long) if values.target <= values.entry => {
            Some("Target must be above entry for a long trade")
        }
        Some(TradeDirection::Short) if values.target >= values.entry => {
            Some("Target must be below entry for a short trade")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::types::StopLossMode;

    fn filled_inputs() -> CalculatorInputs {
        CalculatorInputs {
            balance: "10000".to_string(),
            risk_percent: "1".to_string(),
            entry_price: "100".to_string(),
            stop_loss_price: "95".to_string(),
            target_price: "110".to_string(),
            ..Default::default()
        }
    }

    fn all_touched() -> TouchedFields {
        [
            Field::Balance,
            Field::RiskPercent,
            Field::RiskFiat,
            Field::EntryPrice,
            Field::StopLossPrice,
            Field::StopLossPips,
            Field::TargetPrice,
            Field::Leverage,
            Field::LotSize,
        ]
        .into_iter()
        .collect()
    }

    fn errors_for(inputs: &CalculatorInputs, direction: Option<TradeDirection>) -> FieldErrors {
        let values = NumericInputs::parse(inputs);
        field_errors(inputs, &values, direction, &all_touched())
    }

    #[test]
    fn test_valid_inputs_have_no_errors() {
        let errors = errors_for(&filled_inputs(), Some(TradeDirection::Long));
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_untouched_fields_are_silent() {
        let inputs = CalculatorInputs::default();
        let values = NumericInputs::parse(&inputs);
        let errors = field_errors(&inputs, &values, None, &TouchedFields::new());
        assert!(errors.is_empty());

        let touched: TouchedFields = [Field::EntryPrice].into_iter().collect();
        let errors = field_errors(&inputs, &values, None, &touched);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&Field::EntryPrice], "Entry price is required");
    }

    #[test]
    fn test_required_versus_positive() {
        let mut inputs = filled_inputs();
        inputs.balance = String::new();
        inputs.entry_price = "-5".to_string();
        let errors = errors_for(&inputs, None);
        assert_eq!(errors[&Field::Balance], "Account balance is required");
        assert_eq!(errors[&Field::EntryPrice], "Entry price must be greater than 0");
    }

    #[test]
    fn test_risk_percent_ceiling() {
        let mut inputs = filled_inputs();
        inputs.risk_percent = "150".to_string();
        let errors = errors_for(&inputs, Some(TradeDirection::Long));
        assert_eq!(errors[&Field::RiskPercent], "Risk cannot exceed 100%");
    }

    #[test]
    fn test_risk_fiat_checked_in_fiat_mode() {
        let mut inputs = filled_inputs();
        inputs.risk_mode = RiskMode::Fiat;
        inputs.risk_fiat = "20000".to_string();
        let errors = errors_for(&inputs, Some(TradeDirection::Long));
        assert_eq!(
            errors[&Field::RiskFiat],
            "Risk cannot exceed account balance"
        );
        assert!(!errors.contains_key(&Field::RiskPercent));
    }

    #[test]
    fn test_stop_equal_to_entry() {
        let mut inputs = filled_inputs();
        inputs.stop_loss_price = "100".to_string();
        let errors = errors_for(&inputs, None);
        assert_eq!(
            errors[&Field::StopLossPrice],
            "Stop loss cannot equal entry price"
        );
    }

    #[test]
    fn test_pips_mode_checks_pips_field() {
        let mut inputs = filled_inputs();
        inputs.asset_class = AssetClass::Forex;
        inputs.stop_loss_mode = StopLossMode::Pips;
        inputs.stop_loss_price = String::new();
        let errors = errors_for(&inputs, None);
        assert_eq!(errors[&Field::StopLossPips], "Stop loss pips is required");
        assert!(!errors.contains_key(&Field::StopLossPrice));
    }

    #[test]
    fn test_target_on_wrong_side() {
        let mut inputs = filled_inputs();
        inputs.target_price = "90".to_string();
        let errors = errors_for(&inputs, Some(TradeDirection::Long));
        assert_eq!(
            errors[&Field::TargetPrice],
            "Target must be above entry for a long trade"
        );

        inputs.stop_loss_price = "105".to_string();
        inputs.target_price = "120".to_string();
        let errors = errors_for(&inputs, Some(TradeDirection::Short));
        assert_eq!(
            errors[&Field::TargetPrice],
            "Target must be below entry for a short trade"
        );
    }

    #[test]
    fn test_leverage_and_lot_size() {
        let mut inputs = filled_inputs();
        inputs.asset_class = AssetClass::Futures;
        inputs.leverage = "0".to_string();
        inputs.lot_size = "-1".to_string();
        let errors = errors_for(&inputs, Some(TradeDirection::Long));
        assert_eq!(errors[&Field::Leverage], "Leverage must be at least 1");
        assert_eq!(errors[&Field::LotSize], "Lot size must be greater than 0");
    }

    #[test]
    fn test_is_complete() {
        let values = NumericInputs::parse(&filled_inputs());
        assert!(is_complete(&values, false));

        let mut pips = filled_inputs();
        pips.stop_loss_price = String::new();
        pips.stop_loss_pips = "20".to_string();
        let values = NumericInputs::parse(&pips);
        assert!(is_complete(&values, true));
        assert!(!is_complete(&values, false));

        let values = NumericInputs::parse(&CalculatorInputs::default());
        assert!(!is_complete(&values, false));
    }
}
