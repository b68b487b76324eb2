//! Statutory charges, brokerage and tax for NSE/BSE equity trades.
//!
//! Rates follow the 2024 SEBI schedule and typical discount-broker pricing.
//! All amounts are in INR and computed in decimal to keep paise exact.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Product type of an Indian equity trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndiaTradeMode {
    /// MIS, squared off the same day.
    #[default]
    Intraday,
    /// CNC, held overnight.
    Delivery,
}

/// Charge schedule for one trade mode.
#[derive(Debug, Clone, Copy)]
struct ChargeRates {
    stt: Decimal,
    stt_on_buy: bool,
    exchange: Decimal,
    sebi: Decimal,
    stamp_duty: Decimal,
    brokerage_per_order: Decimal,
    orders: Decimal,
    stcg_rate: Decimal,
}

const GST_RATE: Decimal = dec!(0.18);

impl IndiaTradeMode {
    const fn rates(self) -> ChargeRates {
        match self {
            Self::Intraday => ChargeRates {
                stt: dec!(0.00025),
                stt_on_buy: false,
                exchange: dec!(0.0000345),
                sebi: dec!(0.000001),
                stamp_duty: dec!(0.00003),
                brokerage_per_order: dec!(20),
                orders: dec!(2),
                stcg_rate: dec!(0.15),
            },
            Self::Delivery => ChargeRates {
                stt: dec!(0.001),
                stt_on_buy: true,
                exchange: dec!(0.0000345),
                sebi: dec!(0.000001),
                stamp_duty: dec!(0.00015),
                brokerage_per_order: Decimal::ZERO,
                orders: dec!(1),
                stcg_rate: dec!(0.20),
            },
        }
    }

    /// Broker leverage under the SEBI peak margin rules.
    #[must_use]
    pub const fn leverage(self) -> Decimal {
        match self {
            Self::Intraday => dec!(5),
            Self::Delivery => dec!(1),
        }
    }
}

/// Breakdown of every charge on a round trip, rounded to paise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndiaCharges {
    /// Securities Transaction Tax.
    pub stt: Decimal,
    /// Exchange transaction charges.
    pub exchange_charges: Decimal,
    /// SEBI turnover fee.
    pub sebi_turnover: Decimal,
    /// Stamp duty on the buy leg.
    pub stamp_duty: Decimal,
    /// Broker fee.
    pub brokerage: Decimal,
    /// 18% GST on brokerage and exchange/SEBI charges.
    pub gst: Decimal,
    /// Sum of all of the above.
    pub total_charges: Decimal,
    /// Per-share move needed to cover the charges.
    pub breakeven: Decimal,
    /// Short-term capital gains provision on a profit.
    pub stcg_provision: Decimal,
    /// Profit after charges and STCG.
    pub net_profit_after_tax: Decimal,
}

/// Compute charges for buying `quantity` at `entry_price` and selling at `exit_price`.
///
/// Returns `None` when any intermediate amount overflows the decimal range.
#[must_use]
pub fn calculate_india_charges(
    entry_price: Decimal,
    exit_price: Decimal,
    quantity: u64,
    mode: IndiaTradeMode,
) -> Option<IndiaCharges> {
    let rates = mode.rates();
    let qty = Decimal::from(quantity);

    let buy_value = entry_price.checked_mul(qty)?;
    let sell_value = exit_price.checked_mul(qty)?;
    let turnover = buy_value.checked_add(sell_value)?;

    let stt = if rates.stt_on_buy {
        turnover.checked_mul(rates.stt)?
    } else {
        sell_value.checked_mul(rates.stt)?
    };
    let exchange_charges = turnover.checked_mul(rates.exchange)?;
    let sebi_turnover = turnover.checked_mul(rates.sebi)?;
    let stamp_duty = buy_value.checked_mul(rates.stamp_duty)?;
    let brokerage = rates.brokerage_per_order * rates.orders;
    let gst = brokerage
        .checked_add(exchange_charges)?
        .checked_add(sebi_turnover)?
        .checked_mul(GST_RATE)?;

    let total_charges = [exchange_charges, sebi_turnover, stamp_duty, brokerage, gst]
        .into_iter()
        .try_fold(stt, Decimal::checked_add)?;
    let breakeven = if quantity > 0 {
        total_charges.checked_div(qty)?
    } else {
        Decimal::ZERO
    };

    let gross_profit = exit_price.checked_sub(entry_price)?.checked_mul(qty)?;
    let profit_after_charges = gross_profit.checked_sub(total_charges)?;
    let stcg_provision = if profit_after_charges > Decimal::ZERO {
        profit_after_charges.checked_mul(rates.stcg_rate)?
    } else {
        Decimal::ZERO
    };

    Some(IndiaCharges {
        stt: paise(stt),
        exchange_charges: paise(exchange_charges),
        sebi_turnover: paise(sebi_turnover),
        stamp_duty: paise(stamp_duty),
        brokerage: paise(brokerage),
        gst: paise(gst),
        total_charges: paise(total_charges),
        breakeven: paise(breakeven),
        stcg_provision: paise(stcg_provision),
        net_profit_after_tax: paise(profit_after_charges.checked_sub(stcg_provision)?),
    })
}

/// Largest whole quantity the margin on `balance` can buy at `entry_price`.
///
/// Saturates at `u64::MAX` when the buying power is out of range.
#[must_use]
pub fn max_margin_quantity(balance: Decimal, entry_price: Decimal, mode: IndiaTradeMode) -> u64 {
    if entry_price <= Decimal::ZERO || balance <= Decimal::ZERO {
        return 0;
    }
    balance
        .checked_mul(mode.leverage())
        .and_then(|buying_power| buying_power.checked_div(entry_price))
        .map_or(u64::MAX, |quantity| quantity.floor().to_u64().unwrap_or(u64::MAX))
}

fn paise(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
