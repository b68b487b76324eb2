//! Forex pair reference data.
//!
//! Pip size and contract size per pair, used to turn a pip stop into a price
//! distance and lots into base-currency units.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Contract size of a standard currency lot.
pub const STANDARD_LOT: f64 = 100_000.0;

/// Pip size of most USD-quoted pairs.
pub const STANDARD_PIP: f64 = 0.0001;

/// Market grouping of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairCategory {
    /// USD majors.
    Major,
    /// Crosses.
    Minor,
    /// Exotics.
    Exotic,
    /// Metals quoted on forex platforms.
    Commodity,
}

/// Static description of a tradeable pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexPairSpec {
    /// Symbol without separator, e.g. `EURUSD`.
    pub symbol: String,
    /// Human-readable name, e.g. `EUR/USD`.
    pub display_name: String,
    /// Price increment of one pip.
    pub pip_size: f64,
    /// Units per lot.
    pub contract_size: f64,
    /// Market grouping.
    pub category: PairCategory,
    /// Decimal places shown for pips.
    pub pip_digits: u32,
}

impl ForexPairSpec {
    /// Create a pair spec.
    #[must_use]
    pub fn new(
        symbol: &str,
        display_name: &str,
        pip_size: f64,
        contract_size: f64,
        category: PairCategory,
        pip_digits: u32,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            display_name: display_name.to_string(),
            pip_size,
            contract_size,
            category,
            pip_digits,
        }
    }

    /// Monetary value of one pip at `lots`.
    #[must_use]
    pub fn pip_value(&self, lots: f64) -> f64 {
        self.pip_size * self.contract_size * lots
    }
}

/// Dropdown entry for a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairOption {
    /// Symbol submitted back as `forexPair`.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Category grouping.
    pub category: PairCategory,
}

/// Read-only lookup of pair specs, injected into the engine.
pub trait PairTable: Send + Sync {
    /// Find a pair by symbol.
    fn get(&self, symbol: &str) -> Option<&ForexPairSpec>;

    /// All pairs in table order.
    fn pairs(&self) -> &[ForexPairSpec];
}

/// In-memory pair table.
#[derive(Debug, Clone, Default)]
pub struct ForexPairTable {
    pairs: Vec<ForexPairSpec>,
}

impl ForexPairTable {
    /// Build a table from an explicit list.
    #[must_use]
    pub const fn new(pairs: Vec<ForexPairSpec>) -> Self {
        Self { pairs }
    }

    /// The built-in majors, crosses and metals.
    #[must_use]
    pub fn standard() -> Self {
        use PairCategory::{Commodity, Major, Minor};

        Self::new(vec![
            ForexPairSpec::new("EURUSD", "EUR/USD", 0.0001, STANDARD_LOT, Major, 4),
            ForexPairSpec::new("GBPUSD", "GBP/USD", 0.0001, STANDARD_LOT, Major, 4),
            ForexPairSpec::new("USDJPY", "USD/JPY", 0.01, STANDARD_LOT, Major, 2),
            ForexPairSpec::new("USDCHF", "USD/CHF", 0.0001, STANDARD_LOT, Major, 4),
            ForexPairSpec::new("AUDUSD", "AUD/USD", 0.0001, STANDARD_LOT, Major, 4),
            ForexPairSpec::new("USDCAD", "USD/CAD", 0.0001, STANDARD_LOT, Major, 4),
            ForexPairSpec::new("NZDUSD", "NZD/USD", 0.0001, STANDARD_LOT, Major, 4),
            ForexPairSpec::new("EURGBP", "EUR/GBP", 0.0001, STANDARD_LOT, Minor, 4),
            ForexPairSpec::new("EURJPY", "EUR/JPY", 0.01, STANDARD_LOT, Minor, 2),
            ForexPairSpec::new("GBPJPY", "GBP/JPY", 0.01, STANDARD_LOT, Minor, 2),
            ForexPairSpec::new("EURCHF", "EUR/CHF", 0.0001, STANDARD_LOT, Minor, 4),
            ForexPairSpec::new("AUDJPY", "AUD/JPY", 0.01, STANDARD_LOT, Minor, 2),
            ForexPairSpec::new("CADJPY", "CAD/JPY", 0.01, STANDARD_LOT, Minor, 2),
            ForexPairSpec::new("XAUUSD", "XAU/USD (Gold)", 0.01, 100.0, Commodity, 2),
            ForexPairSpec::new("XAGUSD", "XAG/USD (Silver)", 0.001, 5000.0, Commodity, 3),
        ])
    }

    /// Pairs grouped by category. Every category is present, possibly empty.
    #[must_use]
    pub fn by_category(&self) -> BTreeMap<PairCategory, Vec<ForexPairSpec>> {
        let mut grouped: BTreeMap<PairCategory, Vec<ForexPairSpec>> = [
            PairCategory::Major,
            PairCategory::Minor,
            PairCategory::Exotic,
            PairCategory::Commodity,
        ]
        .into_iter()
        .map(|c| (c, Vec::new()))
        .collect();

        for pair in &self.pairs {
            grouped.entry(pair.category).or_default().push(pair.clone());
        }
        grouped
    }

    /// Dropdown options in table order.
    #[must_use]
    pub fn options(&self) -> Vec<PairOption> {
        self.pairs
            .iter()
            .map(|p| PairOption {
                value: p.symbol.clone(),
                label: p.display_name.clone(),
                category: p.category,
            })
            .collect()
    }
}

impl PairTable for ForexPairTable {
    fn get(&self, symbol: &str) -> Option<&ForexPairSpec> {
        let wanted = normalize_symbol(symbol);
        if wanted.is_empty() {
            return None;
        }
        self.pairs.iter().find(|p| p.symbol == wanted)
    }

    fn pairs(&self) -> &[ForexPairSpec] {
        &self.pairs
    }
}

/// `eur/usd` and ` EURUSD ` both become `EURUSD`.
fn normalize_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .chars()
        .filter(|c| *c != '/')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
