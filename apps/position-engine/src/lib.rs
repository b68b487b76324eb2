// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::unreadable_literal
    )
)]

//! Position Engine - Rust Core Library
//!
//! Deterministic position size and risk/reward calculator.
//!
//! # Layout
//!
//! - **Core**: pure, synchronous, no I/O
//!   - `calculator`: inputs, outputs, the sizing engine, validation, risk sync
//!   - `instruments`: forex pair reference data behind the `PairTable` trait
//!   - `charges`: exchange fee presets and Indian equity charges
//!   - `format`: locale-aware number, currency and percentage rendering
//!
//! - **Service**: the binary's ambient stack
//!   - `config`: YAML configuration with env interpolation
//!   - `observability`: tracing setup and Prometheus metrics
//!   - `server`: axum JSON API over the core
//!   - `error`: structured API errors

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Core
// =============================================================================

/// Position size calculator.
pub mod calculator;

/// Exchange fees and Indian equity charges.
pub mod charges;

/// Locale-aware display formatting.
pub mod format;

/// Forex pair reference data.
pub mod instruments;

// =============================================================================
// Service
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Structured API errors.
pub mod error;

/// Logging and metrics.
pub mod observability;

/// HTTP/JSON API.
pub mod server;

// =============================================================================
// Re-exports
// =============================================================================

pub use calculator::{
    AssetClass, CalculatorInputs, CalculatorOutputs, PositionSizeEngine, RiskPercentPolicy,
    TouchedFields, TradeDirection, sync_risk,
};
pub use config::{Config, ConfigError, load_config, load_config_or_default};
pub use instruments::{ForexPairSpec, ForexPairTable, PairTable};
pub use server::{AppState, create_router};
