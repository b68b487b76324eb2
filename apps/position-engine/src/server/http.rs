//! HTTP/JSON API server implementation.
//!
//! A thin adapter over the calculator: every handler parses a request,
//! calls into the library and serialises the result. Calculator outcomes,
//! including invalid input, are always `200`; only lookups can fail.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator::{
    CalculatorInputs, CalculatorOutputs, PositionSizeEngine, TouchedFields, sync_risk,
};
use crate::charges::{
    DEFAULT_EXCHANGE, EXCHANGE_PRESETS, ExchangePreset, FeeEstimate, IndiaCharges,
    IndiaTradeMode, OrderType, calculate_india_charges, estimate_fees, fee_to_percent,
    max_margin_quantity, percent_to_fee, preset,
};
use crate::config::CalculatorConfig;
use crate::error::EngineError;
use crate::format::{
    SupportedLocale, detect_locale, format_currency, format_number, format_percentage,
};
use crate::instruments::{ForexPairSpec, ForexPairTable, PairCategory, PairOption, PairTable};
use crate::observability::{record_calculation, record_http_request};

const ROUTE_CALCULATE: &str = "/v1/calculate";
const ROUTE_RISK_SYNC: &str = "/v1/risk-sync";
const ROUTE_DEFAULTS: &str = "/v1/defaults";
const ROUTE_FOREX_PAIRS: &str = "/v1/forex-pairs";
const ROUTE_EXCHANGE_PRESETS: &str = "/v1/exchange-presets";
const ROUTE_FEES: &str = "/v1/fees/estimate";
const ROUTE_INDIA: &str = "/v1/india-charges";
const ROUTE_FORMAT: &str = "/v1/format";
const ROUTE_LOCALES: &str = "/v1/locales";

/// Preset name that means "use the custom fee".
const CUSTOM_EXCHANGE: &str = "Custom";

/// Shared state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    pairs: Arc<ForexPairTable>,
    calculator: Arc<CalculatorConfig>,
    version: String,
}

impl AppState {
    /// Create server state.
    #[must_use]
    pub fn new(pairs: ForexPairTable, calculator: CalculatorConfig) -> Self {
        Self {
            pairs: Arc::new(pairs),
            calculator: Arc::new(calculator),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Create the Axum router with all endpoints.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(ROUTE_CALCULATE, post(calculate))
        .route(ROUTE_RISK_SYNC, post(risk_sync))
        .route(ROUTE_DEFAULTS, get(defaults))
        .route(ROUTE_FOREX_PAIRS, get(forex_pairs))
        .route(ROUTE_EXCHANGE_PRESETS, get(exchange_presets))
        .route(ROUTE_FEES, post(fees_estimate))
        .route(ROUTE_INDIA, post(india_charges))
        .route(ROUTE_FORMAT, post(format_value))
        .route(ROUTE_LOCALES, get(locales))
        .with_state(state)
}

/// Serialise the handler result and record the request.
fn respond<T: Serialize>(
    route: &'static str,
    started: Instant,
    result: Result<T, ApiError>,
) -> Response {
    let response = match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => err.into_response(),
    };
    record_http_request(
        route,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version,
    })
}

// ============================================
// Calculator
// ============================================

/// Request to compute a position.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// Raw form inputs.
    #[serde(default)]
    pub inputs: CalculatorInputs,
    /// Fields the user has interacted with.
    #[serde(default)]
    pub touched: TouchedFields,
}

/// Computed position plus the risk-synced inputs it was computed from.
#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateResponse {
    /// Inputs after risk sync.
    pub inputs: CalculatorInputs,
    /// Engine outputs.
    pub outputs: CalculatorOutputs,
    /// Unit `outputs.positionSizeUnits` is counted in.
    pub unit: String,
}

/// Compute endpoint. Runs risk sync first, like the form does on every edit.
async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> Response {
    let started = Instant::now();
    let mut inputs = req.inputs;
    sync_risk(&mut inputs);

    let engine = PositionSizeEngine::new(state.pairs.as_ref())
        .with_risk_policy(state.calculator.risk_percent_policy);
    let compute_started = Instant::now();
    let outputs = engine.compute(&inputs, &req.touched);
    record_calculation(
        inputs.asset_class.as_str(),
        outputs.is_complete,
        compute_started.elapsed().as_secs_f64(),
    );

    respond(
        ROUTE_CALCULATE,
        started,
        Ok(CalculateResponse {
            unit: inputs.asset_class.unit_label().to_string(),
            inputs,
            outputs,
        }),
    )
}

/// Risk sync endpoint: derive the non-authoritative risk field.
async fn risk_sync(Json(mut inputs): Json<CalculatorInputs>) -> Response {
    let started = Instant::now();
    sync_risk(&mut inputs);
    respond(ROUTE_RISK_SYNC, started, Ok(inputs))
}

/// Fresh inputs seeded from the configured defaults.
async fn defaults(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    respond(ROUTE_DEFAULTS, started, Ok(state.calculator.defaults.inputs()))
}

// ============================================
// Reference data
// ============================================

/// Forex pair listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ForexPairsResponse {
    /// Every pair, table order.
    pub pairs: Vec<ForexPairSpec>,
    /// Dropdown options.
    pub options: Vec<PairOption>,
    /// Pairs grouped by category.
    pub categories: BTreeMap<PairCategory, Vec<ForexPairSpec>>,
}

async fn forex_pairs(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let table = state.pairs.as_ref();
    respond(
        ROUTE_FOREX_PAIRS,
        started,
        Ok(ForexPairsResponse {
            pairs: table.pairs().to_vec(),
            options: table.options(),
            categories: table.by_category(),
        }),
    )
}

/// Exchange preset listing.
#[derive(Debug, Serialize)]
pub struct ExchangePresetsResponse {
    /// Preset selected by default.
    pub default: &'static str,
    /// Known exchanges.
    pub presets: &'static [ExchangePreset],
}

async fn exchange_presets() -> Response {
    let started = Instant::now();
    respond(
        ROUTE_EXCHANGE_PRESETS,
        started,
        Ok(ExchangePresetsResponse {
            default: DEFAULT_EXCHANGE,
            presets: EXCHANGE_PRESETS,
        }),
    )
}

// ============================================
// Charges
// ============================================

/// Request to estimate exchange fees.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimateRequest {
    /// Preset name. `Custom` uses `custom_fee_percent`; absent uses the default preset.
    #[serde(default)]
    pub exchange: Option<String>,
    /// Fee side.
    #[serde(default)]
    pub order_type: OrderType,
    /// Custom fee in percent, e.g. `"0.04"`.
    #[serde(default)]
    pub custom_fee_percent: Option<String>,
    /// Opening notional.
    pub entry_value: f64,
    /// Closing notional.
    pub exit_value: f64,
    /// Profit before fees.
    #[serde(default)]
    pub gross_profit: f64,
}

/// Fee estimate with the rate that produced it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimateResponse {
    /// Fee rate as a fraction.
    pub fee_rate: f64,
    /// Fee rate in percent, three decimals.
    pub fee_percent: String,
    /// The estimate.
    #[serde(flatten)]
    pub estimate: FeeEstimate,
}

async fn fees_estimate(Json(req): Json<FeeEstimateRequest>) -> Response {
    let started = Instant::now();
    respond(ROUTE_FEES, started, estimate_for(&req))
}

fn estimate_for(req: &FeeEstimateRequest) -> Result<FeeEstimateResponse, ApiError> {
    let exchange = req.exchange.as_deref().unwrap_or(DEFAULT_EXCHANGE);
    let fee_rate = if exchange == CUSTOM_EXCHANGE {
        req.custom_fee_percent.as_deref().map_or(0.0, percent_to_fee)
    } else {
        preset(exchange)
            .ok_or_else(|| EngineError::exchange_not_found(exchange))?
            .fee(req.order_type)
    };

    Ok(FeeEstimateResponse {
        fee_rate,
        fee_percent: fee_to_percent(fee_rate),
        estimate: estimate_fees(req.entry_value, req.exit_value, fee_rate, req.gross_profit),
    })
}

/// Request for Indian equity charges.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndiaChargesRequest {
    /// Buy price per share.
    pub entry_price: Decimal,
    /// Sell price per share.
    pub exit_price: Decimal,
    /// Number of shares.
    pub quantity: u64,
    /// Intraday or delivery.
    #[serde(default)]
    pub mode: IndiaTradeMode,
    /// Account balance, for the margin-limited quantity.
    #[serde(default)]
    pub balance: Option<Decimal>,
}

/// Indian equity charges plus margin information.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndiaChargesResponse {
    /// Charge breakdown.
    #[serde(flatten)]
    pub charges: IndiaCharges,
    /// Broker leverage for the mode.
    pub leverage: Decimal,
    /// Largest quantity the balance can carry, when a balance was given.
    pub max_quantity: Option<u64>,
}

async fn india_charges(Json(req): Json<IndiaChargesRequest>) -> Response {
    let started = Instant::now();
    respond(ROUTE_INDIA, started, india_charges_for(&req))
}

fn india_charges_for(req: &IndiaChargesRequest) -> Result<IndiaChargesResponse, ApiError> {
    if req.entry_price.is_sign_negative() {
        return Err(
            EngineError::invalid_request("entryPrice", "Entry price cannot be negative").into(),
        );
    }
    if req.exit_price.is_sign_negative() {
        return Err(
            EngineError::invalid_request("exitPrice", "Exit price cannot be negative").into(),
        );
    }
    if req.balance.is_some_and(|b| b.is_sign_negative()) {
        return Err(EngineError::invalid_request("balance", "Balance cannot be negative").into());
    }

    let charges = calculate_india_charges(req.entry_price, req.exit_price, req.quantity, req.mode)
        .ok_or_else(|| {
            EngineError::invalid_request("quantity", "Trade value is out of range")
                .with_context("quantity", req.quantity.to_string())
        })?;

    Ok(IndiaChargesResponse {
        charges,
        leverage: req.mode.leverage(),
        max_quantity: req
            .balance
            .map(|balance| max_margin_quantity(balance, req.entry_price, req.mode)),
    })
}

// ============================================
// Formatting
// ============================================

/// One entry of the locale picker.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleInfo {
    /// BCP 47 tag.
    pub code: SupportedLocale,
    /// Name in its own language.
    pub name: String,
    /// ISO 4217 currency code.
    pub currency: String,
}

async fn locales() -> Response {
    let started = Instant::now();
    let listing: Vec<LocaleInfo> = SupportedLocale::ALL
        .iter()
        .map(|locale| LocaleInfo {
            code: *locale,
            name: locale.display_name().to_string(),
            currency: locale.currency().to_string(),
        })
        .collect();
    respond(ROUTE_LOCALES, started, Ok(listing))
}

/// How a value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStyle {
    /// Plain number, trailing zeros trimmed.
    #[default]
    Number,
    /// Money in the locale's currency.
    Currency,
    /// Percent units.
    Percentage,
}

/// Request to format a number for display.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRequest {
    /// Value to render.
    pub value: f64,
    /// Locale tag; `Accept-Language` is used when absent.
    #[serde(default)]
    pub locale: Option<String>,
    /// Rendering style.
    #[serde(default)]
    pub style: FormatStyle,
    /// Fraction digit cap for `number`.
    #[serde(default = "default_max_decimals")]
    pub max_decimals: u32,
}

const fn default_max_decimals() -> u32 {
    2
}

/// Formatted value.
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatResponse {
    /// Display string.
    pub formatted: String,
    /// Locale used.
    pub locale: SupportedLocale,
}

async fn format_value(headers: HeaderMap, Json(req): Json<FormatRequest>) -> Response {
    let started = Instant::now();
    respond(ROUTE_FORMAT, started, format_for(&headers, &req))
}

fn format_for(headers: &HeaderMap, req: &FormatRequest) -> Result<FormatResponse, ApiError> {
    let locale = match req.locale.as_deref() {
        Some(tag) => tag
            .parse::<SupportedLocale>()
            .map_err(|e| EngineError::unsupported_locale(&e.0))?,
        None => headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map_or_else(SupportedLocale::default, detect_locale),
    };

    let formatted = match req.style {
        FormatStyle::Number => format_number(req.value, locale, req.max_decimals),
        FormatStyle::Currency => format_currency(req.value, locale),
        FormatStyle::Percentage => format_percentage(req.value, locale),
    };

    Ok(FormatResponse { formatted, locale })
}

// ============================================
// Errors
// ============================================

/// API error type with rich error details.
#[derive(Debug)]
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(code = %self.0.code(), message = self.0.message(), "Request rejected");
        let status = self.0.code().http_status();
        (status, Json(self.0.to_http_response())).into_response()
    }
}
