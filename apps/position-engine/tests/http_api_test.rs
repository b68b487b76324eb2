//! End-to-end tests for the JSON API.
//!
//! Drives the router the same way a browser session would: load defaults,
//! pick a pair, sync risk and compute, then format the results.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use position_engine::calculator::{
    AssetClass, CalculatorInputs, RiskPercentPolicy, StopLossMode, TradeDirection,
};
use position_engine::config::{CalculatorConfig, load_config_from_string};
use position_engine::instruments::ForexPairTable;
use position_engine::server::{AppState, CalculateResponse, FormatResponse, create_router};
use serde_json::json;
use tower::ServiceExt;

fn router_with(calculator: CalculatorConfig) -> axum::Router {
    create_router(AppState::new(ForexPairTable::standard(), calculator))
}

async fn send(app: axum::Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> Response {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn forex_session_end_to_end() {
    let app = router_with(CalculatorConfig::default());

    let mut inputs: CalculatorInputs =
        json_body(send(app.clone(), "GET", "/v1/defaults", None).await).await;
    inputs.asset_class = AssetClass::Forex;
    inputs.forex_pair = "EUR/USD".to_string();
    inputs.balance = "10000".to_string();
    inputs.entry_price = "1.2500".to_string();
    inputs.stop_loss_price = "1.2480".to_string();
    inputs.target_price = "1.2560".to_string();

    let result: CalculateResponse = json_body(
        send(
            app.clone(),
            "POST",
            "/v1/calculate",
            Some(json!({ "inputs": inputs, "touched": ["entryPrice", "stopLossPrice"] })),
        )
        .await,
    )
    .await;

    let out = &result.outputs;
    assert_eq!(result.unit, "lots");
    assert_eq!(out.risk_amount, 100.0);
    assert_eq!(out.position_size_units, 0.5);
    assert_eq!(out.trade_direction, Some(TradeDirection::Long));
    assert!((out.position_size_value - 62_500.0).abs() < 1e-6);
    assert!((out.margin_required - 6_250.0).abs() < 1e-6);
    assert!((out.potential_profit - 300.0).abs() < 1e-6);
    assert!((out.rrr - 3.0).abs() < 1e-9);
    assert!((out.pip_value.unwrap() - 5.0).abs() < 1e-9);
    assert!(out.forex_min_risk.is_none());
    assert!(out.is_complete);

    let formatted: FormatResponse = json_body(
        send(
            app,
            "POST",
            "/v1/format",
            Some(json!({ "value": out.margin_required, "locale": "fr-FR", "style": "currency" })),
        )
        .await,
    )
    .await;
    assert_eq!(formatted.formatted, "6\u{202f}250,00\u{a0}€");
}

#[tokio::test]
async fn forex_pips_mode_over_http() {
    let app = router_with(CalculatorConfig::default());
    let body = json!({
        "inputs": {
            "assetClass": "forex",
            "forexPair": "USDJPY",
            "balance": "20000",
            "riskPercent": "0.5",
            "entryPrice": "150.00",
            "stopLossMode": "pips",
            "stopLossPips": "25",
            "targetPrice": "149.00"
        }
    });

    let result: CalculateResponse = json_body(send(app, "POST", "/v1/calculate", Some(body)).await).await;

    assert_eq!(result.inputs.stop_loss_mode, StopLossMode::Pips);
    assert_eq!(result.inputs.risk_fiat, "100.00");
    // 25 pips of 0.01 = 0.25; 100 / (0.25 * 100000) = 0.004 lots, below the minimum
    assert_eq!(result.outputs.position_size_units, 0.0);
    assert!((result.outputs.forex_min_risk.unwrap() - 250.0).abs() < 1e-9);
    assert_eq!(result.outputs.trade_direction, Some(TradeDirection::Short));
}

#[tokio::test]
async fn clamp_policy_from_config() {
    let config = load_config_from_string(
        r"
calculator:
  risk_percent_policy: clamp
",
    )
    .unwrap();
    assert_eq!(config.calculator.risk_percent_policy, RiskPercentPolicy::Clamp);

    let body = json!({
        "inputs": {
            "balance": "1000",
            "riskPercent": "150",
            "entryPrice": "10",
            "stopLossPrice": "9",
            "leverage": "1"
        },
        "touched": ["riskPercent"]
    });

    let clamped: CalculateResponse = json_body(
        send(router_with(config.calculator), "POST", "/v1/calculate", Some(body.clone())).await,
    )
    .await;
    assert_eq!(clamped.outputs.risk_amount, 1000.0);
    assert_eq!(
        clamped.outputs.field_errors.values().next().map(String::as_str),
        Some("Risk cannot exceed 100%")
    );

    let passed: CalculateResponse = json_body(
        send(router_with(CalculatorConfig::default()), "POST", "/v1/calculate", Some(body)).await,
    )
    .await;
    assert_eq!(passed.outputs.risk_amount, 1500.0);
    assert!(passed.outputs.insufficient_margin);
}

#[tokio::test]
async fn configured_defaults_are_served() {
    let config = load_config_from_string(
        r"
calculator:
  defaults:
    asset_class: futures
    risk_percent: 2
    lot_size: 25
",
    )
    .unwrap();

    let inputs: CalculatorInputs =
        json_body(send(router_with(config.calculator), "GET", "/v1/defaults", None).await).await;
    assert_eq!(inputs.asset_class, AssetClass::Futures);
    assert_eq!(inputs.risk_percent, "2");
    assert_eq!(inputs.lot_size, "25");
    assert_eq!(inputs.leverage, "10");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = send(router_with(CalculatorConfig::default()), "GET", "/v1/nope", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
