//! Server implementation.
//!
//! This module provides the HTTP/JSON API over the calculator library.

mod http;

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

pub use http::{
    ApiError, AppState, CalculateRequest, CalculateResponse, ExchangePresetsResponse,
    FeeEstimateRequest, FeeEstimateResponse, ForexPairsResponse, FormatRequest, FormatResponse,
    FormatStyle, HealthResponse, IndiaChargesRequest, IndiaChargesResponse, LocaleInfo, create_router,
};

use crate::config::ServerConfig;

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Bind address is not an IP address.
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    /// Failed to bind the listener.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind.
        addr: SocketAddr,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The server stopped with an IO error.
    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Socket address the server listens on.
///
/// # Errors
///
/// Returns an error if `bind_address` is not an IP address.
pub fn listen_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
    let ip: IpAddr = config
        .bind_address
        .parse()
        .map_err(|_| ServerError::InvalidAddress(config.bind_address.clone()))?;
    Ok(SocketAddr::new(ip, config.http_port))
}

/// Bind and serve the API until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address is invalid, the port cannot be bound, or
/// the server fails while running.
pub async fn serve<F>(config: &ServerConfig, state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listen_addr(config)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!(%addr, "HTTP server starting");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
