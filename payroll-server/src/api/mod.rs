//! HTTP API over the payroll engine.
//!
//! | Method | Path                          | Body                                   |
//! |--------|-------------------------------|----------------------------------------|
//! | POST   | `/api/salary/calculate-net`   | `{ grossSalary, contributionSalary? }` |
//! | POST   | `/api/salary/calculate-gross` | `{ netSalary }`                        |
//! | POST   | `/api/salary/words`           | `{ amount, language? }`                |
//!
//! Every response is JSON with a `status` of `"success"` or `"error"`.

pub mod dto;
mod error;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use payroll_core::{DeductionPipeline, GrossSolver, Language, cap_contribution};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::ServerConfig;
pub use dto::*;
pub use error::ApiError;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    solver: Arc<GrossSolver<'static>>,
    strict_convergence: bool,
}

impl AppState {
    /// # Errors
    ///
    /// [`ApiError::Payroll`] if the solver tuning is invalid.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let solver = GrossSolver::new(DeductionPipeline::statutory(), config.solver.clone())?;
        Ok(Self {
            solver: Arc::new(solver),
            strict_convergence: config.strict_convergence,
        })
    }

    fn pipeline(&self) -> DeductionPipeline<'static> {
        self.solver.pipeline()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/salary/calculate-net", post(calculate_net))
        .route("/api/salary/calculate-gross", post(calculate_gross))
        .route("/api/salary/words", post(words))
        .fallback(not_found)
        .with_state(state)
}

/// Binds `config.socket_addr()` and serves until the process is stopped.
pub async fn run_http_server(config: &ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(config).context("Invalid solver configuration")?;
    let addr = config.socket_addr();

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        %addr,
        strict_convergence = config.strict_convergence,
        "payroll API listening"
    );

    axum::serve(listener, router(state))
        .await
        .context("HTTP server stopped unexpectedly")
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn require_positive(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ApiError> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(ApiError::BadRequest(format!(
            "{field} must be greater than zero, got {value}"
        )))
    }
}

pub async fn calculate_net(
    State(state): State<AppState>,
    payload: Result<Json<CalculateNetRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = parse_body(payload)?;
    let gross = require_positive("grossSalary", request.gross_salary)?;
    let contribution = match request.contribution_salary {
        Some(c) if c > Decimal::ZERO => c,
        _ => cap_contribution(gross).amount(),
    };

    let breakdown = state.pipeline().calculate(gross, contribution)?;
    info!(%gross, net = %breakdown.net_salary, "calculated net salary");

    Ok(json_response(
        StatusCode::OK,
        CalculateNetResponse::new(&breakdown),
    ))
}

pub async fn calculate_gross(
    State(state): State<AppState>,
    payload: Result<Json<CalculateGrossRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = parse_body(payload)?;
    let target = require_positive("netSalary", request.net_salary)?;

    let mut result = state.solver.solve(target)?;
    if state.strict_convergence {
        result = result.into_exact()?;
    } else if !result.is_exact() {
        warn!(%target, residual = %result.residual, "returning best-effort gross");
    }

    let breakdown = state
        .pipeline()
        .calculate(result.gross_salary, result.contribution_salary)?;
    info!(
        %target,
        gross = %result.gross_salary,
        iterations = result.iterations,
        convergence = ?result.convergence,
        "calculated gross salary"
    );

    Ok(json_response(
        StatusCode::OK,
        CalculateGrossResponse::new(&result, &breakdown),
    ))
}

pub async fn words(
    payload: Result<Json<WordsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = parse_body(payload)?;
    let language = Language::parse(&request.language).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "unsupported language '{}' (expected 'en' or 'ar')",
            request.language
        ))
    })?;

    let response = WordsResponse::render(request.amount, language)?;
    info!(amount = %request.amount, language = language.as_str(), "rendered amount in words");

    Ok(json_response(StatusCode::OK, response))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

pub(crate) fn json_response<T: Serialize>(
    status: StatusCode,
    body: T,
) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
