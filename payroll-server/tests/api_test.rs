//! Integration tests for the HTTP API.
//!
//! Handlers are called directly for the happy paths; routing, fallbacks and
//! body rejections go through the assembled router.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use payroll_core::{Convergence, SolverConfig};
use payroll_server::api::{
    CalculateGrossRequest, CalculateGrossResponse, CalculateNetRequest, CalculateNetResponse,
    ErrorResponse, WordsRequest, WordsResponse, calculate_gross, calculate_net, words,
};
use payroll_server::{ApiError, AppState, ServerConfig, router};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

fn state() -> AppState {
    AppState::new(&ServerConfig::default()).expect("default config is valid")
}

/// Solver that can never meet its tolerance.
fn starved_config(strict: bool) -> ServerConfig {
    ServerConfig {
        strict_convergence: strict,
        solver: SolverConfig {
            max_newton_iterations: 0,
            max_bisection_iterations: 2,
            ..SolverConfig::default()
        },
        ..ServerConfig::default()
    }
}

async fn body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not the expected JSON")
}

fn status_of(result: Result<Response, ApiError>) -> StatusCode {
    match result {
        Ok(response) => response.status(),
        Err(error) => error.into_response().status(),
    }
}

// =============================================================================
// calculate-net
// =============================================================================

#[tokio::test]
async fn test_calculate_net_ten_thousand() {
    let request = CalculateNetRequest {
        gross_salary: dec!(10000),
        contribution_salary: None,
    };

    let response = calculate_net(State(state()), Ok(Json(request)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "no-store"
    );
    let body: CalculateNetResponse = body(response).await;
    assert_eq!(body.status, "success");
    assert_eq!(body.net_salary, dec!(8302.50));
    assert_eq!(body.breakdown.employee_share, dec!(1100));
    assert_eq!(body.breakdown.martyrs_fund, dec!(5));
    assert_eq!(body.breakdown.annual_tax_base, dec!(86800));
    assert_eq!(body.breakdown.annual_tax, dec!(7110));
    assert_eq!(body.breakdown.monthly_tax, dec!(592.50));
}

#[tokio::test]
async fn test_calculate_net_caps_missing_contribution() {
    let request = CalculateNetRequest {
        gross_salary: dec!(30000),
        contribution_salary: Some(dec!(0)),
    };

    let response = calculate_net(State(state()), Ok(Json(request)))
        .await
        .unwrap();

    let body: CalculateNetResponse = body(response).await;
    assert_eq!(body.breakdown.contribution_salary, dec!(14500));
    assert_eq!(body.breakdown.employee_share, dec!(1595));
}

#[tokio::test]
async fn test_calculate_net_rejects_zero_gross() {
    let request = CalculateNetRequest {
        gross_salary: dec!(0),
        contribution_salary: None,
    };

    let result = calculate_net(State(state()), Ok(Json(request))).await;

    assert_eq!(status_of(result), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calculate_net_negative_contribution_falls_back_to_cap() {
    let request = CalculateNetRequest {
        gross_salary: dec!(5000),
        contribution_salary: Some(dec!(-1)),
    };

    let response = calculate_net(State(state()), Ok(Json(request)))
        .await
        .unwrap();

    let body: CalculateNetResponse = body(response).await;
    assert_eq!(body.breakdown.contribution_salary, dec!(5000));
}

// =============================================================================
// calculate-gross
// =============================================================================

#[tokio::test]
async fn test_calculate_gross_recovers_ten_thousand() {
    let request = CalculateGrossRequest {
        net_salary: dec!(8302.50),
    };

    let response = calculate_gross(State(state()), Ok(Json(request)))
        .await
        .unwrap();

    let body: CalculateGrossResponse = body(response).await;
    assert_eq!(body.status, "success");
    assert_eq!(body.convergence, Convergence::Newton);
    assert!((body.gross_salary - dec!(10000)).abs() <= dec!(0.02));
    assert!((body.net_salary - dec!(8302.50)).abs() <= dec!(0.01));
    assert_eq!(body.contribution_salary, body.gross_salary);
}

#[tokio::test]
async fn test_calculate_gross_above_cap_reports_capped_contribution() {
    let request = CalculateGrossRequest {
        net_salary: dec!(40000),
    };

    let response = calculate_gross(State(state()), Ok(Json(request)))
        .await
        .unwrap();

    let body: CalculateGrossResponse = body(response).await;
    assert_eq!(body.contribution_salary, dec!(14500));
    assert!(body.gross_salary > dec!(40000));
}

#[tokio::test]
async fn test_calculate_gross_rejects_non_positive_net() {
    let request = CalculateGrossRequest {
        net_salary: dec!(-100),
    };

    let result = calculate_gross(State(state()), Ok(Json(request))).await;

    assert_eq!(status_of(result), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_best_effort_is_returned_when_not_strict() {
    let state = AppState::new(&starved_config(false)).unwrap();
    let request = CalculateGrossRequest {
        net_salary: dec!(10000),
    };

    let response = calculate_gross(State(state), Ok(Json(request)))
        .await
        .unwrap();

    let body: CalculateGrossResponse = body(response).await;
    assert_eq!(body.convergence, Convergence::BestEffort);
    assert_eq!(body.iterations, 2);
}

#[tokio::test]
async fn test_best_effort_is_unprocessable_when_strict() {
    let state = AppState::new(&starved_config(true)).unwrap();
    let request = CalculateGrossRequest {
        net_salary: dec!(10000),
    };

    let result = calculate_gross(State(state), Ok(Json(request))).await;

    assert_eq!(status_of(result), StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// words
// =============================================================================

#[tokio::test]
async fn test_words_english() {
    let request = WordsRequest {
        amount: dec!(1001),
        language: "en".to_string(),
    };

    let response = words(Ok(Json(request))).await.unwrap();

    let body: WordsResponse = body(response).await;
    assert_eq!(body.words, vec!["One", "Thousand", "One"]);
    assert_eq!(body.text, "One Thousand One Egyptian Pounds Only");
}

#[tokio::test]
async fn test_words_arabic() {
    let request = WordsRequest {
        amount: dec!(100),
        language: "arabic".to_string(),
    };

    let response = words(Ok(Json(request))).await.unwrap();

    let body: WordsResponse = body(response).await;
    assert_eq!(body.language, "ar");
    assert_eq!(body.words, vec!["مائة"]);
    assert_eq!(body.text, "فقط مائة جنيهاً مصرياً لا غير");
}

#[tokio::test]
async fn test_words_rejects_unknown_language_and_negative_arabic() {
    let unknown = WordsRequest {
        amount: dec!(5),
        language: "fr".to_string(),
    };
    let negative = WordsRequest {
        amount: dec!(-5),
        language: "ar".to_string(),
    };

    assert_eq!(
        status_of(words(Ok(Json(unknown))).await),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_of(words(Ok(Json(negative))).await),
        StatusCode::BAD_REQUEST
    );
}

// =============================================================================
// routing through the full router
// =============================================================================

async fn send(
    method: Method,
    uri: &str,
    body: &'static str,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    router(state()).oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_router_serves_calculate_net() {
    let response = send(
        Method::POST,
        "/api/salary/calculate-net",
        r#"{"grossSalary": "10000"}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: CalculateNetResponse = body(response).await;
    assert_eq!(body.net_salary, dec!(8302.50));
}

#[tokio::test]
async fn test_router_rejects_malformed_json() {
    let response = send(Method::POST, "/api/salary/calculate-gross", "{netSalary:").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = body(response).await;
    assert_eq!(body.status, "error");
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_router_rejects_missing_field() {
    let response = send(Method::POST, "/api/salary/calculate-gross", "{}").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_router_unknown_route_is_not_found() {
    let response = send(Method::GET, "/api/salary/unknown", "").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = body(response).await;
    assert_eq!(body.error, "Not found");
}
