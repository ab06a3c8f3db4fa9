//! Integration tests for the scan and health endpoints

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::fixtures::{REPORT_CLEAN, REPORT_MIXED_SEVERITIES, REPORT_SINGLE_CRITICAL};
use common::helpers::{StubScanner, api_key_config, test_config, test_server};
use trivy_gateway::domain::errors::ScanError;

#[tokio::test]
async fn test_scan_returns_normalized_report() {
    let scanner = StubScanner::returning(REPORT_SINGLE_CRITICAL);
    let server = test_server(scanner.clone(), test_config());

    let response = server
        .post("/scan")
        .json(&json!({"image": "nginx:latest"}))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();

    assert_eq!(body["scanner"], "Trivy");
    assert_eq!(body["image"], "nginx:latest");
    assert!(body["scan_time"].as_str().unwrap().contains('T'));

    assert_eq!(
        body["summary"],
        json!({"total": 1, "critical": 1, "high": 0, "medium": 0, "low": 0})
    );

    let vulnerability = &body["vulnerabilities"][0];
    assert_eq!(vulnerability["cve_id"], "CVE-2024-6387");
    assert_eq!(vulnerability["package"], "openssh");
    assert_eq!(vulnerability["severity"], "CRITICAL");
    assert_eq!(vulnerability["fixed_version"], "9.8p1");

    assert_eq!(scanner.calls(), 1);
}

#[tokio::test]
async fn test_scan_orders_findings_and_counts_unknown_in_total_only() {
    let server = test_server(StubScanner::returning(REPORT_MIXED_SEVERITIES), test_config());

    let response = server
        .post("/scan")
        .json(&json!({"image": "shop/api:2.4.1"}))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();

    let ids: Vec<&str> = body["vulnerabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["cve_id"].as_str().unwrap())
        .collect();
    // Severity-descending, then CVE ascending; the NEGLIGIBLE finding
    // degrades to UNKNOWN and sorts last.
    assert_eq!(
        ids,
        vec!["CVE-2024-0010", "CVE-2024-0020", "CVE-2024-0030", "CVE-2024-0040"]
    );

    assert_eq!(
        body["summary"],
        json!({"total": 4, "critical": 1, "high": 1, "medium": 0, "low": 1})
    );
}

#[tokio::test]
async fn test_scan_of_clean_image_returns_empty_report() {
    let server = test_server(StubScanner::returning(REPORT_CLEAN), test_config());

    let response = server
        .post("/scan")
        .json(&json!({"image": "scratch"}))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["image"], "scratch:latest");
    assert_eq!(body["vulnerabilities"], json!([]));
    assert_eq!(body["summary"]["total"], 0);
}

#[tokio::test]
async fn test_empty_image_is_rejected_before_the_scanner_runs() {
    let scanner = StubScanner::returning(REPORT_CLEAN);
    let server = test_server(scanner.clone(), test_config());

    let response = server.post("/scan").json(&json!({"image": ""})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "InvalidImage");
    assert!(body["error"]["message"].as_str().unwrap().len() > 0);
    assert_eq!(scanner.calls(), 0);
}

#[tokio::test]
async fn test_missing_image_field_is_rejected() {
    let scanner = StubScanner::returning(REPORT_CLEAN);
    let server = test_server(scanner.clone(), test_config());

    let response = server.post("/scan").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "InvalidImage");
    assert_eq!(scanner.calls(), 0);
}

#[tokio::test]
async fn test_registry_failure_maps_to_bad_gateway() {
    let server = test_server(
        StubScanner::failing(|| ScanError::RegistryUnreachable("failed to pull the image".into())),
        test_config(),
    );

    let response = server
        .post("/scan")
        .json(&json!({"image": "registry.internal/app:1.0"}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "RegistryUnreachable");
}

#[tokio::test]
async fn test_scan_timeout_maps_to_gateway_timeout() {
    let server = test_server(
        StubScanner::failing(|| ScanError::ScanTimeout(300)),
        test_config(),
    );

    let response = server
        .post("/scan")
        .json(&json!({"image": "nginx:latest"}))
        .await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "ScanTimeout");
}

#[tokio::test]
async fn test_scan_failure_maps_to_internal_server_error() {
    let server = test_server(
        StubScanner::failing(|| ScanError::ScanFailure("corrupt layer".into())),
        test_config(),
    );

    let response = server
        .post("/scan")
        .json(&json!({"image": "nginx:latest"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "ScanFailure");
}

#[tokio::test]
async fn test_api_key_enforcement_rejects_missing_and_wrong_keys() {
    let scanner = StubScanner::returning(REPORT_CLEAN);
    let server = test_server(scanner.clone(), api_key_config("secret-key"));

    let missing = server.post("/scan").json(&json!({"image": "nginx"})).await;
    missing.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = missing.json();
    assert_eq!(body["error"]["kind"], "Unauthorized");

    let wrong = server
        .post("/scan")
        .add_header("x-api-key", "not-the-key")
        .json(&json!({"image": "nginx"}))
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);

    // Neither rejected request may reach the scanner.
    assert_eq!(scanner.calls(), 0);

    let accepted = server
        .post("/scan")
        .add_header("x-api-key", "secret-key")
        .json(&json!({"image": "nginx"}))
        .await;
    accepted.assert_status(StatusCode::OK);
    assert_eq!(scanner.calls(), 1);
}

#[tokio::test]
async fn test_api_key_accepted_as_bearer_token() {
    let server = test_server(StubScanner::returning(REPORT_CLEAN), api_key_config("secret-key"));

    let response = server
        .post("/scan")
        .add_header("authorization", "Bearer secret-key")
        .json(&json!({"image": "nginx"}))
        .await;

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_open_even_with_api_key_enforcement() {
    let server = test_server(StubScanner::returning(REPORT_CLEAN), api_key_config("secret-key"));

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_invalid_severity_filter_is_rejected() {
    let scanner = StubScanner::returning(REPORT_CLEAN);
    let server = test_server(scanner.clone(), test_config());

    let response = server
        .post("/scan")
        .json(&json!({"image": "nginx", "severity": "SEVERE"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(scanner.calls(), 0);
}
