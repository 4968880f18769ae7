//! Tests for gateway errors and configuration.

use std::time::Duration;

use serial_test::serial;

use crate::config::{GatewayConfig, SaveMode, DEFAULT_TENANT_HEADER};
use crate::error::GatewayError;
use crate::gateway::DocumentGateway;
use crate::transport::HttpTransport;

// =============================================================================
// Test Helpers
// =============================================================================

const ENV_VARS: [&str; 6] = [
    "DOCGATE_BASE_URL",
    "DOCGATE_TENANT_ID",
    "DOCGATE_NAMESPACE",
    "DOCGATE_TENANT_HEADER",
    "DOCGATE_SAVE_MODE",
    "DOCGATE_CONNECT_TIMEOUT_SECS",
];

fn set_required_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
    std::env::set_var("DOCGATE_BASE_URL", "http://localhost:3000");
    std::env::set_var("DOCGATE_TENANT_ID", "t1");
    std::env::set_var("DOCGATE_NAMESPACE", "app");
}

// =============================================================================
// Error Type Tests
// =============================================================================

#[test]
fn test_error_from_http_status_keeps_status() {
    let err = GatewayError::from_http_status(503, "service unavailable");
    assert!(matches!(err, GatewayError::Transport { status: 503, .. }));
    assert_eq!(err.http_status(), Some(503));
    assert!(!err.is_not_found());
}

#[test]
fn test_error_404_is_not_found() {
    let err = GatewayError::from_http_status(404, "missing");
    assert!(err.is_not_found());
    assert_eq!(err.http_status(), Some(404));
}

#[test]
fn test_non_transport_errors_have_no_status() {
    assert_eq!(GatewayError::invalid_argument("x").http_status(), None);
    assert_eq!(GatewayError::config("x").http_status(), None);
    assert!(!GatewayError::InvalidResponse("x".into()).is_not_found());
}

#[test]
fn test_error_display_includes_status() {
    let err = GatewayError::transport(500, "boom");
    assert_eq!(err.to_string(), "Transport error (HTTP 500): boom");
}

// =============================================================================
// Save Mode Tests
// =============================================================================

#[test]
fn test_save_mode_parsing() {
    assert_eq!("upsert".parse::<SaveMode>().unwrap(), SaveMode::Upsert);
    assert_eq!(" Direct ".parse::<SaveMode>().unwrap(), SaveMode::Direct);
    assert!(matches!(
        "merge".parse::<SaveMode>(),
        Err(GatewayError::Config(_))
    ));
    assert_eq!(SaveMode::default(), SaveMode::Upsert);
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = GatewayConfig::new("http://localhost:3000", "t1", "app");
    assert_eq!(config.tenant_header, DEFAULT_TENANT_HEADER);
    assert_eq!(config.save_mode, SaveMode::Upsert);
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
}

#[test]
#[serial]
fn test_config_from_env_requires_base_url() {
    set_required_env();
    std::env::remove_var("DOCGATE_BASE_URL");
    let result = GatewayConfig::from_env();
    assert!(matches!(result, Err(GatewayError::Config(_))));
}

#[test]
#[serial]
fn test_config_from_env_rejects_empty_tenant() {
    set_required_env();
    std::env::set_var("DOCGATE_TENANT_ID", "");
    assert!(GatewayConfig::from_env().is_err());
}

#[test]
#[serial]
fn test_config_from_env_default_values() {
    set_required_env();
    let config = GatewayConfig::from_env().unwrap();
    assert_eq!(config.base_url, "http://localhost:3000");
    assert_eq!(config.tenant_id, "t1");
    assert_eq!(config.namespace, "app");
    assert_eq!(config.tenant_header, "x-client-id");
    assert_eq!(config.save_mode, SaveMode::Upsert);
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
}

#[test]
#[serial]
fn test_config_from_env_overrides() {
    set_required_env();
    std::env::set_var("DOCGATE_TENANT_HEADER", "x-tenant");
    std::env::set_var("DOCGATE_SAVE_MODE", "direct");
    std::env::set_var("DOCGATE_CONNECT_TIMEOUT_SECS", "15");
    let config = GatewayConfig::from_env().unwrap();
    assert_eq!(config.tenant_header, "x-tenant");
    assert_eq!(config.save_mode, SaveMode::Direct);
    assert_eq!(config.connect_timeout, Duration::from_secs(15));
}

#[test]
#[serial]
fn test_config_handles_invalid_timeout() {
    set_required_env();
    std::env::set_var("DOCGATE_CONNECT_TIMEOUT_SECS", "not-a-number");
    let config = GatewayConfig::from_env().unwrap();
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
}

#[test]
#[serial]
fn test_config_rejects_unknown_save_mode() {
    set_required_env();
    std::env::set_var("DOCGATE_SAVE_MODE", "sometimes");
    assert!(matches!(
        GatewayConfig::from_env(),
        Err(GatewayError::Config(_))
    ));
}

#[test]
#[serial]
fn test_gateway_from_env() {
    set_required_env();
    std::env::set_var("DOCGATE_SAVE_MODE", "direct");
    let gateway = DocumentGateway::from_env().unwrap();
    assert_eq!(gateway.save_mode(), SaveMode::Direct);
    assert_eq!(gateway.tenant().tenant_id(), "t1");
}

// =============================================================================
// Transport Construction Tests
// =============================================================================

#[test]
fn test_transport_rejects_bad_header_name() {
    let config = GatewayConfig::new("http://localhost:3000", "t1", "app")
        .with_tenant_header("bad header");
    assert!(matches!(
        HttpTransport::new(&config),
        Err(GatewayError::Config(_))
    ));
}

#[test]
fn test_transport_rejects_tenant_id_with_newline() {
    let config = GatewayConfig::new("http://localhost:3000", "t1\n", "app");
    assert!(matches!(
        HttpTransport::new(&config),
        Err(GatewayError::Config(_))
    ));
}

#[test]
fn test_transport_exposes_tenant_context() {
    let config = GatewayConfig::new("http://localhost:3000/", "t1", "app");
    let transport = HttpTransport::new(&config).unwrap();
    assert_eq!(transport.tenant().base_url(), "http://localhost:3000");
    assert_eq!(transport.tenant().namespace(), "app");
}
