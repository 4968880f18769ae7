//! Gateway configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{GatewayError, GatewayResult};

/// Header carrying the tenant identifier when none is configured.
pub const DEFAULT_TENANT_HEADER: &str = "x-client-id";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// How `save` treats a document that carries an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Update, and create instead when the backend reports 404.
    #[default]
    Upsert,
    /// Update only. A 404 is returned to the caller.
    Direct,
}

impl SaveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveMode::Upsert => "upsert",
            SaveMode::Direct => "direct",
        }
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveMode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(SaveMode::Upsert),
            "direct" => Ok(SaveMode::Direct),
            other => Err(GatewayError::config(format!(
                "unknown save mode '{}', expected 'upsert' or 'direct'",
                other
            ))),
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    /// Tenant identifier sent with every request
    pub tenant_id: String,
    /// Application namespace prefixed to collection names
    pub namespace: String,
    /// Name of the header carrying the tenant identifier
    pub tenant_header: String,
    pub save_mode: SaveMode,
    /// Connect timeout. No overall request timeout is applied.
    pub connect_timeout: Duration,
}

impl GatewayConfig {
    /// Create a config with default header, save mode and timeouts.
    pub fn new(
        base_url: impl Into<String>,
        tenant_id: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            tenant_id: tenant_id.into(),
            namespace: namespace.into(),
            tenant_header: DEFAULT_TENANT_HEADER.to_string(),
            save_mode: SaveMode::default(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_save_mode(mut self, save_mode: SaveMode) -> Self {
        self.save_mode = save_mode;
        self
    }

    pub fn with_tenant_header(mut self, header: impl Into<String>) -> Self {
        self.tenant_header = header.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> GatewayResult<Self> {
        let base_url = required_env("DOCGATE_BASE_URL")?;
        let tenant_id = required_env("DOCGATE_TENANT_ID")?;
        let namespace = required_env("DOCGATE_NAMESPACE")?;

        let save_mode = match std::env::var("DOCGATE_SAVE_MODE") {
            Ok(s) if !s.trim().is_empty() => s.parse()?,
            _ => SaveMode::default(),
        };

        let tenant_header = std::env::var("DOCGATE_TENANT_HEADER")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TENANT_HEADER.to_string());

        let connect_timeout_secs: u64 = std::env::var("DOCGATE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            tenant_id,
            namespace,
            tenant_header,
            save_mode,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

fn required_env(name: &str) -> GatewayResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(GatewayError::config(format!("{} cannot be empty", name))),
        Err(_) => Err(GatewayError::config(format!("{} must be set", name))),
    }
}
