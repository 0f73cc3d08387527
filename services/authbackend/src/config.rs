use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";

// Auth backend configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct AuthBackendConfig {
    // HTTP listener for the /auth/* endpoints.
    pub bind_addr: SocketAddr,
    // Prometheus /metrics listener.
    pub metrics_bind: SocketAddr,
    pub metrics_enabled: bool,
    // Policy YAML; the built-in policy is used when unset.
    pub policy_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthBackendConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    metrics_enabled: Option<bool>,
    policy_path: Option<PathBuf>,
}

impl AuthBackendConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("WARREN_AUTH_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse WARREN_AUTH_BIND")?;
        let metrics_bind = std::env::var("WARREN_AUTH_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse WARREN_AUTH_METRICS_BIND")?;
        let metrics_enabled = match std::env::var("WARREN_AUTH_METRICS_ENABLED") {
            Ok(value) => parse_bool(&value).with_context(|| "parse WARREN_AUTH_METRICS_ENABLED")?,
            Err(_) => true,
        };
        let policy_path = std::env::var("WARREN_AUTH_POLICY").ok().map(PathBuf::from);
        Ok(Self {
            bind_addr,
            metrics_bind,
            metrics_enabled,
            policy_path,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("WARREN_AUTH_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read WARREN_AUTH_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: AuthBackendConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse auth backend config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.metrics_enabled {
            self.metrics_enabled = value;
        }
        if let Some(value) = override_cfg.policy_path {
            self.policy_path = Some(value);
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid boolean: {other}"),
    }
}
