use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::cli::Args;

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8000;
const DEFAULT_MAX_BODY_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub cors_allow_origins: CorsOrigins,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            cors_allow_origins: CorsOrigins::Any,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES as usize,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let http_host = env_string("HYDRO_HTTP_HOST", Some(DEFAULT_HTTP_HOST.to_string()))?;
        let http_port = env_u16("HYDRO_HTTP_PORT", Some(DEFAULT_HTTP_PORT))?;
        let cors_allow_origins = parse_cors_origins(
            env_optional("HYDRO_CORS_ALLOW_ORIGINS")
                .as_deref()
                .unwrap_or("*"),
        );
        let max_body_bytes = env_u64("HYDRO_MAX_BODY_BYTES", Some(DEFAULT_MAX_BODY_BYTES))?;
        let max_body_bytes =
            usize::try_from(max_body_bytes).context("HYDRO_MAX_BODY_BYTES too large")?;

        Ok(Self {
            http_host,
            http_port,
            cors_allow_origins,
            max_body_bytes,
        })
    }

    /// CLI flags win over the environment.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host.as_deref() {
            self.http_host = host.trim().to_string();
        }
        if let Some(port) = args.port {
            self.http_port = port;
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// `*` (or an empty list) allows any origin; otherwise a comma-separated origin list.
pub fn parse_cors_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect();
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return CorsOrigins::Any;
    }
    CorsOrigins::List(origins)
}

fn env_string(key: &str, default: Option<String>) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value.trim().to_string()),
        Err(_) => default.ok_or_else(|| anyhow!("missing env var {key}")),
    }
}

fn env_u64(key: &str, default: Option<u64>) -> Result<u64> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid {key}")),
        Err(_) => default.ok_or_else(|| anyhow!("missing env var {key}")),
    }
}

fn env_u16(key: &str, default: Option<u16>) -> Result<u16> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .with_context(|| format!("invalid {key}")),
        Err(_) => default.ok_or_else(|| anyhow!("missing env var {key}")),
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_and_blank_allow_any_origin() {
        assert_eq!(parse_cors_origins("*"), CorsOrigins::Any);
        assert_eq!(parse_cors_origins(""), CorsOrigins::Any);
        assert_eq!(parse_cors_origins(" , "), CorsOrigins::Any);
        assert_eq!(
            parse_cors_origins("http://localhost:3000,*"),
            CorsOrigins::Any
        );
    }

    #[test]
    fn origin_list_is_trimmed() {
        assert_eq!(
            parse_cors_origins(" http://localhost:3000/ ,https://grow.example.com"),
            CorsOrigins::List(vec![
                "http://localhost:3000".to_string(),
                "https://grow.example.com".to_string(),
            ])
        );
    }

    #[test]
    fn cli_args_override_host_and_port() {
        let mut config = Config::default();
        config.apply_args(&Args {
            host: Some(" 0.0.0.0 ".to_string()),
            port: Some(9090),
            print_openapi: false,
        });
        assert_eq!(config.bind_addr(), "0.0.0.0:9090");

        let mut untouched = Config::default();
        untouched.apply_args(&Args {
            host: None,
            port: None,
            print_openapi: false,
        });
        assert_eq!(untouched.bind_addr(), "127.0.0.1:8000");
    }
}
