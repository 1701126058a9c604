use std::{fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, bail, Context};
use hospitals::{OverpassConfig, DEFAULT_OVERPASS_ENDPOINTS};
use hospitals_upstream::{Endpoint, HttpTransportConfig, RetryPolicy, DEFAULT_CACHE_TTL};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_USER_AGENT: &str = "Khalil-Hospitals-App/1.0 (contact@yourmail.com)";
const DEFAULT_REFERER: &str = "http://localhost";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub overpass_endpoints: Vec<String>,
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
    pub rate_limit_per_minute: u32,
    pub user_agent: String,
    pub referer: String,
}

impl Default for Config {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_allow: vec!["*".to_string()],
            overpass_endpoints: DEFAULT_OVERPASS_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_attempts: policy.max_attempts_per_endpoint,
            base_backoff: policy.base_backoff,
            request_timeout: policy.request_timeout,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_sweep_interval: Duration::from_secs(600),
            rate_limit_per_minute: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let listen_addr = match (lookup("HOSPITALS_LISTEN_ADDR"), lookup("PORT")) {
            (Some(addr), _) => addr
                .parse()
                .with_context(|| format!("Invalid HOSPITALS_LISTEN_ADDR: {}", addr))?,
            (None, Some(port)) => {
                let port: u16 = port
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid PORT: {}", port))?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => DEFAULT_LISTEN_ADDR.parse()?,
        };

        let cors_allow = split_list(lookup("HOSPITALS_CORS_ALLOW_ORIGINS"))
            .unwrap_or(defaults.cors_allow);
        let overpass_endpoints = split_list(lookup("HOSPITALS_OVERPASS_ENDPOINTS"))
            .unwrap_or(defaults.overpass_endpoints);
        if overpass_endpoints.is_empty() {
            bail!("HOSPITALS_OVERPASS_ENDPOINTS must list at least one endpoint");
        }

        let max_attempts = parse_or(&lookup, "HOSPITALS_MAX_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            bail!("HOSPITALS_MAX_ATTEMPTS must be at least 1");
        }
        let rate_limit_per_minute = parse_or(
            &lookup,
            "HOSPITALS_RATE_LIMIT_PER_MINUTE",
            defaults.rate_limit_per_minute,
        )?;
        if rate_limit_per_minute == 0 {
            bail!("HOSPITALS_RATE_LIMIT_PER_MINUTE must be at least 1");
        }

        let base_backoff = Duration::from_millis(parse_or(
            &lookup,
            "HOSPITALS_BASE_BACKOFF_MS",
            defaults.base_backoff.as_millis() as u64,
        )?);
        let request_timeout = Duration::from_millis(parse_or(
            &lookup,
            "HOSPITALS_REQUEST_TIMEOUT_MS",
            defaults.request_timeout.as_millis() as u64,
        )?);
        let cache_ttl = Duration::from_secs(parse_or(
            &lookup,
            "HOSPITALS_CACHE_TTL_SECS",
            defaults.cache_ttl.as_secs(),
        )?);
        let cache_sweep_interval = Duration::from_secs(parse_or(
            &lookup,
            "HOSPITALS_CACHE_SWEEP_SECS",
            defaults.cache_sweep_interval.as_secs(),
        )?);
        if cache_sweep_interval.is_zero() {
            bail!("HOSPITALS_CACHE_SWEEP_SECS must be at least 1");
        }

        Ok(Self {
            listen_addr,
            cors_allow,
            overpass_endpoints,
            max_attempts,
            base_backoff,
            request_timeout,
            cache_ttl,
            cache_sweep_interval,
            rate_limit_per_minute,
            user_agent: lookup("HOSPITALS_USER_AGENT").unwrap_or(defaults.user_agent),
            referer: lookup("HOSPITALS_REFERER").unwrap_or(defaults.referer),
        })
    }

    pub fn overpass_config(&self) -> OverpassConfig {
        OverpassConfig {
            endpoints: self.overpass_endpoints.iter().map(Endpoint::new).collect(),
            policy: RetryPolicy::new(self.max_attempts, self.base_backoff, self.request_timeout),
        }
    }

    pub fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            user_agent: self.user_agent.clone(),
            referer: self.referer.clone(),
            ..HttpTransportConfig::default()
        }
    }
}

fn split_list(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|value| {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_original_constants() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.overpass_endpoints.len(), 3);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_backoff, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.cache_ttl, Duration::from_secs(1800));
        assert_eq!(config.rate_limit_per_minute, 30);
    }

    #[test]
    fn port_is_honored_when_listen_addr_is_absent() {
        let config = config_from(&[("PORT", "8081")]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8081".parse::<SocketAddr>().unwrap());

        let config = config_from(&[("PORT", "8081"), ("HOSPITALS_LISTEN_ADDR", "127.0.0.1:9000")])
            .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn overrides_flow_into_overpass_config() {
        let config = config_from(&[
            ("HOSPITALS_OVERPASS_ENDPOINTS", "https://a.example/api, https://b.example/api,"),
            ("HOSPITALS_MAX_ATTEMPTS", "5"),
            ("HOSPITALS_BASE_BACKOFF_MS", "10"),
            ("HOSPITALS_REQUEST_TIMEOUT_MS", "2000"),
        ])
        .unwrap();

        let overpass = config.overpass_config();
        assert_eq!(
            overpass.endpoints,
            vec![
                Endpoint::new("https://a.example/api"),
                Endpoint::new("https://b.example/api"),
            ]
        );
        assert_eq!(
            overpass.policy,
            RetryPolicy::new(5, Duration::from_millis(10), Duration::from_secs(2))
        );
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config_from(&[("HOSPITALS_MAX_ATTEMPTS", "three")]).is_err());
        assert!(config_from(&[("HOSPITALS_MAX_ATTEMPTS", "0")]).is_err());
        assert!(config_from(&[("HOSPITALS_OVERPASS_ENDPOINTS", " , ")]).is_err());
        assert!(config_from(&[("HOSPITALS_LISTEN_ADDR", "nowhere")]).is_err());
        assert!(config_from(&[("HOSPITALS_RATE_LIMIT_PER_MINUTE", "0")]).is_err());
    }
}
