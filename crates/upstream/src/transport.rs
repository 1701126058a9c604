//! Transport abstraction for delivering a query to one endpoint.
//!
//! The orchestrator only sees [`UpstreamTransport`]; the production
//! implementation is [`HttpTransport`], which POSTs the query as
//! `text/plain` with a fixed set of identifying headers.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::Client;

use crate::errors::{AttemptError, TransportSetupError};
use crate::models::{Endpoint, UpstreamResponse};

/// Delivers a single attempt to a single endpoint.
///
/// Implementations must not retry on their own and must not classify
/// outcomes; they report what happened and the orchestrator decides.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use hospitals_upstream::{AttemptError, Endpoint, UpstreamResponse, UpstreamTransport};
///
/// struct AlwaysOk;
///
/// #[async_trait]
/// impl UpstreamTransport for AlwaysOk {
///     async fn send(
///         &self,
///         _endpoint: &Endpoint,
///         _query: &str,
///         _timeout: std::time::Duration,
///     ) -> Result<UpstreamResponse, AttemptError> {
///         Ok(UpstreamResponse::new(200, "{}"))
///     }
/// }
/// ```
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Send `query` to `endpoint`.
    ///
    /// `timeout` is the per-attempt deadline. The orchestrator enforces it
    /// independently, so honoring it here is an optimization, not a requirement.
    async fn send(
        &self,
        endpoint: &Endpoint,
        query: &str,
        timeout: Duration,
    ) -> Result<UpstreamResponse, AttemptError>;
}

/// Fixed headers sent with every outbound request.
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub referer: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("hospitals-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_language: "en".to_string(),
            referer: "http://localhost".to_string(),
        }
    }
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpTransportConfig) -> Result<Self, TransportSetupError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("Accept-Language", &config.accept_language)?,
        );
        headers.insert(REFERER, header_value("Referer", &config.referer)?);

        let client = Client::builder()
            .user_agent(header_value("User-Agent", &config.user_agent)?)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, TransportSetupError> {
    HeaderValue::from_str(value).map_err(|_| TransportSetupError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}

fn map_reqwest_error(error: reqwest::Error, timeout: Duration) -> AttemptError {
    if error.is_timeout() {
        AttemptError::Timeout(timeout)
    } else {
        AttemptError::Transport(error.to_string())
    }
}

#[async_trait]
impl UpstreamTransport for HttpTransport {
    async fn send(
        &self,
        endpoint: &Endpoint,
        query: &str,
        timeout: Duration,
    ) -> Result<UpstreamResponse, AttemptError> {
        debug!("POST {} ({} bytes)", endpoint, query.len());

        let response = self
            .client
            .post(endpoint.as_str())
            .header(CONTENT_TYPE, "text/plain")
            .timeout(timeout)
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, timeout))?;

        Ok(UpstreamResponse { status, body })
    }
}
