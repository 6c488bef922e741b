//! Shared keep-alive connection pool for talking to hsd.
//!
//! An [`Agent`] wraps one `reqwest::Client` and a socket budget per daemon
//! address. Build it once at startup and clone it wherever requests are made;
//! clones share the same pool. At most [`AgentConfig::max_sockets`] requests
//! are in flight to any one address, and further requests to that address
//! wait for a slot. A saturated daemon never holds up calls to another.

use std::sync::Arc;

use dashmap::DashMap;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT};
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::config::{Address, AgentConfig};
use crate::request::{CallOptions, Request};
use crate::{Error, Result};

/// HTTP transport shared by every call to hsd.
///
/// # Thread Safety
///
/// `Agent` is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct Agent {
    client: reqwest::Client,
    sockets: Arc<DashMap<Address, Arc<Semaphore>>>,
    config: Arc<AgentConfig>,
}

impl Agent {
    /// Create an agent with the default pool settings.
    pub fn new() -> Result<Self> {
        Self::with_config(AgentConfig::default())
    }

    /// Create an agent from a built configuration.
    pub fn with_config(config: AgentConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.max_sockets())
            .pool_idle_timeout(config.pool_idle_timeout())
            .tcp_keepalive(config.tcp_keepalive())
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            sockets: Arc::new(DashMap::new()),
            config: Arc::new(config),
        })
    }

    /// Get a reference to the agent's configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Sockets currently free for new requests to `address`.
    pub fn available_sockets(&self, address: &Address) -> usize {
        self.sockets
            .get(address)
            .map(|sockets| sockets.available_permits())
            .unwrap_or(self.config.max_sockets())
    }

    /// Socket budget for `address`, created on first use.
    fn host_sockets(&self, address: &Address) -> Arc<Semaphore> {
        self.sockets
            .entry(address.clone())
            .or_insert_with(|| Arc::new(Semaphore::new(self.config.max_sockets())))
            .value()
            .clone()
    }

    /// Resolve `options` against `address` using this agent's defaults.
    pub fn request(&self, address: &Address, options: impl Into<CallOptions>) -> Request {
        Request::build(address, options, &self.config)
    }

    /// Make one call to the API at `address`.
    ///
    /// Returns the parsed body for a 2xx status and [`Error::Api`] with the
    /// parsed body otherwise. Transport failures are returned as-is.
    pub async fn call(&self, address: &Address, options: impl Into<CallOptions>) -> Result<Value> {
        self.execute(self.request(address, options)).await
    }

    /// Send a resolved request.
    ///
    /// The request's timeout covers waiting for a free socket as well as
    /// the exchange itself.
    pub async fn execute(&self, request: Request) -> Result<Value> {
        let timeout = request.timeout;
        match tokio::time::timeout(timeout, self.dispatch(request)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(timeout)),
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Value> {
        let _permit = self
            .host_sockets(&request.address)
            .acquire_owned()
            .await
            .map_err(|_| Error::io(std::io::Error::other("connection pool closed")))?;

        tracing::trace!(method = %request.method, url = %request.url, "hsd request");

        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidConfig(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidConfig(format!("invalid header value {value:?}: {e}")))?;
            builder = builder.header(name, value);
        }
        if request.json {
            builder = builder.header(ACCEPT, "application/json");
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = parse_body(&text);

        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Parse a response body as JSON, falling back to a JSON string for
/// non-JSON payloads and `null` for empty ones.
pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
