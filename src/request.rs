//! Request descriptors for the hsd HTTP API.
//!
//! [`CallOptions`] is what callers describe (a path, plus optional method,
//! query, body and timeout). [`make_request`] turns it into a fully resolved
//! [`Request`] bound to one daemon address. The options value is consumed
//! and a new descriptor returned, so nothing is shared between calls.
//!
//! # Example
//!
//! ```ignore
//! use libhyperspace::request::{make_request, CallOptions};
//!
//! let request = make_request(&"localhost:5580".into(), "/gateway");
//! assert_eq!(request.url, "http://localhost:5580/gateway");
//!
//! let request = make_request(
//!     &"localhost:5580".into(),
//!     CallOptions::post("/renter").query("funds", "1000"),
//! );
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::config::{Address, AgentConfig, DEFAULT_TIMEOUT as CONFIG_DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// Name of the identifying header sent with every request.
pub const USER_AGENT_HEADER: &str = "User-Agent";

/// Value of the `User-Agent` header unless the agent overrides it.
pub const USER_AGENT: &str = DEFAULT_USER_AGENT;

/// Timeout applied when neither the call nor the agent sets one.
pub const DEFAULT_TIMEOUT: Duration = CONFIG_DEFAULT_TIMEOUT;

/// Caller-side description of one API call.
///
/// A bare path converts into a `GET` with default timeout:
///
/// ```ignore
/// let opts: CallOptions = "/wallet".into();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CallOptions {
    /// Path on the daemon, e.g. `/gateway`.
    pub url: String,
    pub method: Method,
    /// Falls back to the agent's default timeout when unset.
    pub timeout: Option<Duration>,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// JSON request body.
    pub body: Option<Value>,
}

impl CallOptions {
    /// A `GET` request for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            timeout: None,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::POST)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::PUT)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::DELETE)
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the timeout for this call only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl From<&str> for CallOptions {
    fn from(url: &str) -> Self {
        CallOptions::new(url)
    }
}

impl From<String> for CallOptions {
    fn from(url: String) -> Self {
        CallOptions::new(url)
    }
}

impl From<&CallOptions> for CallOptions {
    fn from(opts: &CallOptions) -> Self {
        opts.clone()
    }
}

/// A fully resolved request, ready for the [`Agent`](crate::Agent).
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Daemon the request is sent to; sockets are budgeted per address.
    pub address: Address,
    pub method: Method,
    /// Absolute URL: `http://<address><path>`.
    pub url: String,
    /// Bodies are sent and parsed as JSON. Always `true`.
    pub json: bool,
    pub timeout: Duration,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    /// Resolve `options` against `address` using the agent's defaults.
    pub fn build(address: &Address, options: impl Into<CallOptions>, config: &AgentConfig) -> Self {
        resolve(
            address,
            options.into(),
            config.default_timeout(),
            config.user_agent(),
        )
    }

    /// The `User-Agent` value this request carries.
    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(USER_AGENT_HEADER).map(String::as_str)
    }
}

/// Resolve `options` against `address` with the stock timeout and user agent.
///
/// The path is appended verbatim; neither it nor the address is validated.
pub fn make_request(address: &Address, options: impl Into<CallOptions>) -> Request {
    resolve(address, options.into(), DEFAULT_TIMEOUT, USER_AGENT)
}

fn resolve(
    address: &Address,
    options: CallOptions,
    default_timeout: Duration,
    user_agent: &str,
) -> Request {
    let mut headers = BTreeMap::new();
    headers.insert(USER_AGENT_HEADER.to_string(), user_agent.to_string());

    Request {
        address: address.clone(),
        method: options.method,
        url: address.url(&options.url),
        json: true,
        timeout: options.timeout.unwrap_or(default_timeout),
        headers,
        query: options.query,
        body: options.body,
    }
}
