//! HTTP agent configuration and builder.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use libhyperspace::config::AgentConfig;
//!
//! let config = AgentConfig::builder()
//!     .max_sockets(8)
//!     .default_timeout(Duration::from_secs(30))
//!     .build()?;
//! ```

use std::time::Duration;

use reqwest::header::HeaderValue;

use crate::{Error, Result};

/// Sockets the shared pool may hold open to any one daemon at once.
pub const DEFAULT_MAX_SOCKETS: usize = 20;

/// `User-Agent` header hsd expects on every API request.
pub const DEFAULT_USER_AGENT: &str = "Hyperspace-Agent";

/// Timeout applied to calls that do not set their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout of the `/gateway` liveness probe.
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(600);

const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_TCP_KEEPALIVE: Duration = Duration::from_secs(60);

/// Configuration for the shared HTTP [`Agent`](crate::Agent).
///
/// Use [`AgentConfig::builder()`] to create a new configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub(crate) max_sockets: usize,
    pub(crate) user_agent: String,
    pub(crate) default_timeout: Duration,
    pub(crate) liveness_timeout: Duration,
    pub(crate) pool_idle_timeout: Duration,
    pub(crate) tcp_keepalive: Duration,
}

impl AgentConfig {
    /// Create a new builder for AgentConfig.
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Maximum concurrent sockets.
    pub fn max_sockets(&self) -> usize {
        self.max_sockets
    }

    /// Value of the `User-Agent` header.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Timeout for calls without an explicit one.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Timeout of the liveness probe.
    pub fn liveness_timeout(&self) -> Duration {
        self.liveness_timeout
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        self.pool_idle_timeout
    }

    pub fn tcp_keepalive(&self) -> Duration {
        self.tcp_keepalive
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfigBuilder::default().into_config()
    }
}

/// Builder for [`AgentConfig`].
///
/// Values are validated when [`build()`](AgentConfigBuilder::build) is called.
#[derive(Debug, Clone)]
pub struct AgentConfigBuilder {
    max_sockets: usize,
    user_agent: String,
    default_timeout: Duration,
    liveness_timeout: Duration,
    pool_idle_timeout: Duration,
    tcp_keepalive: Duration,
}

impl Default for AgentConfigBuilder {
    fn default() -> Self {
        Self {
            max_sockets: DEFAULT_MAX_SOCKETS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_timeout: DEFAULT_TIMEOUT,
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
            pool_idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
            tcp_keepalive: DEFAULT_TCP_KEEPALIVE,
        }
    }
}

impl AgentConfigBuilder {
    // -------------------------------------------------------------------------
    // Pool
    // -------------------------------------------------------------------------

    /// Cap on sockets in use at once. Further requests wait for a free slot.
    pub fn max_sockets(mut self, max: usize) -> Self {
        self.max_sockets = max;
        self
    }

    /// How long an idle keep-alive socket stays in the pool.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// TCP keep-alive interval for pooled sockets.
    pub fn tcp_keepalive(mut self, interval: Duration) -> Self {
        self.tcp_keepalive = interval;
        self
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Timeout for calls that do not set one.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Timeout of the liveness probe.
    pub fn liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = timeout;
        self
    }

    // -------------------------------------------------------------------------
    // Build
    // -------------------------------------------------------------------------

    /// Build the configuration.
    ///
    /// This validates:
    /// - At least one socket is allowed
    /// - Timeouts are non-zero
    /// - The user agent is not empty
    pub fn build(self) -> Result<AgentConfig> {
        if self.max_sockets == 0 {
            return Err(Error::InvalidConfig(
                "max_sockets must be at least 1".into(),
            ));
        }

        if self.default_timeout.is_zero() || self.liveness_timeout.is_zero() {
            return Err(Error::InvalidConfig("timeouts must be non-zero".into()));
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::InvalidConfig("user_agent must not be empty".into()));
        }

        if let Err(e) = HeaderValue::from_str(&self.user_agent) {
            return Err(Error::InvalidConfig(format!(
                "user_agent is not a valid header value: {e}"
            )));
        }

        Ok(self.into_config())
    }

    fn into_config(self) -> AgentConfig {
        AgentConfig {
            max_sockets: self.max_sockets,
            user_agent: self.user_agent,
            default_timeout: self.default_timeout,
            liveness_timeout: self.liveness_timeout,
            pool_idle_timeout: self.pool_idle_timeout,
            tcp_keepalive: self.tcp_keepalive,
        }
    }
}
