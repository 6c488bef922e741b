//! High-level hsd client for probing and connecting to daemons.
//!
//! This module provides [`HsdClient`], the main entry point for talking to
//! one or more running hsd instances.
//!
//! # Example
//!
//! ```ignore
//! use libhyperspace::{HsdClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HsdClient::new()?;
//!
//!     if client.is_running("localhost:5580").await {
//!         let hsd = client.connect("localhost:5580").await?;
//!         println!("{}", hsd.call("/daemon/version").await?);
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use serde_json::Value;

use crate::agent::Agent;
use crate::config::{Address, AgentConfig, AgentConfigBuilder, DEFAULT_LIVENESS_TIMEOUT};
use crate::request::CallOptions;
use crate::session::Session;
use crate::{Error, Result};

/// Path hit by the liveness probe.
pub const LIVENESS_PATH: &str = "/gateway";

/// How long the liveness probe waits unless the agent overrides it.
pub const LIVENESS_TIMEOUT: Duration = DEFAULT_LIVENESS_TIMEOUT;

/// Outcome of [`HsdClient::try_connect`].
#[derive(Debug, Clone)]
pub enum Connection {
    /// The daemon answered; the session is ready for calls.
    Connected(Session),
    /// The daemon did not answer the liveness probe.
    Unreachable,
}

impl Connection {
    pub fn is_connected(&self) -> bool {
        matches!(self, Connection::Connected(_))
    }

    /// Convert into a result, mapping `Unreachable` to [`Error::CouldNotConnect`].
    pub fn into_result(self) -> Result<Session> {
        match self {
            Connection::Connected(session) => Ok(session),
            Connection::Unreachable => Err(Error::CouldNotConnect),
        }
    }
}

/// A client for hsd daemons.
///
/// `HsdClient` owns the shared [`Agent`]. It does not know about a specific
/// daemon until asked; every method takes the target address.
///
/// # Thread Safety
///
/// `HsdClient` is `Send + Sync` and cheap to clone. Clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct HsdClient {
    agent: Agent,
}

impl HsdClient {
    /// Create a client with the default pool (20 sockets, keep-alive).
    pub fn new() -> Result<Self> {
        Ok(Self::with_agent(Agent::new()?))
    }

    /// Create a client around an existing agent.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }

    /// Create a builder for configuring a new client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the shared agent.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Call the API at `address`.
    pub async fn call(
        &self,
        address: impl Into<Address>,
        options: impl Into<CallOptions>,
    ) -> Result<Value> {
        self.agent.call(&address.into(), options).await
    }

    /// Whether a daemon at `address` answers `GET /gateway`.
    ///
    /// This only checks that the API is reachable, not that a particular
    /// process is alive. Any failure, including a non-2xx status, yields
    /// `false`.
    pub async fn is_running(&self, address: impl Into<Address>) -> bool {
        probe(&self.agent, &address.into()).await
    }

    /// Probe `address` and return a session if it answers.
    pub async fn try_connect(&self, address: impl Into<Address>) -> Connection {
        let address = address.into();
        if probe(&self.agent, &address).await {
            Connection::Connected(Session::new(self.agent.clone(), address))
        } else {
            Connection::Unreachable
        }
    }

    /// Connect to a running daemon.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CouldNotConnect`] if the daemon does not answer.
    pub async fn connect(&self, address: impl Into<Address>) -> Result<Session> {
        self.try_connect(address).await.into_result()
    }
}

/// Liveness probe shared by [`HsdClient`] and [`Session`].
pub(crate) async fn probe(agent: &Agent, address: &Address) -> bool {
    let options = CallOptions::get(LIVENESS_PATH).timeout(agent.config().liveness_timeout());
    match agent.call(address, options).await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(%address, error = %e, "hsd liveness probe failed");
            false
        }
    }
}

/// Builder for [`HsdClient`].
///
/// This wraps [`AgentConfigBuilder`] and builds directly into an [`HsdClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    inner: AgentConfigBuilder,
}

impl ClientBuilder {
    /// Create a client builder with default settings.
    pub fn new() -> Self {
        Self {
            inner: AgentConfigBuilder::default(),
        }
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the pool settings are invalid.
    pub fn build(self) -> Result<HsdClient> {
        let config: AgentConfig = self.inner.build()?;
        Ok(HsdClient::with_agent(Agent::with_config(config)?))
    }

    /// Cap on concurrent sockets.
    pub fn max_sockets(mut self, max: usize) -> Self {
        self.inner = self.inner.max_sockets(max);
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.inner = self.inner.user_agent(agent);
        self
    }

    /// Timeout for calls that do not set one.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.default_timeout(timeout);
        self
    }

    /// Timeout of the liveness probe.
    pub fn liveness_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.liveness_timeout(timeout);
        self
    }

    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.pool_idle_timeout(timeout);
        self
    }

    pub fn tcp_keepalive(mut self, interval: Duration) -> Self {
        self.inner = self.inner.tcp_keepalive(interval);
        self
    }
}
