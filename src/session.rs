//! Sessions bound to one running daemon.
//!
//! A [`Session`] is what [`HsdClient::connect`](crate::HsdClient::connect)
//! returns once the daemon has answered the liveness probe. It remembers the
//! address and the shared agent, and nothing else: it does not own or watch
//! the daemon process.
//!
//! # Example
//!
//! ```ignore
//! use libhyperspace::{CallOptions, HsdClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HsdClient::new()?;
//!     let hsd = client.connect("localhost:5580").await?;
//!
//!     let consensus = hsd.call("/consensus").await?;
//!     println!("height: {}", consensus["height"]);
//!
//!     hsd.call(CallOptions::post("/gateway/connect/1.2.3.4:5581")).await?;
//!     Ok(())
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::agent::Agent;
use crate::client::probe;
use crate::config::Address;
use crate::request::CallOptions;
use crate::{Error, Result};

/// Handle to the API of one hsd instance.
///
/// Immutable for its lifetime; clones share the agent's connection pool.
#[derive(Debug, Clone)]
pub struct Session {
    address: Address,
    agent: Agent,
}

impl Session {
    pub(crate) fn new(agent: Agent, address: Address) -> Self {
        Self { address, agent }
    }

    /// The address this session talks to.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Call the daemon API.
    ///
    /// See [`Agent::call`] for how responses map to results.
    pub async fn call(&self, options: impl Into<CallOptions>) -> Result<Value> {
        self.agent.call(&self.address, options).await
    }

    /// Call the daemon API and deserialize the response body.
    ///
    /// A body of the wrong shape yields [`Error::JsonParse`] quoting the body.
    pub async fn call_as<T: DeserializeOwned>(&self, options: impl Into<CallOptions>) -> Result<T> {
        let body = self.call(options).await?;
        T::deserialize(&body).map_err(|e| Error::json_parse(e, &body.to_string()))
    }

    /// Whether the daemon still answers `/gateway`.
    pub async fn is_running(&self) -> bool {
        probe(&self.agent, &self.address).await
    }
}
