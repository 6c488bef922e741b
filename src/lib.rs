//! # libhyperspace
//!
//! Async Rust wrapper for the Hyperspace daemon (hsd).
//!
//! This library provides:
//! - Launching hsd with typed settings and a shared output log
//! - Calls to the hsd HTTP API over a bounded keep-alive pool
//! - Liveness probing and connecting to a running daemon
//! - Exact SpaceCash / hastings unit conversion
//!
//! ## Quick Start
//!
//! ```ignore
//! use libhyperspace::{HsdClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HsdClient::new()?;
//!     let hsd = client.connect("localhost:5580").await?;
//!     println!("{}", hsd.call("/consensus").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Launching
//!
//! ```ignore
//! use libhyperspace::{launch_with, HsdClient, Settings};
//!
//! let settings = Settings::new().with("hyperspace-directory", "/var/lib/hsd");
//! let mut hsd = launch_with("/usr/local/bin/hsd", settings)?;
//!
//! // The API comes up some time after the process starts.
//! let client = HsdClient::new()?;
//! while !client.is_running("localhost:5580").await {
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//! }
//! ```
//!
//! ## Units
//!
//! ```ignore
//! use libhyperspace::units;
//!
//! let hastings = units::space_cash_to_hastings("2.5")?;
//! assert_eq!(hastings, "2500000000000000000000000");
//! ```

pub mod agent;
mod client;
pub mod config;
mod error;
pub mod process;
pub mod request;
mod session;
pub mod units;

pub use error::{Error, Result};

// Re-export the main client types at crate root
pub use agent::Agent;
pub use client::{ClientBuilder, Connection, HsdClient, LIVENESS_PATH, LIVENESS_TIMEOUT};
pub use session::Session;

// Re-export commonly used config types at crate root
pub use config::{Address, AgentConfig, AgentConfigBuilder, SettingValue, Settings};

// Re-export request types at crate root
pub use request::{make_request, CallOptions, Request};

// Re-export commonly used process types at crate root
pub use process::{launch, launch_with, HsdProcess};

// Re-export unit conversions at crate root
pub use units::{hastings_to_space_cash, space_cash_to_hastings, to_base_units, to_decimal_units};
