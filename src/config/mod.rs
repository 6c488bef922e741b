//! Configuration for the HTTP agent and the hsd launcher.
//!
//! This module provides:
//!
//! - [`AgentConfig`] and [`AgentConfigBuilder`] for tuning the shared connection pool
//! - [`Settings`] and [`SettingValue`] for the flags hsd is launched with
//! - [`Address`] for the `host:port` of a running daemon
//!
//! # Example
//!
//! ```ignore
//! use libhyperspace::config::{Settings, SettingValue};
//!
//! let settings = Settings::new()
//!     .with("hyperspace-directory", "/var/lib/hsd")
//!     .with("authenticate-api", true);
//! ```

pub mod builder;
pub mod options;

pub use builder::{
    AgentConfig, AgentConfigBuilder, DEFAULT_LIVENESS_TIMEOUT, DEFAULT_MAX_SOCKETS,
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use options::{Address, SettingValue, Settings, DEFAULT_API_ADDR};
