//! # lvlup-core
//!
//! Core types and utilities for the lvlup.pro API.
//!
//! This crate provides the error type, configuration, argument validators and
//! response envelope used by the `lvlup-api` client.
//!
//! ## Modules
//!
//! - [`error`] - Error type and status hint handling
//! - [`config`] - Environment selection and client configuration
//! - [`client`] - HTTP client tuning
//! - [`envelope`] - Status envelope and success payload wrapper
//! - [`validation`] - Scalar argument validators
//! - [`types`] - Port ranges, protocols and uptime
//! - [`query`] - Pagination parameter

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod query;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::{Environment, LvlupConfig};
pub use envelope::{ApiResponse, Envelope};
pub use error::{Error, Result};
pub use query::Pagination;
pub use types::{PortRange, Protocol, UpTime};
