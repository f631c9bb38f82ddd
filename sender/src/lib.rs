//! # Queue Sender Library
//!
//! Core library for publishing a batch of text messages to an Azure Service Bus
//! queue. The binary crate wires these pieces together in a fixed order:
//! configuration, credential, client, batch, send.
//!
//! ## Modules
//!
//! - [`config`] - Layered configuration (file, environment, command line)
//! - [`credential`] - Selection between managed identity and Azure CLI credentials
//! - [`client`] - Narrow queue client traits and the Azure Service Bus adapter
//! - [`producer`] - Message body generation and batch filling
//! - [`session`] - The single send run with guaranteed resource release
//! - [`errors`] - Error types shared by all modules
//! - [`constants`] - Setting keys and console strings

pub mod client;
pub mod config;
pub mod constants;
pub mod credential;
pub mod errors;
pub mod producer;
pub mod session;

pub use errors::{ConfigError, SenderError, SenderResult};
