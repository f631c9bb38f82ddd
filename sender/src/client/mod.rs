//! Queue client seam.
//!
//! The send run only needs a handful of capabilities from the messaging SDK:
//! connect, open a sender, build a bounded batch, append to it, send it, and
//! release everything afterwards. They are expressed as the traits below so
//! the run can be driven by the Azure adapter in [`azure`] or by an in-memory
//! fake in tests.

pub mod azure;

use crate::credential::CredentialKind;
use crate::errors::SenderResult;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use azure::{AzureConnector, AzureMessageBatch, AzureQueueClient, AzureQueueSender};

/// AMQP channel used to reach the namespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportPreference {
    /// Plain AMQP over TCP, ports 5671/5672
    AmqpTcp,
    /// AMQP tunnelled over WebSockets on port 443
    #[default]
    AmqpWebSockets,
}

impl fmt::Display for TransportPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportPreference::AmqpTcp => f.write_str("amqp-tcp"),
            TransportPreference::AmqpWebSockets => f.write_str("amqp-web-sockets"),
        }
    }
}

impl FromStr for TransportPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amqp-tcp" | "amqptcp" | "tcp" => Ok(TransportPreference::AmqpTcp),
            "amqp-web-sockets" | "amqpwebsockets" | "websockets" => {
                Ok(TransportPreference::AmqpWebSockets)
            }
            other => Err(format!("Unknown transport type: {other}")),
        }
    }
}

/// Creates clients bound to one fully-qualified namespace.
#[async_trait]
pub trait QueueConnector: Send + Sync {
    type Client: QueueClient;

    async fn connect(
        &self,
        fully_qualified_namespace: &str,
        credential: &CredentialKind,
    ) -> SenderResult<Self::Client>;
}

/// A connection to the namespace. Must be disposed exactly once.
#[async_trait]
pub trait QueueClient: Send {
    type Sender: QueueSender;

    async fn create_sender(&mut self, queue_name: &str) -> SenderResult<Self::Sender>;

    async fn dispose(self) -> SenderResult<()>;
}

/// A sender bound to one queue. Must be disposed before its client.
#[async_trait]
pub trait QueueSender: Send {
    type Batch: MessageBatch;

    async fn create_batch(&mut self) -> SenderResult<Self::Batch>;

    /// Sends every message of the batch in a single operation.
    async fn send_batch(&mut self, batch: Self::Batch) -> SenderResult<()>;

    async fn dispose(self) -> SenderResult<()>;
}

/// Size-bounded, ordered collection of messages.
pub trait MessageBatch: Send {
    /// Appends a text body. Returns `false` if it does not fit.
    fn try_add(&mut self, body: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_defaults_to_web_sockets() {
        assert_eq!(
            TransportPreference::default(),
            TransportPreference::AmqpWebSockets
        );
    }

    #[test]
    fn test_transport_parsing() {
        assert_eq!(
            "amqp-tcp".parse::<TransportPreference>(),
            Ok(TransportPreference::AmqpTcp)
        );
        assert_eq!(
            "AmqpWebSockets".parse::<TransportPreference>(),
            Ok(TransportPreference::AmqpWebSockets)
        );
        assert!("carrier-pigeon".parse::<TransportPreference>().is_err());
    }

    #[test]
    fn test_transport_display_round_trips_through_parse() {
        for transport in [
            TransportPreference::AmqpTcp,
            TransportPreference::AmqpWebSockets,
        ] {
            assert_eq!(transport.to_string().parse(), Ok(transport));
        }
    }
}
