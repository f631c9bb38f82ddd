use super::{MessageBatch, QueueClient, QueueConnector, QueueSender, TransportPreference};
use crate::credential::CredentialKind;
use crate::errors::{SenderError, SenderResult};
use async_trait::async_trait;
use azservicebus::{
    CreateMessageBatchOptions, ServiceBusClient, ServiceBusClientOptions, ServiceBusMessage,
    ServiceBusMessageBatch, ServiceBusSender, ServiceBusSenderOptions, ServiceBusTransportType,
    authorization::ServiceBusTokenCredential, core::BasicRetryPolicy,
};

impl From<TransportPreference> for ServiceBusTransportType {
    fn from(value: TransportPreference) -> Self {
        match value {
            TransportPreference::AmqpTcp => ServiceBusTransportType::AmqpTcp,
            TransportPreference::AmqpWebSockets => ServiceBusTransportType::AmqpWebSocket,
        }
    }
}

/// Builds Azure Service Bus clients authenticated with a token credential.
///
/// The client is safe to keep for the lifetime of the process; this program
/// creates exactly one per run.
#[derive(Clone, Debug, Default)]
pub struct AzureConnector {
    transport: TransportPreference,
}

impl AzureConnector {
    pub fn new(transport: TransportPreference) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> TransportPreference {
        self.transport
    }
}

#[async_trait]
impl QueueConnector for AzureConnector {
    type Client = AzureQueueClient;

    async fn connect(
        &self,
        fully_qualified_namespace: &str,
        credential: &CredentialKind,
    ) -> SenderResult<AzureQueueClient> {
        let token_credential = credential.build()?;

        let options = ServiceBusClientOptions {
            transport_type: self.transport.into(),
            ..Default::default()
        };

        log::debug!(
            "Connecting to {} over {}",
            fully_qualified_namespace,
            self.transport
        );

        let client = ServiceBusClient::new_from_credential(
            fully_qualified_namespace.to_string(),
            ServiceBusTokenCredential::new(token_credential),
            options,
        )
        .await
        .map_err(|e| SenderError::ClientCreationFailed {
            namespace: fully_qualified_namespace.to_string(),
            reason: e.to_string(),
        })?;

        Ok(AzureQueueClient { client })
    }
}

pub struct AzureQueueClient {
    client: ServiceBusClient<BasicRetryPolicy>,
}

#[async_trait]
impl QueueClient for AzureQueueClient {
    type Sender = AzureQueueSender;

    async fn create_sender(&mut self, queue_name: &str) -> SenderResult<AzureQueueSender> {
        let sender = self
            .client
            .create_sender(queue_name, ServiceBusSenderOptions::default())
            .await
            .map_err(|e| SenderError::SenderCreationFailed {
                queue: queue_name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(AzureQueueSender { sender })
    }

    async fn dispose(self) -> SenderResult<()> {
        self.client
            .dispose()
            .await
            .map_err(|e| SenderError::DisposeFailed {
                resource: "client",
                reason: e.to_string(),
            })
    }
}

pub struct AzureQueueSender {
    sender: ServiceBusSender,
}

#[async_trait]
impl QueueSender for AzureQueueSender {
    type Batch = AzureMessageBatch;

    async fn create_batch(&mut self) -> SenderResult<AzureMessageBatch> {
        let batch = self
            .sender
            .create_message_batch(CreateMessageBatchOptions::default())
            .map_err(|e| SenderError::BatchCreationFailed(e.to_string()))?;

        Ok(AzureMessageBatch { batch })
    }

    async fn send_batch(&mut self, batch: AzureMessageBatch) -> SenderResult<()> {
        self.sender
            .send_message_batch(batch.batch)
            .await
            .map_err(|e| SenderError::SendFailed(e.to_string()))
    }

    async fn dispose(self) -> SenderResult<()> {
        self.sender
            .dispose()
            .await
            .map_err(|e| SenderError::DisposeFailed {
                resource: "sender",
                reason: e.to_string(),
            })
    }
}

/// Batch sized by the link's negotiated maximum message size.
pub struct AzureMessageBatch {
    batch: ServiceBusMessageBatch,
}

impl MessageBatch for AzureMessageBatch {
    fn try_add(&mut self, body: &str) -> bool {
        self.batch
            .try_add_message(ServiceBusMessage::new(body.as_bytes().to_vec()))
            .is_ok()
    }

    fn len(&self) -> usize {
        self.batch.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_maps_to_sdk_type() {
        assert!(matches!(
            ServiceBusTransportType::from(TransportPreference::AmqpWebSockets),
            ServiceBusTransportType::AmqpWebSocket
        ));
        assert!(matches!(
            ServiceBusTransportType::from(TransportPreference::AmqpTcp),
            ServiceBusTransportType::AmqpTcp
        ));
    }

    #[test]
    fn test_identity_credential_wraps_as_token_credential() {
        let token_credential = CredentialKind::DeveloperCli.build().unwrap();

        let credential = ServiceBusTokenCredential::new(token_credential);

        assert!(!credential.is_shared_access_credential());
    }

    #[test]
    fn test_connector_uses_web_sockets_by_default() {
        assert_eq!(
            AzureConnector::default().transport(),
            TransportPreference::AmqpWebSockets
        );
    }
}
