//! In-memory queue client that records every call made through the seam.

use async_trait::async_trait;
use sender::SenderResult;
use sender::client::{MessageBatch, QueueClient, QueueConnector, QueueSender};
use sender::credential::CredentialKind;
use sender::errors::SenderError;
use sender::session::{LineConsole, SessionSettings};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Connect(String),
    CreateSender(String),
    CreateBatch,
    Send(Vec<String>),
    DisposeSender,
    DisposeClient,
}

#[derive(Clone, Debug, Default)]
pub struct Behaviour {
    /// Maximum number of messages a batch accepts; `None` means unbounded
    pub batch_capacity: Option<usize>,
    pub fail_connect: bool,
    pub fail_create_sender: bool,
    pub fail_send: bool,
    pub fail_dispose_sender: bool,
}

#[derive(Clone, Default)]
pub struct FakeConnector {
    calls: Arc<Mutex<Vec<Call>>>,
    behaviour: Behaviour,
}

impl FakeConnector {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            calls: Arc::default(),
            behaviour,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn sends(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send(bodies) => Some(bodies),
                _ => None,
            })
            .collect()
    }
}

fn record(calls: &Arc<Mutex<Vec<Call>>>, call: Call) {
    calls.lock().unwrap().push(call);
}

#[async_trait]
impl QueueConnector for FakeConnector {
    type Client = FakeClient;

    async fn connect(
        &self,
        fully_qualified_namespace: &str,
        _credential: &CredentialKind,
    ) -> SenderResult<FakeClient> {
        record(&self.calls, Call::Connect(fully_qualified_namespace.to_string()));
        if self.behaviour.fail_connect {
            return Err(SenderError::ClientCreationFailed {
                namespace: fully_qualified_namespace.to_string(),
                reason: "unauthorized".to_string(),
            });
        }
        Ok(FakeClient {
            calls: self.calls.clone(),
            behaviour: self.behaviour.clone(),
        })
    }
}

pub struct FakeClient {
    calls: Arc<Mutex<Vec<Call>>>,
    behaviour: Behaviour,
}

#[async_trait]
impl QueueClient for FakeClient {
    type Sender = FakeSender;

    async fn create_sender(&mut self, queue_name: &str) -> SenderResult<FakeSender> {
        record(&self.calls, Call::CreateSender(queue_name.to_string()));
        if self.behaviour.fail_create_sender {
            return Err(SenderError::SenderCreationFailed {
                queue: queue_name.to_string(),
                reason: "queue not found".to_string(),
            });
        }
        Ok(FakeSender {
            calls: self.calls.clone(),
            behaviour: self.behaviour.clone(),
        })
    }

    async fn dispose(self) -> SenderResult<()> {
        record(&self.calls, Call::DisposeClient);
        Ok(())
    }
}

pub struct FakeSender {
    calls: Arc<Mutex<Vec<Call>>>,
    behaviour: Behaviour,
}

#[async_trait]
impl QueueSender for FakeSender {
    type Batch = FakeBatch;

    async fn create_batch(&mut self) -> SenderResult<FakeBatch> {
        record(&self.calls, Call::CreateBatch);
        Ok(FakeBatch {
            bodies: Vec::new(),
            capacity: self.behaviour.batch_capacity,
        })
    }

    async fn send_batch(&mut self, batch: FakeBatch) -> SenderResult<()> {
        record(&self.calls, Call::Send(batch.bodies));
        if self.behaviour.fail_send {
            return Err(SenderError::SendFailed("link detached".to_string()));
        }
        Ok(())
    }

    async fn dispose(self) -> SenderResult<()> {
        record(&self.calls, Call::DisposeSender);
        if self.behaviour.fail_dispose_sender {
            return Err(SenderError::DisposeFailed {
                resource: "sender",
                reason: "already closed".to_string(),
            });
        }
        Ok(())
    }
}

pub struct FakeBatch {
    bodies: Vec<String>,
    capacity: Option<usize>,
}

impl MessageBatch for FakeBatch {
    fn try_add(&mut self, body: &str) -> bool {
        if self.capacity.is_some_and(|cap| self.bodies.len() >= cap) {
            return false;
        }
        self.bodies.push(body.to_string());
        true
    }

    fn len(&self) -> usize {
        self.bodies.len()
    }
}

pub fn settings() -> SessionSettings {
    SessionSettings {
        fully_qualified_namespace: "contoso.servicebus.windows.net".to_string(),
        queue_name: "orders".to_string(),
        credential: CredentialKind::DeveloperCli,
    }
}

pub fn console(input: &str) -> LineConsole<Cursor<Vec<u8>>, Vec<u8>> {
    LineConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

pub fn output(console: &LineConsole<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(console.writer().clone()).unwrap()
}
