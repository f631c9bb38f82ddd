//! The single send run.
//!
//! A run walks a fixed sequence of states and never revisits one:
//!
//! ```text
//! Start -> Configuring -> Authenticating -> ClientReady
//!       -> CollectingInput -> Sending -> Done | Failed
//! ```
//!
//! Once the client exists, the sender and then the client are released on
//! every exit path: invalid input, an oversized message, a failed send, or
//! success. When both the run and a release fail, the run's error is kept.

use crate::client::{QueueClient, QueueConnector, QueueSender};
use crate::config::AppConfig;
use crate::constants::{COUNT_PROMPT, EXIT_PROMPT, INVALID_COUNT_MESSAGE};
use crate::credential::CredentialKind;
use crate::errors::{SenderError, SenderResult};
use crate::producer::{BatchTimestamp, fill_batch, parse_message_count};
use std::fmt;
use std::io::{self, BufRead, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Start,
    Configuring,
    Authenticating,
    ClientReady,
    CollectingInput,
    Sending,
    Done,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a run that did not fail ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The batch was sent with this many messages
    Sent(usize),
    /// The count was not a number; nothing was built or sent
    InvalidInput,
}

/// Everything a run needs, resolved once from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub fully_qualified_namespace: String,
    pub queue_name: String,
    pub credential: CredentialKind,
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fully_qualified_namespace: config.fully_qualified_namespace(),
            queue_name: config.queue_name().to_string(),
            credential: CredentialKind::resolve(
                config.runs_in_azure(),
                config.user_assigned_client_id(),
            ),
        }
    }
}

/// Line-oriented user interaction.
pub trait Console {
    /// Writes `text` without a newline and flushes.
    fn prompt(&mut self, text: &str) -> io::Result<()>;

    /// Reads one line. End of input yields an empty string.
    fn read_line(&mut self) -> io::Result<String>;

    fn print_line(&mut self, text: &str) -> io::Result<()>;
}

/// [`Console`] over any buffered reader and writer.
pub struct LineConsole<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.writer, "{text}")?;
        self.writer.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line)
    }

    fn print_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")?;
        self.writer.flush()
    }
}

/// Prints the exit prompt and blocks until a line (or end of input) arrives.
pub fn wait_for_exit<K: Console + ?Sized>(console: &mut K) -> io::Result<()> {
    console.print_line(EXIT_PROMPT)?;
    console.read_line().map(|_| ())
}

pub struct SendSession<'a, C> {
    connector: &'a C,
    settings: SessionSettings,
    timestamp: Option<BatchTimestamp>,
    state: SessionState,
}

impl<'a, C: QueueConnector> SendSession<'a, C> {
    pub fn new(connector: &'a C, settings: SessionSettings) -> Self {
        Self {
            connector,
            settings,
            timestamp: None,
            state: SessionState::Start,
        }
    }

    /// Uses a fixed timestamp instead of the local time at fill time.
    pub fn with_timestamp(mut self, timestamp: BatchTimestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the session to completion. A second call fails without
    /// connecting again.
    pub async fn run<K: Console + ?Sized>(
        &mut self,
        console: &mut K,
    ) -> SenderResult<SessionOutcome> {
        if self.state != SessionState::Start {
            return Err(SenderError::SessionAlreadyRan {
                state: self.state.to_string(),
            });
        }
        self.transition(SessionState::Configuring);

        let result = self.connect_and_send(console).await;
        match &result {
            Ok(_) => self.transition(SessionState::Done),
            Err(e) => {
                log::error!("Send session failed in state {}: {e}", self.state);
                self.transition(SessionState::Failed);
            }
        }
        result
    }

    async fn connect_and_send<K: Console + ?Sized>(
        &mut self,
        console: &mut K,
    ) -> SenderResult<SessionOutcome> {
        self.transition(SessionState::Authenticating);
        log::info!("Getting Azure credential ({})...", self.settings.credential);
        log::info!("Creating Service Bus client and sender...");

        let mut client = self
            .connector
            .connect(
                &self.settings.fully_qualified_namespace,
                &self.settings.credential,
            )
            .await?;

        let mut sender = match client.create_sender(&self.settings.queue_name).await {
            Ok(sender) => sender,
            Err(e) => {
                release::<C::Client>(None, client).await.ok();
                return Err(e);
            }
        };

        self.transition(SessionState::ClientReady);
        log::info!(
            "Service Bus client for namespace: {} and sender to queue: {} created.",
            self.settings.fully_qualified_namespace,
            self.settings.queue_name
        );

        let outcome = self.collect_and_send(&mut sender, console).await;
        let released = release::<C::Client>(Some(sender), client).await;

        let outcome = outcome?;
        released?;
        Ok(outcome)
    }

    async fn collect_and_send<S: QueueSender, K: Console + ?Sized>(
        &mut self,
        sender: &mut S,
        console: &mut K,
    ) -> SenderResult<SessionOutcome> {
        self.transition(SessionState::CollectingInput);

        console.prompt(COUNT_PROMPT)?;
        let line = console.read_line()?;
        let count = match parse_message_count(&line) {
            Ok(count) => count,
            Err(e) => {
                log::warn!("{e}");
                console.print_line(INVALID_COUNT_MESSAGE)?;
                return Ok(SessionOutcome::InvalidInput);
            }
        };

        let timestamp = self.timestamp.clone().unwrap_or_else(BatchTimestamp::now);
        let mut batch = sender.create_batch().await?;
        let appended = fill_batch(&mut batch, &timestamp, count)?;

        self.transition(SessionState::Sending);
        sender.send_batch(batch).await?;

        let confirmation =
            format!("A batch of {appended} messages has been published to the queue.");
        log::info!("{confirmation}");
        console.print_line(&confirmation)?;

        Ok(SessionOutcome::Sent(appended))
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(next > self.state, "{} -> {} goes backwards", self.state, next);
        log::debug!("Send session: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Disposes the sender (if any) and then the client, both unconditionally.
async fn release<Cl: QueueClient>(sender: Option<Cl::Sender>, client: Cl) -> SenderResult<()> {
    let sender_result = match sender {
        Some(sender) => sender.dispose().await,
        None => Ok(()),
    };
    if let Err(e) = &sender_result {
        log::warn!("Failed to dispose sender: {e}");
    }

    let client_result = client.dispose().await;
    if let Err(e) = &client_result {
        log::warn!("Failed to dispose client: {e}");
    }

    log::debug!("Service Bus sender and client released");
    sender_result.and(client_result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_line_console_prompt_has_no_newline() {
        let mut console = LineConsole::new(Cursor::new(b"7\n".to_vec()), Vec::new());
        console.prompt(COUNT_PROMPT).unwrap();
        assert_eq!(console.read_line().unwrap(), "7\n");
        assert_eq!(console.writer().as_slice(), COUNT_PROMPT.as_bytes());
    }

    #[test]
    fn test_line_console_end_of_input_is_empty() {
        let mut console = LineConsole::new(Cursor::new(Vec::new()), Vec::new());
        assert_eq!(console.read_line().unwrap(), "");
    }

    #[test]
    fn test_wait_for_exit_prints_prompt() {
        let mut console = LineConsole::new(Cursor::new(b"\n".to_vec()), Vec::new());
        wait_for_exit(&mut console).unwrap();
        let output = String::from_utf8(console.writer().clone()).unwrap();
        assert_eq!(output, format!("{EXIT_PROMPT}\n"));
    }

    #[test]
    fn test_states_are_ordered() {
        assert!(SessionState::Start < SessionState::Configuring);
        assert!(SessionState::Sending < SessionState::Done);
        assert!(SessionState::Done < SessionState::Failed);
    }
}
