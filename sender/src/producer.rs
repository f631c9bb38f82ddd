use crate::client::MessageBatch;
use crate::constants::TIMESTAMP_FORMAT;
use crate::errors::{SenderError, SenderResult};
use chrono::Local;
use std::fmt;
use thiserror::Error;

/// The console input was not a usable message count.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{input}' is not a valid number of messages")]
pub struct InvalidCount {
    pub input: String,
}

/// Parses the number of messages typed at the prompt.
///
/// Surrounding whitespace (including the trailing newline) is ignored.
/// Any 32-bit integer is accepted; zero and negative counts produce an
/// empty batch.
pub fn parse_message_count(input: &str) -> Result<i32, InvalidCount> {
    input.trim().parse::<i32>().map_err(|_| InvalidCount {
        input: input.trim().to_string(),
    })
}

/// Timestamp stamped on every message of one batch.
///
/// Captured once before the batch is filled so all bodies carry the same value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchTimestamp(String);

impl BatchTimestamp {
    /// Current local time, formatted as `YYYY-MM-DD HH:MM:SS`.
    pub fn now() -> Self {
        Self(Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn fixed(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn message_body(timestamp: &BatchTimestamp, index: usize) -> String {
    format!("Time stamp: {timestamp}, Message sent in batch with number: {index}")
}

/// Appends `count` generated bodies, numbered from 1, to `batch`, and
/// returns how many were appended. A count below one appends nothing.
///
/// Stops at the first body the batch rejects and reports its index; the
/// batch must then be discarded unsent.
pub fn fill_batch<B: MessageBatch + ?Sized>(
    batch: &mut B,
    timestamp: &BatchTimestamp,
    count: i32,
) -> SenderResult<usize> {
    let count = usize::try_from(count).unwrap_or(0);
    for index in 1..=count {
        if !batch.try_add(&message_body(timestamp, index)) {
            log::error!("Message {index} does not fit in the batch");
            return Err(SenderError::MessageTooLarge { index });
        }
    }

    log::debug!("Batch filled with {} messages", batch.len());
    Ok(count)
}
