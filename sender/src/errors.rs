use thiserror::Error;

/// Errors raised while loading and validating settings.
///
/// Loading is layered (settings file, environment, command line); each
/// variant names the stage or the key that failed so the message can be
/// shown to the user as-is.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or merged
    #[error("Configuration loading failed: {0}. Please check your settings file and environment variables.")]
    Load(String),

    /// Merged values did not match the expected shape
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(String),

    /// A required setting is absent or blank
    #[error("Required setting '{key}' is missing or empty. Set {env_var} in your environment, .env file or settings file.")]
    MissingValue { key: String, env_var: String },
}

/// Errors raised during a send run.
///
/// Failures inside the Azure SDK are carried as strings with the operation
/// that produced them, mirroring how the Service Bus layer reports them.
#[derive(Debug, Error)]
pub enum SenderError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Failed to create Azure credential: {0}")]
    Credential(String),

    #[error("Failed to create Service Bus client for namespace '{namespace}': {reason}")]
    ClientCreationFailed { namespace: String, reason: String },

    #[error("Failed to create sender for queue '{queue}': {reason}")]
    SenderCreationFailed { queue: String, reason: String },

    #[error("Failed to create message batch: {0}")]
    BatchCreationFailed(String),

    /// The batch rejected a message; nothing has been sent.
    #[error("The message {index} is too large to fit in the batch.")]
    MessageTooLarge { index: usize },

    #[error("Failed to send message batch: {0}")]
    SendFailed(String),

    #[error("Failed to dispose {resource}: {reason}")]
    DisposeFailed {
        resource: &'static str,
        reason: String,
    },

    /// `run` was called on a session that already ran.
    #[error("The send session already ran and ended in state {state}")]
    SessionAlreadyRan { state: String },

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SenderResult<T> = Result<T, SenderError>;
