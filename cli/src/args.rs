use clap::Parser;
use sender::client::TransportPreference;
use sender::config::ConfigOverrides;
use std::path::PathBuf;

/// Publish a batch of text messages to an Azure Service Bus queue.
///
/// Settings are read from the settings file, then the environment
/// (SERVICEBUS_NS_NAME, QUEUE_NAME, USER_ASSIGNED_CLIENT_ID, RUNS_IN_AZURE),
/// then these flags. Later sources win.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file (TOML). Defaults to ./appsettings.toml when present
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Service Bus namespace name, without the public suffix
    #[arg(short = 'n', long = "servicebus-ns-name")]
    pub servicebus_ns_name: Option<String>,

    /// Target queue
    #[arg(short = 'q', long = "queue-name")]
    pub queue_name: Option<String>,

    /// Client id of a user-assigned managed identity
    #[arg(long = "user-assigned-client-id")]
    pub user_assigned_client_id: Option<String>,

    /// Authenticate with a managed identity instead of the Azure CLI session
    #[arg(long = "runs-in-azure")]
    pub runs_in_azure: bool,

    /// AMQP transport: amqp-web-sockets (port 443) or amqp-tcp (ports 5671/5672)
    #[arg(long = "transport", default_value_t = TransportPreference::AmqpWebSockets)]
    pub transport: TransportPreference,

    /// Log level: trace, debug, info, warn, error
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// Exit without waiting for a key press
    #[arg(long = "no-wait")]
    pub no_wait: bool,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            servicebus_ns_name: self.servicebus_ns_name.clone(),
            queue_name: self.queue_name.clone(),
            user_assigned_client_id: self.user_assigned_client_id.clone(),
            // An absent flag must not mask RUNS_IN_AZURE=true from lower layers
            runs_in_azure: self.runs_in_azure.then_some(true),
            log_level: self.log_level.clone(),
        }
    }
}
