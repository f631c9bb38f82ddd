/// Setting key and console text constants.
/// Keeps environment variable names and user-facing strings in one place.
//
// Environment variables (also accepted as keys in the settings file, lowercased)
pub const SERVICEBUS_NS_NAME: &str = "SERVICEBUS_NS_NAME";
pub const QUEUE_NAME: &str = "QUEUE_NAME";
pub const USER_ASSIGNED_CLIENT_ID: &str = "USER_ASSIGNED_CLIENT_ID";
pub const RUNS_IN_AZURE: &str = "RUNS_IN_AZURE";

// Configuration keys as seen by the `config` crate
pub const KEY_SERVICEBUS_NS_NAME: &str = "servicebus_ns_name";
pub const KEY_QUEUE_NAME: &str = "queue_name";
pub const KEY_USER_ASSIGNED_CLIENT_ID: &str = "user_assigned_client_id";
pub const KEY_RUNS_IN_AZURE: &str = "runs_in_azure";
pub const KEY_LOGGING_LEVEL: &str = "logging.level";

/// Default settings file, optional when not named explicitly.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.toml";

/// Public DNS suffix of Service Bus namespaces in the Azure public cloud.
pub const SB_PUBLIC_SUFFIX: &str = "servicebus.windows.net";

// Console strings
pub const COUNT_PROMPT: &str = "Enter the number of messages to send: ";
pub const INVALID_COUNT_MESSAGE: &str = "Invalid input. Please enter a valid number.";
pub const EXIT_PROMPT: &str = "Press any key to end the application";

/// Local time layout used in message bodies.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
