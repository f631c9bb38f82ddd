pub mod args;
pub mod logger;

use anyhow::Context;
use args::Args;
use sender::client::{AzureConnector, QueueConnector};
use sender::config::AppConfig;
use sender::session::{Console, SendSession, SessionOutcome, SessionSettings, wait_for_exit};

/// Loads configuration, runs one send session and waits for the user.
pub async fn run<K: Console + ?Sized>(args: &Args, console: &mut K) -> anyhow::Result<()> {
    let config =
        AppConfig::load(args.config.clone(), &args.overrides()).context("Invalid configuration")?;

    logger::setup_logger(config.logging()).context("Failed to initialize logger")?;

    let connector = AzureConnector::new(args.transport);
    run_with(&connector, &config, args.no_wait, console).await?;
    Ok(())
}

/// Runs the send session, then shows the exit prompt unless the input was
/// invalid or `no_wait` is set.
pub async fn run_with<C: QueueConnector, K: Console + ?Sized>(
    connector: &C,
    config: &AppConfig,
    no_wait: bool,
    console: &mut K,
) -> anyhow::Result<SessionOutcome> {
    let outcome = send(connector, config, console).await?;

    // Invalid input ends the program right away
    if outcome != SessionOutcome::InvalidInput && !no_wait {
        wait_for_exit(console).context("Failed to wait for the exit key")?;
    }
    Ok(outcome)
}

/// Runs the send session against any connector.
pub async fn send<C: QueueConnector, K: Console + ?Sized>(
    connector: &C,
    config: &AppConfig,
    console: &mut K,
) -> anyhow::Result<SessionOutcome> {
    let settings = SessionSettings::from_config(config);
    let mut session = SendSession::new(connector, settings);

    session
        .run(console)
        .await
        .with_context(|| format!("Sending to queue '{}' failed", config.queue_name()))
}
