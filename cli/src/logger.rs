use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use sender::config::LoggingConfig;
use std::fs::OpenOptions;

/// Maps a configured level name to a filter. Unknown names fall back to Info.
pub fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger(config: &LoggingConfig) -> Result<(), log::SetLoggerError> {
    let log_level = level_filter(config.level());

    let colors = ColoredLevelConfig::new()
        .trace(Color::BrightBlack)
        .debug(Color::BrightBlue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().level(log_level).chain(console);

    // Plain, uncoloured lines in the file
    if let Some(file_path) = config.file() {
        match OpenOptions::new().create(true).append(true).open(file_path) {
            Ok(file) => {
                dispatch = dispatch.chain(
                    fern::Dispatch::new()
                        .format(|out, message, record| {
                            out.finish(format_args!(
                                "[{} {} {}] {}",
                                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                                record.level(),
                                record.target(),
                                message
                            ))
                        })
                        .chain(file),
                );
            }
            Err(e) => {
                eprintln!("Warning: Failed to open log file '{file_path}': {e}");
                eprintln!("Continuing without file logging.");
            }
        }
    }

    dispatch.apply()?;

    log::debug!("Logger initialized with level: {}", config.level());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_names() {
        assert_eq!(level_filter("TRACE"), LevelFilter::Trace);
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter("Warn"), LevelFilter::Warn);
        assert_eq!(level_filter("error"), LevelFilter::Error);
        assert_eq!(level_filter("off"), LevelFilter::Off);
    }

    #[test]
    fn test_unknown_level_defaults_to_info() {
        assert_eq!(level_filter("verbose"), LevelFilter::Info);
        assert_eq!(level_filter(""), LevelFilter::Info);
    }
}
