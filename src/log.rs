//! Logger initialisation for the command-line front end.
//!
//! All records go to stderr so that exported data written to stdout stays clean.
use std::env;
use std::fmt::{Arguments, Display};
use std::io::IsTerminal;

use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use problemo::Problem;
use problemo::common::IntoCommonProblem;

/// Environment variable overriding the level given on the command line.
pub const LOG_LEVEL_VAR: &str = "SMPS_LOG_LEVEL";

/// Used when neither the command line nor the environment set a level.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Converts a level name (case insensitive) to a filter.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Initialise the program logger.
///
/// The environment variable takes precedence over `log_level_from_cli`, which in turn defaults to
/// `info`.
pub fn init(log_level_from_cli: Option<&str>) -> Result<(), Problem> {
    let log_level = env::var(LOG_LEVEL_VAR)
        .unwrap_or_else(|_| log_level_from_cli.unwrap_or(DEFAULT_LOG_LEVEL).to_string());
    let level = parse_level(&log_level)
        .ok_or_else(|| format!("Unknown log level: {}", log_level).gloss())?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour = std::io::stderr().is_terminal();

    Dispatch::new()
        .format(move |out, message, record| {
            write_log_colour(out, message, record, use_colour, &colours);
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .map_err(|e| format!("Unable to initialise logger: {}", e).gloss())
}

fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log(out, record.level(), record.target(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("off", Some(LevelFilter::Off))]
    #[case("WARN", Some(LevelFilter::Warn))]
    #[case("Debug", Some(LevelFilter::Debug))]
    #[case("verbose", None)]
    fn test_parse_level(#[case] level: &str, #[case] expected: Option<LevelFilter>) {
        assert_eq!(parse_level(level), expected);
    }
}
