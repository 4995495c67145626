//! logger setup for the binary and for examples
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::io;
use std::path::Path;

/// Installs a terminal logger and, if `log_file` is given, a file logger with the same level.
///
/// Returns `Ok(false)` when a global logger was already installed (tests, repeated example
/// runs); that is not an error, the existing logger keeps working.
/// # Errors
/// the log file cannot be created
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> io::Result<bool> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    Ok(CombinedLogger::init(loggers).is_ok())
}

/// "off", "error", "warn", "info", "debug", "trace", case insensitive
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}
