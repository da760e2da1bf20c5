//! Terminal logging setup shared by the solver structs.
//!
//! Log levels are passed around as strings ("debug", "info", "warn",
//! "error"; "off" or "none" disables logging entirely), mapped onto a
//! simplelog terminal logger. Re-initialization is harmless: the second
//! `CombinedLogger::init` fails and is ignored, the first configuration
//! wins.

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

pub fn init_logging(loglevel: Option<&str>) {
    let is_logging_disabled = loglevel
        .map(|level| level == "off" || level == "none")
        .unwrap_or(false);
    if is_logging_disabled {
        return;
    }

    let log_option = match loglevel {
        Some("debug") => LevelFilter::Debug,
        Some("info") | None => LevelFilter::Info,
        Some("warn") => LevelFilter::Warn,
        Some("error") => LevelFilter::Error,
        Some(other) => panic!("loglevel must be debug, info, warn or error, got {}", other),
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging(Some("info"));
        init_logging(Some("warn"));
        init_logging(None);
    }

    #[test]
    fn test_off_levels_do_nothing() {
        init_logging(Some("off"));
        init_logging(Some("none"));
    }

    #[test]
    #[should_panic(expected = "loglevel")]
    fn test_unknown_level_panics() {
        init_logging(Some("verbose"));
    }
}
