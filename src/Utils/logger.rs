use chrono::Local;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

/// Where log records go and how verbose they are.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: LevelFilter,
    /// log file name; `None` logs to the terminal only
    pub file: Option<String>,
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            file: None,
            console: true,
        }
    }
}

/// Parses a level name: off, error, warn, info, debug, trace (any case), or
/// `none` as a synonym for off.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    if level.eq_ignore_ascii_case("none") {
        return Some(LevelFilter::Off);
    }
    level.parse::<LevelFilter>().ok()
}

/// timestamped file name, used when the configured log file is `auto`
pub fn default_log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("calc_log_{}.txt", date_and_time)
}

/// Installs the global logger. Returns false when logging is off or a logger
/// was already installed; neither stops the program.
pub fn init_logger(settings: &LogSettings) -> bool {
    let level = settings.level;
    if level == LevelFilter::Off {
        return false;
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if settings.console {
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    if let Some(ref name) = settings.file {
        let name = if name == "auto" {
            default_log_file_name()
        } else {
            name.clone()
        };
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(err) => eprintln!("cannot create log file {}: {}", name, err),
        }
    }

    if loggers.is_empty() {
        return false;
    }
    CombinedLogger::init(loggers).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info"), Some(LevelFilter::Info));
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("none"), Some(LevelFilter::Off));
        assert_eq!(parse_level("Off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("TRACE"), Some(LevelFilter::Trace));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_default_log_file_name() {
        let name = default_log_file_name();
        assert!(name.starts_with("calc_log_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_off_installs_nothing() {
        let settings = LogSettings {
            level: LevelFilter::Off,
            ..LogSettings::default()
        };
        assert!(!init_logger(&settings));
    }

    #[test]
    fn test_log_file_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("engine.log");
        let settings = LogSettings {
            level: LevelFilter::Info,
            file: Some(path.to_string_lossy().to_string()),
            console: false,
        };
        init_logger(&settings);
        assert!(path.exists());
    }
}
