use std::fmt;
use std::str::FromStr;

/// Verbosity of a run. `Off` silences run output entirely, including log
/// entries relayed from the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Off,
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, LogLevel::Off)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "false",
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "false" | "off" | "none" => Ok(LogLevel::Off),
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Emit `message` at a level only known at runtime.
pub(crate) fn emit(level: LogLevel, message: &str) {
    match level {
        LogLevel::Off => {}
        LogLevel::Trace => tracing::trace!(target: "ddl_runner", "{}", message),
        LogLevel::Debug => tracing::debug!(target: "ddl_runner", "{}", message),
        LogLevel::Info => tracing::info!(target: "ddl_runner", "{}", message),
        LogLevel::Warn => tracing::warn!(target: "ddl_runner", "{}", message),
        LogLevel::Error => tracing::error!(target: "ddl_runner", "{}", message),
    }
}

/// Like [`emit`], carrying executor-provided key/value metadata.
pub(crate) fn emit_with(level: LogLevel, message: &str, metadata: &[(String, String)]) {
    if metadata.is_empty() {
        return emit(level, message);
    }
    match level {
        LogLevel::Off => {}
        LogLevel::Trace => tracing::trace!(target: "ddl_runner", ?metadata, "{}", message),
        LogLevel::Debug => tracing::debug!(target: "ddl_runner", ?metadata, "{}", message),
        LogLevel::Info => tracing::info!(target: "ddl_runner", ?metadata, "{}", message),
        LogLevel::Warn => tracing::warn!(target: "ddl_runner", ?metadata, "{}", message),
        LogLevel::Error => tracing::error!(target: "ddl_runner", ?metadata, "{}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_false_as_off() {
        assert_eq!("false".parse::<LogLevel>(), Ok(LogLevel::Off));
        assert_eq!(" Info ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert!(LogLevel::default().is_enabled());
        assert!(!LogLevel::Off.is_enabled());
    }

    #[test]
    fn display_round_trips() {
        for level in [
            LogLevel::Off,
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
        }
    }
}
