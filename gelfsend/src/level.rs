/*!
Mapping host log levels onto the Syslog severities used by GELF.
*/

use std::{collections::HashMap, fmt, str::FromStr};

use crate::Error;

lazy_static! {
    static ref SYSLOG_LEVELS: HashMap<Level, SyslogLevel> = {
        let mut levels = HashMap::new();

        levels.insert(Level::All, SyslogLevel::Debug);
        levels.insert(Level::Trace, SyslogLevel::Debug);
        levels.insert(Level::Debug, SyslogLevel::Debug);
        levels.insert(Level::Info, SyslogLevel::Informational);
        levels.insert(Level::Warn, SyslogLevel::Warning);
        levels.insert(Level::Error, SyslogLevel::Error);
        levels.insert(Level::Fatal, SyslogLevel::Critical);

        levels
    };
}

/**
The severity of a log event, as seen by the host logging framework.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    All,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Mark,
    Off,
}

/**
The standard Syslog severities.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogLevel {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Informational = 6,
    Debug = 7,
}

impl Level {
    /**
    Get the Syslog severity for this level.

    Levels that don't carry a severity, like `Off`, return `None`.
    */
    pub fn to_syslog(self) -> Option<SyslogLevel> {
        SYSLOG_LEVELS.get(&self).copied()
    }

    fn as_str(self) -> &'static str {
        match self {
            Level::All => "ALL",
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Mark => "MARK",
            Level::Off => "OFF",
        }
    }
}

impl SyslogLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<SyslogLevel> for u8 {
    fn from(level: SyslogLevel) -> u8 {
        level.as_u8()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Level::All),
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "FATAL" => Ok(Level::Fatal),
            "MARK" => Ok(Level::Mark),
            "OFF" => Ok(Level::Off),
            _ => Err(anyhow!("unrecognized log level `{}`", s)),
        }
    }
}
