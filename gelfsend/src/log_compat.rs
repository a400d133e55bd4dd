/*!
Compatibility bridge for the Rust `log` crate.

`GelfLogger` implements `log::Log`, so an appender can be installed as the
global logger. The record's target is used as the event category.
*/

use log::{LevelFilter, Metadata, Record};

use serde_json::Value;

use crate::{appender::Appender, event::LogEvent, level::Level, Error};

/**
A `log::Log` implementation that appends records to a GELF appender.
*/
pub struct GelfLogger {
    appender: Appender,
    max_level: LevelFilter,
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

impl GelfLogger {
    pub fn new(appender: Appender, max_level: LevelFilter) -> Self {
        GelfLogger {
            appender,
            max_level,
        }
    }

    pub fn appender(&self) -> &Appender {
        &self.appender
    }

    fn to_event(record: &Record) -> LogEvent {
        LogEvent::new(
            normalise_target(record.target()),
            record.level().into(),
            vec![Value::String(record.args().to_string())],
        )
    }
}

fn normalise_target(target: &str) -> String {
    target.replace("::", ".")
}

impl log::Log for GelfLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        self.appender.append(&mut Self::to_event(record));
    }

    /**
    Wait for appended records to be sent.

    This only blocks for appenders that own their runtime. Within an async
    context, await `appender().flush()` instead.
    */
    fn flush(&self) {
        self.appender.flush_blocking();
    }
}

/**
Install an appender as the global logger.

This can only be called once per process.
*/
pub fn init(appender: Appender, max_level: LevelFilter) -> Result<(), Error> {
    log::set_boxed_logger(Box::new(GelfLogger::new(appender, max_level)))
        .map_err(|err| anyhow!("failed to install the GELF logger: {}", err))?;

    log::set_max_level(max_level);

    Ok(())
}
