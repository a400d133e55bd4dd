/*!
Self-diagnostics for the appender.

Diagnostic events are written to `stderr` as CLEF, so they can't feed back into
the pipeline that's shipping application events. Only errors are written by default.
*/

use std::{
    collections::BTreeMap,
    fmt::Display,
    io::{self, Write},
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, Utc};

use serde_json::Value;

use crate::Error;

/**
Declare a set of counters for the current module.

Counters are bumped with `increment!(module.counter)` and reported
when diagnostics are stopped.
*/
macro_rules! metrics {
    ($($metric:ident),+) => {
        #[allow(non_upper_case_globals, dead_code)]
        pub(crate) mod metrics {
            use std::sync::atomic::{AtomicUsize, Ordering};

            $(
                pub(crate) static $metric: AtomicUsize = AtomicUsize::new(0);
            )+

            pub(crate) fn snapshot() -> Vec<(&'static str, usize)> {
                vec![$((stringify!($metric), $metric.load(Ordering::Relaxed))),+]
            }
        }
    };
}

macro_rules! increment {
    ($module:ident . $metric:ident) => {
        $crate::$module::metrics::$metric.fetch_add(1, ::std::sync::atomic::Ordering::Relaxed)
    };
}

static MIN_LEVEL: AtomicUsize = AtomicUsize::new(Level::Error as usize);

/**
Diagnostics configuration.
*/
#[derive(Debug, Clone)]
pub struct Config {
    /**
    The minimum level of diagnostic events to write.
    */
    pub min_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_level: Level::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Error = 2,
}

impl Level {
    fn from_usize(level: usize) -> Level {
        match level {
            0 => Level::Debug,
            1 => Level::Info,
            _ => Level::Error,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

/**
Start writing diagnostics with the given configuration.
*/
pub fn init(config: Config) {
    MIN_LEVEL.store(config.min_level as usize, Ordering::Relaxed);
}

/**
Write the collected metrics and flush any buffered diagnostics.
*/
pub fn stop() -> Result<(), Error> {
    let mut properties = BTreeMap::new();

    let modules = [
        ("appender", crate::appender::metrics::snapshot()),
        ("compress", crate::compress::metrics::snapshot()),
        ("transport", crate::transport::metrics::snapshot()),
    ];

    for (module, snapshot) in modules.iter() {
        for (metric, value) in snapshot {
            properties.insert(format!("{}.{}", module, metric), Value::from(*value));
        }
    }

    write(Level::Debug, None, "Collected GELF metrics", properties);

    io::stderr().flush()?;

    Ok(())
}

pub(crate) fn enabled(level: Level) -> bool {
    level >= Level::from_usize(MIN_LEVEL.load(Ordering::Relaxed))
}

#[derive(Serialize)]
struct DiagnosticEvent<'a> {
    #[serde(rename = "@t")]
    timestamp: DateTime<Utc>,

    #[serde(rename = "@l")]
    level: &'static str,

    #[serde(rename = "@mt")]
    message_template: &'static str,

    #[serde(rename = "@x")]
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,

    #[serde(flatten)]
    properties: BTreeMap<String, Value>,
}

/**
Write an informational event.
*/
pub fn emit(message_template: &'static str) {
    write(Level::Info, None, message_template, BTreeMap::new());
}

/**
Write a debug event with some properties that can be referenced by the template.
*/
pub fn emit_debug(
    message_template: &'static str,
    properties: impl IntoIterator<Item = (&'static str, Value)>,
) {
    if !enabled(Level::Debug) {
        return;
    }

    let properties = properties
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();

    write(Level::Debug, None, message_template, properties);
}

/**
Write an error event.
*/
pub fn emit_err(error: &impl Display, message_template: &'static str) {
    // `anyhow` includes the chain of causes with the alternate format
    let err_str = format!("{:#}", error);
    write(
        Level::Error,
        Some(&err_str),
        message_template,
        BTreeMap::new(),
    );
}

fn write(
    level: Level,
    error: Option<&str>,
    message_template: &'static str,
    properties: BTreeMap<String, Value>,
) {
    if !enabled(level) {
        return;
    }

    let evt = DiagnosticEvent {
        timestamp: Utc::now(),
        level: level.as_str(),
        message_template,
        error,
        properties,
    };

    if let Ok(json) = serde_json::to_string(&evt) {
        let _ = writeln!(io::stderr().lock(), "{}", json);
    }
}
