use chrono::{DateTime, Utc};

use serde_json::{Map, Value};

use crate::event::LogEvent;

pub const GELF_VERSION: &str = "1.1";

/**
Configuration for GELF packets.
*/
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /**
    The name of the host sending messages.

    Defaults to the hostname of the machine.
    */
    pub hostname: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hostname: local_hostname(),
        }
    }
}

fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|hostname| hostname.into_string().ok())
        .unwrap_or_else(|| "localhost".to_owned())
}

/**
A GELF 1.1 message.
*/
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub version: String,
    pub host: String,
    pub short_message: Value,
    pub full_message: String,
    pub timestamp: f64,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,

    // Custom fields
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/**
Builds GELF packets from log events.
*/
#[derive(Debug, Clone)]
pub struct Builder {
    hostname: String,
}

impl Builder {
    pub fn new(config: Config) -> Self {
        Builder {
            hostname: config.hostname,
        }
    }

    /**
    Build a packet for an event, timestamped now.

    This should be called after custom fields have been merged, because
    merging may remove the first data item from the event.
    */
    pub fn build(&self, evt: &LogEvent, additional: Map<String, Value>) -> Packet {
        self.build_at(evt, additional, Utc::now())
    }

    pub fn build_at(
        &self,
        evt: &LogEvent,
        additional: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Packet {
        Packet {
            version: GELF_VERSION.to_owned(),
            host: self.hostname.clone(),
            // GELF requires a short message, so a missing one is sent empty
            short_message: evt
                .message()
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
            full_message: evt.stack().unwrap_or_default().to_owned(),
            timestamp: to_timestamp(now),
            level: evt.level.to_syslog().map(u8::from),
            additional,
        }
    }
}

/**
Seconds since the epoch, with sub-second precision.
*/
fn to_timestamp(ts: DateTime<Utc>) -> f64 {
    ts.timestamp() as f64 + f64::from(ts.timestamp_subsec_micros()) / 1_000_000f64
}
