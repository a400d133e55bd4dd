use chrono::{DateTime, Utc};

use serde_json::Value;

use crate::level::Level;

/**
A log event handed to the appender by the host logging framework.

The first data item is the message. The second, if present, is
an error-like object that may carry a `stack`.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub data: Vec<Value>,
    pub level: Level,
    pub category_name: String,
    pub start_time: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(category_name: impl Into<String>, level: Level, data: Vec<Value>) -> Self {
        LogEvent {
            data,
            level,
            category_name: category_name.into(),
            start_time: Utc::now(),
        }
    }

    /**
    The primary message of the event.
    */
    pub fn message(&self) -> Option<&Value> {
        self.data.first()
    }

    /**
    The stack trace of the error-like object attached to the event.
    */
    pub fn stack(&self) -> Option<&str> {
        self.data
            .get(1)
            .and_then(|error| error.get("stack"))
            .and_then(Value::as_str)
    }
}
