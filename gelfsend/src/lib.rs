/*!
Send log events to Graylog as GELF over UDP.

The appender is split into a few main components, in order of where they appear in the processing of a log event:

- **Fields**: Merges custom fields from configuration, the event category, and an optional
marked first argument of the event.
- **Packet**: Builds the GELF message from the event and its custom fields. The event's level
is mapped onto Syslog severities by the **Level** mapper.
- **Compress**: Serializes the GELF message as JSON and compresses it.
- **Transport**: Sends the compressed message as a single UDP datagram, dropping anything
too big to fit.

The **Appender** wires these together. Compression and sending happen in the background,
so appending an event never blocks on the network.
*/

#![recursion_limit = "256"]
#![deny(unsafe_code)]

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

#[macro_use]
pub mod diagnostics;

#[macro_use]
extern crate anyhow;

pub mod appender;
pub mod compress;
pub mod config;
pub mod event;
pub mod fields;
pub mod level;
pub mod lifecycle;
pub mod log_compat;
pub mod packet;
pub mod transport;

pub use self::{
    anyhow::Error,
    appender::{Appender, Sink},
    config::Config,
    event::LogEvent,
    level::Level,
};
