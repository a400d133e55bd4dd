/*!
Fire-and-forget delivery of GELF payloads over UDP.

GELF over UDP supports chunking large messages across multiple datagrams,
but payloads here are always sent as a single datagram. Anything too big
for one is dropped.
*/

use std::{
    net::{SocketAddr, UdpSocket as StdUdpSocket},
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::Context;

use bytes::Bytes;

use serde_json::Value;

use tokio::net::{lookup_host, UdpSocket};

use crate::{diagnostics::emit_debug, Error};

metrics! {
    sent,
    oversize,
    send_err
}

/**
The largest payload that will be sent.
*/
pub const MAX_PAYLOAD_BYTES: usize = 8192;

/**
Transport configuration.
*/
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /**
    The host running the GELF input.
    */
    pub host: String,
    /**
    The port of the GELF input.
    */
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "localhost".to_owned(),
            port: 12201,
        }
    }
}

/**
The outcome of attempting to send a payload.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sent {
    /**
    The payload was sent as a single datagram.
    */
    Datagram(usize),
    /**
    The payload was too big and was dropped.
    */
    Oversize(usize),
}

/**
A UDP socket shared by all sends.
*/
#[derive(Debug)]
pub struct Transport {
    host: String,
    port: u16,
    sock: Mutex<Option<Arc<UdpSocket>>>,
}

impl Transport {
    /**
    Bind a local socket to send datagrams from.

    This needs to be called from within the context of a `tokio` runtime.
    */
    pub fn bind(config: Config) -> Result<Self, Error> {
        let sock = StdUdpSocket::bind("0.0.0.0:0").context("failed to bind GELF socket")?;
        sock.set_nonblocking(true)?;

        let sock = UdpSocket::from_std(sock)?;

        Ok(Transport {
            host: config.host,
            port: config.port,
            sock: Mutex::new(Some(Arc::new(sock))),
        })
    }

    /**
    Send a payload as a single datagram.

    Payloads larger than `MAX_PAYLOAD_BYTES` aren't sent. That isn't considered an error.
    */
    pub async fn send(&self, payload: Bytes) -> Result<Sent, Error> {
        let size = payload.len();

        if size > MAX_PAYLOAD_BYTES {
            increment!(transport.oversize);
            emit_debug(
                "Dropping GELF payload of {size} bytes; it exceeds the maximum of {max} bytes",
                vec![
                    ("size", Value::from(size)),
                    ("max", Value::from(MAX_PAYLOAD_BYTES)),
                ],
            );

            return Ok(Sent::Oversize(size));
        }

        match self.send_datagram(&payload).await {
            Ok(()) => {
                increment!(transport.sent);

                Ok(Sent::Datagram(size))
            }
            Err(err) => {
                increment!(transport.send_err);

                Err(err)
            }
        }
    }

    async fn send_datagram(&self, payload: &[u8]) -> Result<(), Error> {
        let sock = self
            .sock()
            .ok_or_else(|| anyhow!("the GELF socket has been closed"))?;

        // The socket is bound to an IPv4 address, so it can only send to IPv4 targets
        let target = lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("failed to resolve {}:{}", self.host, self.port))?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| anyhow!("{}:{} has no IPv4 address", self.host, self.port))?;

        sock.send_to(payload, target)
            .await
            .with_context(|| format!("failed to send GELF datagram to {}", target))?;

        Ok(())
    }

    /**
    Close the socket.

    Sends that are already in-flight hold the socket open until they complete.
    Any sends after the socket is closed will fail.
    Returns `true` if this call closed the socket.
    */
    pub fn close(&self) -> bool {
        self.lock().take().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    fn sock(&self) -> Option<Arc<UdpSocket>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<Option<Arc<UdpSocket>>> {
        // The guarded value is always valid, even if a holder panicked
        self.sock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
