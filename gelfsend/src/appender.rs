/*!
The appender that ties the pipeline together.

Events are turned into GELF packets on the calling thread. Compressing and
sending them happens in the background on a `tokio` runtime, so appending
never waits on the network.
*/

use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use anyhow::Context;

use tokio::{
    runtime::{self, Handle, Runtime},
    sync::Notify,
};

use crate::{
    compress::Compressor,
    config::Config,
    diagnostics::{emit, emit_err},
    event::LogEvent,
    fields::Merger,
    lifecycle::{self, HookId},
    packet::{self, Packet},
    transport::Transport,
    Error,
};

metrics! {
    append
}

/**
A destination for log events.

Each call is independent, so events may be appended from any thread.
*/
pub trait Sink {
    fn append(&self, evt: &mut LogEvent);
}

/**
An appender that sends log events as GELF over UDP.
*/
pub struct Appender {
    inner: Arc<Inner>,
    handle: Handle,
    // Only set when the appender owns its runtime
    runtime: Option<Runtime>,
}

struct Inner {
    merger: Merger,
    packets: packet::Builder,
    compressor: Compressor,
    transport: Transport,
    released: AtomicBool,
    exit_hook: Mutex<Option<HookId>>,
    in_flight: AtomicUsize,
    idle: Notify,
}

impl Appender {
    /**
    Build an appender that runs on its own background thread.
    */
    pub fn new(config: Config) -> Result<Self, Error> {
        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("gelfsend")
            .enable_all()
            .build()
            .context("failed to start GELF runtime")?;

        let handle = runtime.handle().clone();

        Self::build(config, handle, Some(runtime))
    }

    /**
    Build an appender that runs on an existing `tokio` runtime.
    */
    pub fn with_handle(config: Config, handle: Handle) -> Result<Self, Error> {
        Self::build(config, handle, None)
    }

    fn build(config: Config, handle: Handle, runtime: Option<Runtime>) -> Result<Self, Error> {
        emit("Starting GELF appender");

        let transport = {
            let _runtime = handle.enter();

            Transport::bind(config.transport)?
        };

        let inner = Arc::new(Inner {
            merger: Merger::new(config.fields),
            packets: packet::Builder::new(config.packet),
            compressor: Compressor::new(config.compress),
            transport,
            released: AtomicBool::new(false),
            exit_hook: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
        });

        // The hook only holds a weak reference so it doesn't keep a dropped appender alive
        let hook = lifecycle::register({
            let inner = Arc::downgrade(&inner);

            move || {
                if let Some(inner) = inner.upgrade() {
                    inner.release();
                }
            }
        });

        *inner.exit_hook() = Some(hook);

        Ok(Appender {
            inner,
            handle,
            runtime,
        })
    }

    /**
    Append an event.

    If the first data item of the event carries custom fields then it's
    removed from the event. This method returns before the event is sent.
    Any failures compressing or sending the event are reported through diagnostics.
    */
    pub fn append(&self, evt: &mut LogEvent) {
        increment!(appender.append);

        let additional = self.inner.merger.merge(evt);
        let packet = self.inner.packets.build(evt, additional);

        let in_flight = InFlight::begin(self.inner.clone());

        self.spawn(async move {
            in_flight.inner.dispatch(packet).await;
        });
    }

    /**
    Wait for any events that have already been appended to be sent.
    */
    pub async fn flush(&self) {
        loop {
            // The notification is registered before checking so a completion can't be missed
            let idle = self.inner.idle.notified();

            if self.inner.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }

            idle.await;
        }
    }

    /**
    Block until events that have already been appended are sent.

    This only waits when the appender owns its runtime and it isn't called
    from within an async context. Otherwise it returns immediately, and
    callers should await `flush` instead.
    */
    pub fn flush_blocking(&self) {
        if self.runtime.is_none() || Handle::try_current().is_ok() {
            return;
        }

        self.handle.block_on(self.flush());
    }

    /**
    Release the socket.

    Calling this more than once is a no-op.
    */
    pub fn shutdown(&self) {
        self.shutdown_with(|| ());
    }

    /**
    Release the socket and then call `on_complete`.

    The socket is only released once, but `on_complete` is always called.
    */
    pub fn shutdown_with(&self, on_complete: impl FnOnce()) {
        self.inner.release();

        on_complete();
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.released.load(Ordering::SeqCst)
    }

    fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        // Dropping the returned handle detaches the task
        let _ = self.handle.spawn(fut);
    }
}

impl Sink for Appender {
    fn append(&self, evt: &mut LogEvent) {
        Appender::append(self, evt)
    }
}

impl Drop for Appender {
    fn drop(&mut self) {
        self.inner.release();

        if let Some(runtime) = self.runtime.take() {
            // Doesn't block, so the appender can be dropped from within a runtime
            runtime.shutdown_background();
        }
    }
}

impl Inner {
    async fn dispatch(&self, packet: Packet) {
        // NOTE: We never want to carry these results back to the caller
        let payload = match self.compressor.compress(&packet) {
            Ok(payload) => payload,
            Err(err) => {
                emit_err(&err, "GELF compression failed");
                return;
            }
        };

        if let Err(err) = self.transport.send(payload).await {
            emit_err(&err, "GELF delivery failed");
        }
    }

    fn release(&self) -> bool {
        // Held until the socket is closed so concurrent callers wait for the first release
        let mut exit_hook = self.exit_hook();

        if self.released.swap(true, Ordering::SeqCst) {
            return false;
        }

        if let Some(hook) = exit_hook.take() {
            lifecycle::deregister(hook);
        }

        self.transport.close();

        emit("Stopped GELF appender");

        true
    }

    fn exit_hook(&self) -> MutexGuard<Option<HookId>> {
        self.exit_hook
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/**
Tracks an event between being appended and being sent.

The count is released even if the task is dropped without running.
*/
struct InFlight {
    inner: Arc<Inner>,
}

impl InFlight {
    fn begin(inner: Arc<Inner>) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);

        InFlight { inner }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
