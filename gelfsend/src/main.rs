use std::process;

use serde_json::Value;

use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    runtime::Runtime,
    signal::ctrl_c,
};

use gelfsend::{diagnostics, lifecycle, Appender, Config, Error, Level, LogEvent};

/**
The category of events read from `stdin`.
*/
const CATEGORY: &str = "stdin";

fn main() {
    if let Err(err) = run() {
        diagnostics::emit_err(&err, "GELF appender failed");
        process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    diagnostics::init(config.diagnostics.clone());

    let runtime = Runtime::new()?;
    let appender = Appender::with_handle(config, runtime.handle().clone())?;

    // Each line of input is sent as an event until the input closes
    runtime.block_on(async {
        let mut lines = BufReader::new(io::stdin()).lines();

        let ctrl_c = ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => {
                        let mut evt = LogEvent::new(CATEGORY, Level::Info, vec![Value::String(line)]);

                        appender.append(&mut evt);
                    }
                    None => break,
                },
                _ = &mut ctrl_c => {
                    diagnostics::emit("Termination signal received; shutting down");
                    break;
                },
            }
        }

        diagnostics::emit("Waiting for events to finish sending");
        appender.flush().await;

        Result::Ok::<(), Error>(())
    })?;

    appender.shutdown_with(|| diagnostics::emit("Socket released"));

    // Nothing should be left to release, but hosts are expected to call this on exit
    lifecycle::run_exit_hooks();

    diagnostics::stop()
}
