use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::support::*;

pub fn test() {
    let mut server = server::udp();
    let appender = appender::appender();

    appender.append(&mut LogEvent::new("app", Level::Info, data!["before"]));

    server.receive(|received| {
        assert_eq!("before", received["short_message"]);
    });

    let completed = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let completed = completed.clone();

        appender.shutdown_with(move || {
            completed.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert!(appender.is_shutdown());
    assert_eq!(2, completed.load(Ordering::SeqCst));

    // Events after shutdown are dropped without failing the caller
    appender.append(&mut LogEvent::new("app", Level::Info, data!["after"]));

    server.receive_nothing();

    server.close();
}
