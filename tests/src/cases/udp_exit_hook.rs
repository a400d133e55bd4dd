use gelfsend::lifecycle;

use crate::support::*;

pub fn test() {
    let mut server = server::udp();
    let appender = appender::appender();

    appender.append(&mut LogEvent::new("app", Level::Info, data!["before"]));

    server.receive(|received| {
        assert_eq!("before", received["short_message"]);
    });

    lifecycle::run_exit_hooks();

    assert!(appender.is_shutdown());

    // Shutting down after the exit hook has run is a no-op
    appender.shutdown();

    appender.append(&mut LogEvent::new("app", Level::Info, data!["after"]));

    server.receive_nothing();

    server.close();
}
