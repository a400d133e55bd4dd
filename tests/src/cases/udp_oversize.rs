use crate::support::*;

pub fn test() {
    let mut server = server::udp();
    let appender = appender::appender();

    // This message is too large to fit into a single datagram, even when compressed
    appender.append(&mut LogEvent::new("app", Level::Info, data![(noise(64 * 1024))]));

    server.receive_nothing();
    assert_eq!(0, server.received());

    // Later messages are still sent
    appender.append(&mut LogEvent::new("app", Level::Info, data![(noise(1024))]));

    server.receive_datagram(|received| {
        assert!(received.size <= 8192);
        assert_eq!(noise(1024), received.json["short_message"]);
    });

    appender.shutdown();
    server.close();
}
