use crate::support::*;

pub fn test() {
    let mut server = server::udp();
    let appender = appender::appender();

    appender.append(&mut LogEvent::new("app", Level::Info, data!["hello"]));

    server.receive(|received| {
        assert_eq!("1.1", received["version"]);
        assert_eq!("test-host", received["host"]);
        assert_eq!("hello", received["short_message"]);
        assert_eq!("", received["full_message"]);
        assert_eq!(6, received["level"]);
        assert!(received["timestamp"].as_f64().expect("missing timestamp") > 0.0);
    });

    appender.shutdown();
    server.close();
}
