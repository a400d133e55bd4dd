use crate::support::*;

pub fn test() {
    let mut server = server::udp();
    let appender = appender::appender();

    appender.append(&mut LogEvent::new(
        "app",
        Level::Error,
        data!["hello", { "message": "oops", "stack": "Error: oops\n    at main" }],
    ));

    server.receive(|received| {
        assert_eq!("hello", received["short_message"]);
        assert_eq!("Error: oops\n    at main", received["full_message"]);
        assert_eq!(3, received["level"]);
    });

    // Non-error second arguments aren't serialized
    appender.append(&mut LogEvent::new(
        "app",
        Level::Error,
        data!["hello", { "message": "no stack" }],
    ));

    server.receive(|received| {
        assert_eq!("", received["full_message"]);
    });

    appender.shutdown();
    server.close();
}
