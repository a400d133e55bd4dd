use crate::support::*;

pub fn test() {
    let mut server = server::udp();
    let appender = appender::builder()
        .custom_fields(json!({
            "_a": 1,
            "_x": 1
        }))
        .build();

    let mut evt = LogEvent::new("app", Level::Info, data![{ "GELF": true, "_x": 5, "_id": 7 }, "msg"]);

    appender.append(&mut evt);

    // The marked argument is consumed
    assert_eq!(data!["msg"], evt.data);

    server.receive(|received| {
        assert_eq!("msg", received["short_message"]);
        assert_eq!(5, received["_x"]);
        assert_eq!(1, received["_a"]);

        assert!(received.get("_id").is_none());
        assert!(received.get("GELF").is_none());
    });

    // Unmarked arguments are left alone
    let mut evt = LogEvent::new("app", Level::Info, data!["plain", { "_x": 5 }]);

    appender.append(&mut evt);

    assert_eq!(2, evt.data.len());

    server.receive(|received| {
        assert_eq!("plain", received["short_message"]);
        assert_eq!(1, received["_x"]);
    });

    appender.shutdown();
    server.close();
}
