use crate::support::*;

pub fn test() {
    let mut server = server::udp();
    let appender = appender::builder()
        .facility("billing")
        .custom_fields(json!({
            "_a": 1,
            "_id": 99,
            "b": 2
        }))
        .append_category("category")
        .build();

    appender.append(&mut LogEvent::new("app.payments", Level::Info, data!["hello"]));

    server.receive(|received| {
        assert_eq!(1, received["_a"]);
        assert_eq!("billing", received["_facility"]);
        assert_eq!("app.payments", received["_category"]);

        assert!(received.get("_id").is_none());
        assert!(received.get("b").is_none());
        assert!(received.get("_b").is_none());
    });

    appender.shutdown();
    server.close();
}
