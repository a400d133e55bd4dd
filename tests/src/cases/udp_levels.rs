use crate::support::*;

pub fn test() {
    let mut server = server::udp();
    let appender = appender::appender();

    let cases = vec![
        (Level::All, 7),
        (Level::Trace, 7),
        (Level::Debug, 7),
        (Level::Info, 6),
        (Level::Warn, 4),
        (Level::Error, 3),
        (Level::Fatal, 2),
    ];

    // Events are sent in the background, so they may arrive out of order
    for (level, _) in &cases {
        appender.append(&mut LogEvent::new("app", *level, data![(level.to_string())]));
    }

    for _ in &cases {
        server.receive(|received| {
            let level: Level = received["short_message"]
                .as_str()
                .expect("missing message")
                .parse()
                .expect("invalid level");

            let expected = cases
                .iter()
                .find(|(l, _)| *l == level)
                .map(|(_, syslog)| *syslog)
                .expect("unexpected level");

            assert_eq!(expected, received["level"]);
        });
    }

    // Levels without a Syslog severity are sent without one
    appender.append(&mut LogEvent::new("app", Level::Mark, data!["mark"]));

    server.receive(|received| {
        assert_eq!("mark", received["short_message"]);
        assert!(received.get("level").is_none());
    });

    appender.shutdown();
    server.close();
}
