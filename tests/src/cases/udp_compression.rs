use gelfsend::compress::Compression;

use crate::support::*;

pub fn test() {
    let mut server = server::udp();

    for (compression, magic) in vec![
        (Compression::Gzip, Some(0x1f)),
        (Compression::Zlib, Some(0x78)),
        (Compression::None, Some(b'{')),
    ] {
        let appender = appender::builder().compression(compression).build();

        appender.append(&mut LogEvent::new("app", Level::Info, data!["hello"]));

        server.receive_datagram(|received| {
            assert_eq!("hello", received.json["short_message"]);
            assert_eq!(magic, received.first);
        });

        appender.shutdown();
    }

    server.close();
}
