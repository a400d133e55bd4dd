use gelfsend::log_compat;

use log::LevelFilter;

use crate::support::*;

pub fn test() {
    let mut server = server::udp();

    log_compat::init(appender::appender(), LevelFilter::Info).expect("failed to install logger");

    log::debug!(target: "app::db", "not sent");
    log::warn!(target: "app::db", "connected to {}", "db");

    server.receive(|received| {
        assert_eq!("connected to db", received["short_message"]);
        assert_eq!(4, received["level"]);
    });

    server.receive_nothing();

    server.close();
}
