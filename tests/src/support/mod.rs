const SERVER_BIND: &'static str = "127.0.0.1:12202";
const SERVER_HOST: &'static str = "127.0.0.1";
const SERVER_PORT: u16 = 12202;


pub use serde_json::Value;

pub use gelfsend::{Level, LogEvent};

macro_rules! data {
    ($($item:tt),*) => {
        vec![$(json!($item)),*]
    };
}

/**
Build a string that doesn't compress well.

The same length always produces the same string.
*/
pub(crate) fn noise(len: usize) -> String {
    let mut rng = fastrand::Rng::with_seed(0x2545_f491_4f6c_dd1d);

    (0..len).map(|_| rng.alphanumeric()).collect()
}

pub(crate) fn test_child(name: &str) -> bool {
    use std::{
        env,
        process::{
            Command,
            Stdio,
        },
    };

    let self_bin = env::args().next().expect("missing self command");

    let mut test = Command::new(self_bin)
        .arg(name)
        .stdout(Stdio::inherit())
        .spawn()
        .expect("failed to start child process");

    test.wait().expect("test execution failed").success()
}

macro_rules! cases {
    ($($case:ident),+) => {
        $(
            mod $case;
        )+

        pub(crate) fn test_all() {
            use std::process;

            let mut failed = Vec::new();

            $(
                if !$crate::support::test_child(stringify!($case)) {
                    failed.push(stringify!($case));
                }
            )+

            if failed.len() > 0 {
                eprintln!("test execution failed. Failures: {:#?}", failed);
                process::exit(1);
            }
        }

        pub(crate) fn test(name: impl AsRef<str>) {
            let name = name.as_ref();

            $(
                if name == stringify!($case) {
                    use gelfsend::diagnostics;

                    diagnostics::init(diagnostics::Config {
                        min_level: diagnostics::Level::Debug,
                        ..Default::default()
                    });

                    println!("running {}...", stringify!($case));
                    self::$case::test();

                    diagnostics::stop().expect("failed to stop diagnostics");
                }
            )+
        }
    }
}
