//! The `chainx` command line tool: reads sequences, enumerates anchors and
//! reports anchor-restricted edit distances.
pub mod cli;
pub mod io;
pub mod matches;
pub mod report;

/// Log `info` by default, `debug` with `-v` and `trace` with `-vv`.
/// `RUST_LOG` takes precedence.
pub fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
