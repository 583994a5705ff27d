use tracing::Level;

/// Install a stderr fmt subscriber. 0 = warn, 1 = info, 2 = debug, 3+ = trace.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
