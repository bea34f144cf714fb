use log::LevelFilter;

/// Set up `env_logger` from the CLI verbosity flags. `RUST_LOG` takes
/// precedence when set.
pub fn init_logger(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    if let Err(err) = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
    {
        log::debug!("Logger already initialized: {}", err);
    }
}
