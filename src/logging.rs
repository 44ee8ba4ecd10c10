use std::sync::Once;

static INIT: Once = Once::new();

/// Set up `env_logger` once. An explicit `RUST_LOG` wins; otherwise
/// `verbose` picks debug over info.
pub fn init_logging(verbose: bool){
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else if verbose {
            builder.filter_level(log::LevelFilter::Debug);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }
        builder.format_timestamp(None);
        builder.init();
        log::debug!("logging initialized");
    });
}
