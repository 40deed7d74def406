use crate::create_app;

/// Initialize logging; `RUST_LOG` overrides the default `info` filter.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

/// Entry point used by the native executable.
pub fn run() -> eframe::Result<()> {
    init_logger();
    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Graph Canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(create_app(cc)))),
    )
}
