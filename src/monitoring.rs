use tracing_subscriber::EnvFilter;

/// Console logging, `RUST_LOG`-filtered. `LOG_FORMAT=json` switches to
/// machine-readable lines for systemd/collector setups.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
