use std::io::Write;

use log::LevelFilter;

/// Level from the argument, else `RUST_LOG`, else `Info`.
pub fn resolve_level(level: Option<&str>) -> LevelFilter {
    level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| std::env::var("RUST_LOG").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(LevelFilter::Info)
}

pub fn init_logging(level: Option<&str>) {
    let log_level = resolve_level(level);
    env_logger::Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();
    log::debug!("logger initialized (level: {})", log_level);
}
