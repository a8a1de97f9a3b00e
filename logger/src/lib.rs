use colored::Colorize;
use middleware::logger::LoggerMiddleware;

pub mod middleware {
    pub mod logger;
}

/// Debug output while developing, info in production.
pub fn default_level(production: bool) -> log::LevelFilter {
    if production {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Debug
    }
}

/// Installs the global logger: coloured lines on stdout plus an
/// append-only copy in `log_file`.
pub fn setup(level: log::LevelFilter, log_file: &str) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Utc::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level().to_string().color(level_color(record.level())),
                message
            ))
        })
        .level(level)
        .level_for("sqlx", log::LevelFilter::Warn)
        .level_for("hyper", log::LevelFilter::Off)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        .chain(fern::log_file(log_file)?)
        .apply()?;
    Ok(())
}

/// One log line per request; see [`LoggerMiddleware`].
pub fn middleware() -> LoggerMiddleware {
    LoggerMiddleware::new()
}

fn level_color(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "red",
        log::Level::Warn => "yellow",
        log::Level::Info => "green",
        log::Level::Debug => "magenta",
        log::Level::Trace => "bright black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_hides_debug_lines() {
        assert_eq!(default_level(true), log::LevelFilter::Info);
        assert_eq!(default_level(false), log::LevelFilter::Debug);
    }
}
