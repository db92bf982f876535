//! Global logging system.

use std::{
    fs::File,
    path::Path,
    sync::Arc,
    env,
    panic,
};
use backtrace::Backtrace;
use tracing_subscriber::{
    fmt::{
        self,
        time::uptime,
    },
    prelude::*,
    Registry,
    EnvFilter,
};
use anyhow::*;


/// Default logging environment filter. Our crates are debug, everything else is warn.
const DEFAULT_FILTER: &'static str = "warn,hitbox=debug,physics=debug,sandbox=debug";

/// File the log is mirrored into unless disabled, in the working directory.
pub const LOG_FILE_NAME: &'static str = "log";

/// Initializes a `tracing` logging backend which outputs to stdout, and also to `log_file` if
/// given. Accepts ecosystem-standard `RUST_LOG` env filters, and routes panics through the
/// logging system.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer()
        .event_format(format);

    let log_file_log = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("unable to create log file {}", path.display()))?;
            Some(fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)))
        }
        None => None,
    };

    let env_filter = env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = Registry::default()
        .with(EnvFilter::try_new(filter_directives(env_filter.as_deref()))
            .context("invalid log filter")?)
        .with(stdout_log)
        .with(log_file_log);
    tracing::subscriber::set_global_default(subscriber)
        .context("unable to install log subscriber")?;
    info!(log_file=?log_file.map(Path::display), "starting program");

    panic::set_hook(Box::new(|info| {
        error!("{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
            error!("{:?}", Backtrace::new());
        }
    }));
    trace!("installed custom panic hook");
    Ok(())
}

/// The default filter, with `env_filter` directives appended so they take precedence.
fn filter_directives(env_filter: Option<&str>) -> String {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Some(env_filter) = env_filter.filter(|s| !s.trim().is_empty()) {
        filter.push(',');
        filter.push_str(env_filter);
    }
    filter
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directives_are_appended() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("  ")), DEFAULT_FILTER);
        assert_eq!(
            filter_directives(Some("physics=trace")),
            format!("{},physics=trace", DEFAULT_FILTER),
        );
    }

    #[test]
    fn directives_parse() {
        EnvFilter::try_new(filter_directives(Some("physics::tick=trace"))).unwrap();
    }
}
