use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LogConfig;

/// Base level plus per-target overrides, e.g. `warn,schema_guard::drift=debug`.
fn filter_directives(log_config: &LogConfig) -> String {
    let mut directives = log_config.level.clone();

    if let Some(ext_levels) = &log_config.ext_level {
        let mut targets: Vec<_> = ext_levels.iter().collect();
        targets.sort();
        for (target, level) in targets {
            directives.push_str(&format!(",{}={}", target, level));
        }
    }
    directives
}

/// Install the global subscriber.
///
/// Console output goes to stderr so stdout stays clean for `--json` reports.
/// The returned guard flushes the file appender and must live until exit.
pub fn init_logging(log_config: &LogConfig) -> Option<WorkerGuard> {
    let mut guard = None;

    let file_layer = match (log_config.file_enabled, &log_config.dir) {
        (true, Some(dir)) => {
            let file_appender = tracing_appender::rolling::daily(dir, "schema-guard.log");
            let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker_guard);

            Some(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true)
                    .with_thread_ids(true)
                    .with_target(true)
                    .boxed(),
            )
        }
        _ => None,
    };

    let console_layer = match log_config.console_format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        _ => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(log_config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}
