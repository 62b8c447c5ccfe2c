use crate::config::Environment;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match environment {
        Environment::Local => {
            tracing_subscriber::fmt()
                .with_ansi(true)
                .with_env_filter(filter)
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .init();
        }
        Environment::Production => {
            tracing_subscriber::fmt()
                .with_ansi(false)
                .with_env_filter(filter)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .init();
        }
    }
}
