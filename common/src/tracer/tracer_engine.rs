use std::io::IsTerminal;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

pub struct TracerOptions {
    pub level: LevelFilter,
    /// Colour escapes are only written when stderr is a terminal.
    pub ansi: bool,
}

impl TracerOptions {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            ansi: std::io::stderr().is_terminal(),
        }
    }
}

/// This object initialises the global tracing subscriber, given a TracerOptions struct.
pub struct TracerEngine;

impl TracerEngine {
    /// Initialises the stderr tracer for the binary.
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// * `service_name` - The name of the binary, recorded on the first log line.
    /// * `module_name` - The name of the current module.
    /// #Returns
    /// An instance of TracerEngine
    pub fn new(options: TracerOptions, service_name: &str, module_name: &str) -> Self {
        // stdout is reserved for reports
        let stderr_tracer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(options.ansi);

        // RUST_LOG takes precedence over the requested level
        let log_filter = EnvFilter::builder()
            .with_default_directive(options.level.into())
            .from_env_lossy();

        let subscriber =
            tracing_subscriber::Registry::default().with(stderr_tracer.with_filter(log_filter));

        //  This is only called once, so will never panic
        tracing::subscriber::set_global_default(subscriber)
            .expect("tracing::subscriber::set_global_default should only be called once");

        debug!(service = service_name, module = module_name, "Tracer initialised");
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_follows_stderr() {
        let options = TracerOptions::new(LevelFilter::WARN);
        assert_eq!(options.level, LevelFilter::WARN);
        assert_eq!(options.ansi, std::io::stderr().is_terminal());
    }
}
