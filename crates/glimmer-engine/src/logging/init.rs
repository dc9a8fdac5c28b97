use std::sync::Once;

/// Used when neither the config nor `RUST_LOG` gives a filter. wgpu and naga
/// are held at `warn`; they log every adapter and shader at `info`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// `env_logger` setup for binaries built on the engine.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter syntax. Overrides `RUST_LOG`.
    pub env_filter: Option<String>,
    /// Appends `glimmer_engine::lighting=debug`: per-frame pass plans,
    /// skipped blits and clamp warnings.
    pub trace_lighting: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            trace_lighting: false,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    let mut filter = config
        .env_filter
        .clone()
        .or(rust_log)
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned());
    if config.trace_lighting {
        filter.push_str(",glimmer_engine::lighting=debug");
    }
    filter
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis()
            .try_init();

        match installed {
            Ok(()) => log::debug!("logger installed, filter `{filter}`"),
            // Host already installed one.
            Err(_) => log::debug!("keeping existing global logger"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_beats_environment() {
        let config = LoggingConfig {
            env_filter: Some("warn".into()),
            ..Default::default()
        };
        assert_eq!(resolve_filter(&config, Some("trace".into())), "warn");
        assert_eq!(resolve_filter(&LoggingConfig::default(), Some("trace".into())), "trace");
        assert_eq!(resolve_filter(&LoggingConfig::default(), None), DEFAULT_FILTER);
    }

    #[test]
    fn lighting_trace_is_appended() {
        let config = LoggingConfig {
            trace_lighting: true,
            ..Default::default()
        };
        assert!(resolve_filter(&config, Some("info".into())).ends_with("glimmer_engine::lighting=debug"));
    }
}
