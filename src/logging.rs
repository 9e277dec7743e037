//! Structured logging utilities for dockext

use crate::constants::DEFAULT_LOG_FILTER;
use std::io;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Initialize structured logging with optional JSON output
pub fn init_logging(json_output: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = Registry::default().with(env_filter);

    if json_output {
        // JSON output for log aggregation
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()?;
    } else {
        // Console output on stderr so stdout stays clean for the plan
        registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()?;
    }

    Ok(())
}

#[macro_export]
macro_rules! log_extension_enabled {
    ($name:expr) => {
        tracing::info!(extension = $name, "Extension enabled");
    };
}

#[macro_export]
macro_rules! log_substitutions_computed {
    ($name:expr, $count:expr) => {
        tracing::debug!(extension = $name, keys = $count, "Computed environment substitutions");
    };
}

#[macro_export]
macro_rules! log_docker_invocation {
    ($step:expr, $docker:expr, $argc:expr) => {
        tracing::info!(
            step = $step,
            docker = %$docker,
            argc = $argc,
            "Invoking container CLI"
        );
    };
}
