// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing` subscriber setup for the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::env;

const DEFAULT_DIRECTIVE: &str = "info";

/// Pick the filter directive: debug mode wins, then `JNLP_LOG`, then `info`.
pub fn filter_directive(debug: bool, from_env: Option<&str>) -> String {
    if debug {
        return "debug".to_string();
    }
    match from_env {
        Some(directive) if EnvFilter::try_new(directive).is_ok() => directive.to_string(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// Install a stderr `fmt` subscriber. Later calls are no-ops.
pub fn init(debug: bool) {
    let directive = filter_directive(debug, env::log_filter().as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
