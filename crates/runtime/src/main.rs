// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Launcher runtime binary entry point.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;

use jnlp_runtime::caller::Caller;
use jnlp_runtime::cli::{Cli, OutputFormat};
use jnlp_runtime::config::FileConfigStore;
use jnlp_runtime::logging;
use jnlp_runtime::output_diagnostic::print_error;
use jnlp_runtime::runtime::{Runtime, RuntimeBuilder};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let mut builder = RuntimeBuilder::new();
    if let Some(path) = &cli.config {
        builder = builder.with_config_store(Arc::new(FileConfigStore::new(path)));
    }
    let runtime = builder.build();
    let launcher = Caller::new("launcher");

    if let Err(e) = cli.apply(&runtime, &launcher) {
        print_error(e);
        std::process::exit(1);
    }

    if let Err(e) = runtime.bootstrap(cli.is_application()) {
        print_error(e);
        std::process::exit(1);
    }

    if let Err(e) = report(&runtime, cli.output_format) {
        print_error(format_args!("Failed to write report: {}", e));
        std::process::exit(1);
    }

    if let Err(e) = runtime.exit(&launcher, 0) {
        print_error(e);
        std::process::exit(1);
    }
}

fn report(runtime: &Runtime, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let summary = runtime.summary();
    let mut stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Text => write!(stdout, "{}", summary)?,
        OutputFormat::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(&summary)?)?,
    }
    stdout.flush()?;
    Ok(())
}
