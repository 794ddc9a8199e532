// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lines meant for the person running the launcher.
//!
//! Structured diagnostics go through `tracing`. These helpers cover the
//! few lines an end user reads directly: launch failures, installation
//! warnings and the localized message shown before a fail-stop exit.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// How a stderr line is labelled and colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        }
    }

    /// SGR color code used on terminals.
    fn color(self) -> u8 {
        match self {
            Severity::Error => 31,
            Severity::Warning => 33,
        }
    }
}

/// Report a launch or bootstrap failure on stderr (red on a terminal).
pub fn print_error(msg: impl Display) {
    let stderr = io::stderr();
    let colored = stderr.is_terminal();
    write_labelled(&mut stderr.lock(), Severity::Error, msg, colored);
}

/// Report a non-fatal problem on stderr (yellow on a terminal).
pub fn print_warning(msg: impl Display) {
    let stderr = io::stderr();
    let colored = stderr.is_terminal();
    write_labelled(&mut stderr.lock(), Severity::Warning, msg, colored);
}

fn write_labelled<W: Write>(writer: &mut W, severity: Severity, msg: impl Display, colored: bool) {
    let label = severity.label();
    let _ = if colored {
        writeln!(writer, "\x1b[{}m{label}: {msg}\x1b[0m", severity.color())
    } else {
        writeln!(writer, "{label}: {msg}")
    };
}

/// Print a localized console message to stdout, unadorned.
///
/// Used for the single line shown before a fail-stop exit.
pub fn print_console(msg: impl Display) {
    write_console(&mut io::stdout(), msg);
}

fn write_console<W: Write>(writer: &mut W, msg: impl Display) {
    let _ = writeln!(writer, "{msg}");
    let _ = writer.flush();
}

#[cfg(test)]
#[path = "output_diagnostic_tests.rs"]
mod tests;
