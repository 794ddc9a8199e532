// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Localized user-facing text.
//!
//! The catalog itself is a collaborator ([`Messages`]); [`Localizer`] adds
//! the lookup rules the runtime relies on: empty strings read as absent, and
//! a missing key never fails, it yields a deterministic fallback line.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Key of the fallback message used when another key is missing.
pub const NO_RESOURCE: &str = "RNoResource";
/// Fatal error loading the deployment configuration.
pub const CONFIGURATION_ERROR: &str = "RConfigurationError";
/// No base directory could be determined.
pub const NO_BASE_DIRECTORY: &str = "BNoBase";
/// Prompt subject when asking the user for a base directory.
pub const CHOOSE_BASE_DIRECTORY: &str = "BChooseBase";
/// Prompt subject for an authentication challenge.
pub const AUTHENTICATION_PROMPT: &str = "SAuthenticationPrompt";
/// Trust verifier could not be installed.
pub const TRUST_INSTALL_FAILED: &str = "STrustInstallFailed";

const ENGLISH: &[(&str, &str)] = &[
    (NO_RESOURCE, "Missing Resource: {0}"),
    (
        CONFIGURATION_ERROR,
        "Fatal error while reading the configuration",
    ),
    (
        NO_BASE_DIRECTORY,
        "No base directory (could not create or read base directory).",
    ),
    (
        CHOOSE_BASE_DIRECTORY,
        "Choose a directory to store the launcher cache and settings",
    ),
    (
        AUTHENTICATION_PROMPT,
        "The {0} server at {1} is requesting authentication. It says \"{2}\"",
    ),
    (
        TRUST_INSTALL_FAILED,
        "Unable to install the trust verifier (may prevent access to sites that should be trusted). Continuing anyway.",
    ),
];

/// Source of localized strings.
pub trait Messages: Send + Sync {
    /// Raw catalog lookup.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Built-in English catalog.
#[derive(Clone, Debug)]
pub struct BuiltinMessages {
    catalog: HashMap<&'static str, &'static str>,
}

impl BuiltinMessages {
    pub fn new() -> Self {
        Self {
            catalog: ENGLISH.iter().copied().collect(),
        }
    }
}

impl Default for BuiltinMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl Messages for BuiltinMessages {
    fn lookup(&self, key: &str) -> Option<String> {
        self.catalog.get(key).map(|s| s.to_string())
    }
}

/// Lookup front-end over a [`Messages`] catalog.
#[derive(Clone)]
pub struct Localizer {
    source: Arc<dyn Messages>,
}

impl Localizer {
    pub fn new(source: Arc<dyn Messages>) -> Self {
        Self { source }
    }

    /// Localized string for `key`.
    ///
    /// Returns `None` when the catalog entry is empty. A missing key yields
    /// the `RNoResource` message naming the key, or `Missing resource: <key>`
    /// when the fallback entry is missing too.
    pub fn message(&self, key: &str) -> Option<String> {
        match self.source.lookup(key) {
            Some(text) if text.is_empty() => None,
            Some(text) => Some(text),
            None if key != NO_RESOURCE => match self.source.lookup(NO_RESOURCE) {
                Some(pattern) if !pattern.is_empty() => Some(format_message(&pattern, &[&key])),
                _ => Some(format!("Missing resource: {}", key)),
            },
            None => Some(format!("Missing resource: {}", key)),
        }
    }

    /// Localized string for `key` with `{n}` placeholders filled from `args`.
    pub fn message_with(&self, key: &str, args: &[&dyn fmt::Display]) -> String {
        self.message(key)
            .map(|pattern| format_message(&pattern, args))
            .unwrap_or_default()
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinMessages::new()))
    }
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer").finish_non_exhaustive()
    }
}

/// Replace `{0}`, `{1}`, ... in `pattern` with the matching argument.
///
/// Placeholders without a matching argument are left as written.
pub fn format_message(pattern: &str, args: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg.to_string(), close))
        });
        match replaced {
            Some((text, close)) => {
                out.push_str(&text);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
