// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt requests, decisions, and the renderer collaborator.

use std::fmt;
use std::path::PathBuf;

/// What the user is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Allow or deny an action.
    Confirm,
    /// Supply credentials for an authentication challenge.
    Credentials {
        scheme: String,
        host: String,
        realm: String,
    },
    /// Pick a directory, starting from an optional suggestion.
    ChooseDirectory { suggested: Option<PathBuf> },
}

/// A security prompt waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// What the prompt is about, shown as the title.
    pub subject: String,
    /// The action being requested.
    pub action: String,
    /// Display name of the caller that raised the prompt.
    pub caller: String,
    pub kind: PromptKind,
}

impl PromptRequest {
    pub fn confirm(
        subject: impl Into<String>,
        action: impl Into<String>,
        caller: impl fmt::Display,
    ) -> Self {
        Self {
            subject: subject.into(),
            action: action.into(),
            caller: caller.to_string(),
            kind: PromptKind::Confirm,
        }
    }

    pub fn credentials(
        subject: impl Into<String>,
        caller: impl fmt::Display,
        scheme: impl Into<String>,
        host: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            action: "authenticate".to_string(),
            caller: caller.to_string(),
            kind: PromptKind::Credentials {
                scheme: scheme.into(),
                host: host.into(),
                realm: realm.into(),
            },
        }
    }

    pub fn choose_directory(
        subject: impl Into<String>,
        caller: impl fmt::Display,
        suggested: Option<PathBuf>,
    ) -> Self {
        Self {
            subject: subject.into(),
            action: "choose directory".to_string(),
            caller: caller.to_string(),
            kind: PromptKind::ChooseDirectory { suggested },
        }
    }
}

/// The user's answer to a prompt.
#[derive(Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    Credentials { username: String, password: String },
    Directory(PathBuf),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Decision::Deny)
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "Allow"),
            Decision::Deny => write!(f, "Deny"),
            Decision::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Decision::Directory(path) => f.debug_tuple("Directory").field(path).finish(),
        }
    }
}

/// Shows a prompt and returns the user's decision.
///
/// Called only from the dispatcher's worker thread, one request at a time.
pub trait PromptRenderer: Send + Sync {
    fn render(&self, request: &PromptRequest) -> Decision;
}

/// Renderer for environments with no way to ask: denies everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyingRenderer;

impl PromptRenderer for DenyingRenderer {
    fn render(&self, request: &PromptRequest) -> Decision {
        tracing::info!(subject = %request.subject, caller = %request.caller, "no prompt renderer, denying");
        Decision::Deny
    }
}

impl<F> PromptRenderer for F
where
    F: Fn(&PromptRequest) -> Decision + Send + Sync,
{
    fn render(&self, request: &PromptRequest) -> Decision {
        self(request)
    }
}
