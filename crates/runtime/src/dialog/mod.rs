// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Security prompts and the worker that serializes them.

pub mod dispatcher;
pub mod request;

pub use dispatcher::{SecurityDialogDispatcher, DISPATCHER_THREAD_NAME};
pub use request::{Decision, DenyingRenderer, PromptKind, PromptRenderer, PromptRequest};
