// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single background worker serializing security prompts.
//!
//! Requests are queued FIFO and rendered one at a time on a dedicated
//! thread. Callers block (or await) until their own request is answered.
//! The worker is detached: it is never joined and does not hold the
//! process open at shutdown.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::{self, ThreadId};
use tokio::sync::{mpsc, oneshot};

use super::request::{Decision, PromptRenderer, PromptRequest};

/// Name of the worker thread.
pub const DISPATCHER_THREAD_NAME: &str = "jnlp-security-dialogs";

/// Where the worker delivers an answer.
///
/// Blocking submitters wait on a std channel, which may be waited on from
/// any thread, including one driving a tokio runtime.
enum Reply {
    Blocking(std_mpsc::SyncSender<Decision>),
    Async(oneshot::Sender<Decision>),
}

impl Reply {
    fn send(self, decision: Decision) {
        // The submitter may have given up waiting.
        match self {
            Reply::Blocking(tx) => {
                let _ = tx.send(decision);
            }
            Reply::Async(tx) => {
                let _ = tx.send(decision);
            }
        }
    }
}

struct Envelope {
    request: PromptRequest,
    reply: Reply,
}

/// Handle to the security dialog worker.
pub struct SecurityDialogDispatcher {
    queue: mpsc::UnboundedSender<Envelope>,
    pending: Arc<AtomicUsize>,
    worker: ThreadId,
}

impl SecurityDialogDispatcher {
    /// Spawn the worker thread rendering with `renderer`.
    pub fn start(renderer: Arc<dyn PromptRenderer>) -> std::io::Result<Self> {
        let (queue, mut inbox) = mpsc::unbounded_channel::<Envelope>();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker_pending = Arc::clone(&pending);

        let handle = thread::Builder::new()
            .name(DISPATCHER_THREAD_NAME.to_string())
            .spawn(move || {
                while let Some(envelope) = inbox.blocking_recv() {
                    worker_pending.fetch_sub(1, Ordering::SeqCst);
                    let decision = render(renderer.as_ref(), &envelope.request);
                    envelope.reply.send(decision);
                }
                tracing::debug!("security dialog queue closed, worker exiting");
            })?;

        let worker = handle.thread().id();
        tracing::debug!(thread = DISPATCHER_THREAD_NAME, "security dialog worker started");
        Ok(Self {
            queue,
            pending,
            worker,
        })
    }

    /// Submit a prompt and block until it is answered.
    ///
    /// Safe to call from inside an async runtime, though it blocks that
    /// executor thread; prefer [`submit_async`](Self::submit_async) there.
    /// A submission from the worker thread itself, or after the worker is
    /// gone, is answered with [`Decision::Deny`].
    pub fn submit(&self, request: PromptRequest) -> Decision {
        if thread::current().id() == self.worker {
            tracing::warn!(subject = %request.subject, "prompt submitted from the dialog worker, denying");
            return Decision::Deny;
        }
        let (reply, answer) = std_mpsc::sync_channel(1);
        if !self.enqueue(request, Reply::Blocking(reply)) {
            return Decision::Deny;
        }
        answer.recv().unwrap_or(Decision::Deny)
    }

    /// Submit a prompt and await its answer.
    pub async fn submit_async(&self, request: PromptRequest) -> Decision {
        let (reply, answer) = oneshot::channel();
        if !self.enqueue(request, Reply::Async(reply)) {
            return Decision::Deny;
        }
        answer.await.unwrap_or(Decision::Deny)
    }

    /// Requests queued and not yet picked up by the worker.
    pub fn pending_requests(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Identifier of the worker thread.
    pub fn worker_thread(&self) -> ThreadId {
        self.worker
    }

    fn enqueue(&self, request: PromptRequest, reply: Reply) -> bool {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.queue.send(Envelope { request, reply }).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!("security dialog worker is gone, denying");
            return false;
        }
        true
    }
}

impl std::fmt::Debug for SecurityDialogDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityDialogDispatcher")
            .field("worker", &self.worker)
            .field("pending", &self.pending_requests())
            .finish()
    }
}

fn render(renderer: &dyn PromptRenderer, request: &PromptRequest) -> Decision {
    tracing::debug!(subject = %request.subject, caller = %request.caller, "rendering security prompt");
    match catch_unwind(AssertUnwindSafe(|| renderer.render(request))) {
        Ok(decision) => decision,
        Err(_) => {
            tracing::error!(subject = %request.subject, "prompt renderer panicked, denying");
            Decision::Deny
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
