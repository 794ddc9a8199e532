// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::dialog::{DenyingRenderer, PromptKind};
use parking_lot::{Condvar, Mutex};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

fn wait_until(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(5));
    }
}

/// Records render order and holds "R1" until released.
#[derive(Default)]
struct GatedRenderer {
    rendered: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    released: Mutex<bool>,
    release: Condvar,
}

impl GatedRenderer {
    fn open(&self) {
        *self.released.lock() = true;
        self.release.notify_all();
    }

    fn rendered(&self) -> Vec<String> {
        self.rendered.lock().clone()
    }
}

impl PromptRenderer for GatedRenderer {
    fn render(&self, request: &PromptRequest) -> Decision {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.rendered.lock().push(request.subject.clone());
        if request.subject == "R1" {
            let mut released = self.released.lock();
            while !*released {
                self.release.wait(&mut released);
            }
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Decision::Allow
    }
}

#[test]
fn prompts_render_in_submission_order_one_at_a_time() {
    let renderer = Arc::new(GatedRenderer::default());
    let dispatcher = Arc::new(SecurityDialogDispatcher::start(renderer.clone()).unwrap());

    let submit = |subject: &'static str| {
        let dispatcher = Arc::clone(&dispatcher);
        thread::spawn(move || dispatcher.submit(PromptRequest::confirm(subject, "run", "test")))
    };

    let first = submit("R1");
    wait_until("R1 to render", || renderer.rendered().len() == 1);
    let second = submit("R2");
    wait_until("R2 to queue", || dispatcher.pending_requests() == 1);
    let third = submit("R3");
    wait_until("R3 to queue", || dispatcher.pending_requests() == 2);

    renderer.open();

    for handle in [first, second, third] {
        assert_eq!(handle.join().unwrap(), Decision::Allow);
    }
    assert_eq!(renderer.rendered(), vec!["R1", "R2", "R3"]);
    assert_eq!(renderer.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.pending_requests(), 0);
}

#[test]
fn submitter_blocks_until_answered() {
    let renderer = Arc::new(GatedRenderer::default());
    let dispatcher = Arc::new(SecurityDialogDispatcher::start(renderer.clone()).unwrap());
    let answered = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let handle = {
        let dispatcher = Arc::clone(&dispatcher);
        let answered = Arc::clone(&answered);
        thread::spawn(move || {
            let decision = dispatcher.submit(PromptRequest::confirm("R1", "run", "test"));
            answered.store(true, Ordering::SeqCst);
            decision
        })
    };

    wait_until("R1 to render", || renderer.rendered().len() == 1);
    thread::sleep(Duration::from_millis(20));
    assert!(!answered.load(Ordering::SeqCst));

    renderer.open();
    assert_eq!(handle.join().unwrap(), Decision::Allow);
}

#[test]
fn renders_on_named_worker_thread() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let recorder = Arc::clone(&seen);
    let renderer = move |_: &PromptRequest| {
        *recorder.lock() = thread::current().name().map(str::to_string);
        Decision::Allow
    };
    let dispatcher = SecurityDialogDispatcher::start(Arc::new(renderer)).unwrap();

    dispatcher.submit(PromptRequest::confirm("subject", "run", "test"));

    assert_eq!(seen.lock().as_deref(), Some(DISPATCHER_THREAD_NAME));
    assert_ne!(dispatcher.worker_thread(), thread::current().id());
}

#[test]
fn panicking_renderer_denies_and_worker_survives() {
    let renderer = |request: &PromptRequest| {
        if request.subject == "boom" {
            panic!("renderer failure");
        }
        Decision::Allow
    };
    let dispatcher = SecurityDialogDispatcher::start(Arc::new(renderer)).unwrap();

    assert_eq!(
        dispatcher.submit(PromptRequest::confirm("boom", "run", "test")),
        Decision::Deny
    );
    assert_eq!(
        dispatcher.submit(PromptRequest::confirm("fine", "run", "test")),
        Decision::Allow
    );
}

#[test]
fn submission_from_worker_is_denied() {
    let handle: Arc<OnceLock<Arc<SecurityDialogDispatcher>>> = Arc::new(OnceLock::new());
    let nested = Arc::new(Mutex::new(None::<Decision>));

    let renderer = {
        let handle = Arc::clone(&handle);
        let nested = Arc::clone(&nested);
        move |request: &PromptRequest| {
            if request.subject == "outer" {
                let inner = handle
                    .get()
                    .unwrap()
                    .submit(PromptRequest::confirm("inner", "run", "worker"));
                *nested.lock() = Some(inner);
            }
            Decision::Allow
        }
    };
    let dispatcher = Arc::new(SecurityDialogDispatcher::start(Arc::new(renderer)).unwrap());
    handle.set(Arc::clone(&dispatcher)).unwrap();

    assert_eq!(
        dispatcher.submit(PromptRequest::confirm("outer", "run", "test")),
        Decision::Allow
    );
    assert_eq!(*nested.lock(), Some(Decision::Deny));
}

#[test]
fn decisions_are_routed_to_their_own_submitter() {
    let renderer = |request: &PromptRequest| Decision::Directory(request.subject.clone().into());
    let dispatcher = Arc::new(SecurityDialogDispatcher::start(Arc::new(renderer)).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let subject = format!("/tmp/{i}");
                let decision = dispatcher.submit(PromptRequest::confirm(&subject, "run", "test"));
                (subject, decision)
            })
        })
        .collect();

    for handle in handles {
        let (subject, decision) = handle.join().unwrap();
        assert_eq!(decision, Decision::Directory(subject.into()));
    }
}

#[tokio::test]
async fn submit_async_awaits_decision() {
    let renderer = |request: &PromptRequest| match &request.kind {
        PromptKind::Credentials { host, .. } => Decision::Credentials {
            username: format!("user@{host}"),
            password: "secret".to_string(),
        },
        _ => Decision::Deny,
    };
    let dispatcher = SecurityDialogDispatcher::start(Arc::new(renderer)).unwrap();

    let decision = dispatcher
        .submit_async(PromptRequest::credentials(
            "login",
            "test",
            "https",
            "example.com",
            "realm",
        ))
        .await;

    assert_eq!(
        decision,
        Decision::Credentials {
            username: "user@example.com".to_string(),
            password: "secret".to_string(),
        }
    );
}

#[tokio::test]
async fn blocking_submit_inside_async_runtime_is_answered() {
    let renderer = |_: &PromptRequest| Decision::Allow;
    let dispatcher = SecurityDialogDispatcher::start(Arc::new(renderer)).unwrap();

    let decision = dispatcher.submit(PromptRequest::confirm("Run applet", "run", "launcher"));

    assert_eq!(decision, Decision::Allow);
}

#[test]
fn decision_debug_redacts_password() {
    let decision = Decision::Credentials {
        username: "alice".to_string(),
        password: "hunter2".to_string(),
    };
    let rendered = format!("{decision:?}");
    assert!(rendered.contains("alice"));
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn denying_renderer_denies() {
    let dispatcher = SecurityDialogDispatcher::start(Arc::new(DenyingRenderer)).unwrap();
    assert_eq!(
        dispatcher.submit(PromptRequest::confirm("subject", "run", "test")),
        Decision::Deny
    );
}
