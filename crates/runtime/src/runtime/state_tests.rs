// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[test]
fn defaults_match_documented_values() {
    let config = RuntimeConfig::default();
    assert!(!config.headless);
    assert!(config.verify_signatures);
    assert!(config.security_enabled);
    assert!(!config.debug);
    assert!(!config.redirect_streams);
    assert!(config.forks_allowed);
    assert!(config.base_directory.is_none());
    assert!(config.launch_handler.is_none());
    assert!(config.download_indicator.is_none());
    assert!(config.window_icon.is_none());
    assert!(config.initial_arguments.is_none());
    assert_eq!(config.update_policy, UpdatePolicy::Always);
}

#[test]
fn lifecycle_moves_forward() {
    let state = RuntimeState::default();
    assert_eq!(state.lifecycle(), Lifecycle::Uninitialized);
    assert!(state.check_not_initialized().is_ok());

    state.begin_initialization().unwrap();
    assert_eq!(state.lifecycle(), Lifecycle::Initializing);
    assert!(matches!(
        state.check_not_initialized(),
        Err(RuntimeError::AlreadyInitialized)
    ));

    state.finish_initialization();
    assert_eq!(state.lifecycle(), Lifecycle::Initialized);
}

#[test]
fn begin_twice_fails() {
    let state = RuntimeState::default();
    state.begin_initialization().unwrap();
    assert!(matches!(
        state.begin_initialization(),
        Err(RuntimeError::AlreadyInitialized)
    ));
}

#[test]
fn finish_without_begin_is_ignored() {
    let state = RuntimeState::default();
    state.finish_initialization();
    assert_eq!(state.lifecycle(), Lifecycle::Uninitialized);
}

#[test]
fn only_one_concurrent_begin_wins() {
    let state = Arc::new(RuntimeState::default());
    let wins = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let state = Arc::clone(&state);
            let wins = Arc::clone(&wins);
            thread::spawn(move || {
                if state.begin_initialization().is_ok() {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(wins.load(Ordering::SeqCst), 1);
}

#[test]
fn update_sees_current_lifecycle() {
    let state = RuntimeState::default();
    state.begin_initialization().unwrap();

    let seen = state
        .update(|lifecycle, config| {
            config.debug = true;
            Ok(lifecycle)
        })
        .unwrap();

    assert_eq!(seen, Lifecycle::Initializing);
    assert!(state.read(|c| c.debug));
}

