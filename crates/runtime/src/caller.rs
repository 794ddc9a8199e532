// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Caller identity tokens for privileged operations.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CALLER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of the code asking the runtime to do something privileged.
///
/// Every call to [`Caller::new`] mints a fresh identity. Clones share the
/// identity of the token they were cloned from, so handing a clone to other
/// code delegates the authority it carries. Two tokens minted with the same
/// name are still different callers.
#[derive(Clone)]
pub struct Caller {
    id: u64,
    name: Arc<str>,
}

impl Caller {
    /// Mint a new caller identity.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_CALLER_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// Process-unique identifier of this caller.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Human-readable name given at mint time.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Caller {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Caller {}

impl Hash for Caller {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Caller({}#{})", self.name, self.id)
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

#[cfg(test)]
#[path = "caller_tests.rs"]
mod tests;
