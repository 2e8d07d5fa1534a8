//! Synchronized outcome collection.
//!
//! Every probe task appends exactly one [`Outcome`] here. The collector is
//! shared through an `Arc` and serializes appends behind a mutex; it is
//! drained once, after the orchestrator's join barrier has released.

use crate::types::Outcome;
use std::sync::{Mutex, MutexGuard};

/// Append-only, concurrency-safe sequence of outcomes.
///
/// Outcomes are kept in arrival order. No ordering is promised between
/// concurrent callers.
#[derive(Debug, Default)]
pub struct ResultCollector {
    outcomes: Mutex<Vec<Outcome>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for a known number of endpoints.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Record one outcome. Safe to call from any number of tasks at once.
    pub fn append(&self, outcome: Outcome) {
        self.lock().push(outcome);
    }

    /// Number of outcomes recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take every recorded outcome, leaving the collector empty.
    ///
    /// Callers must only drain after all producers have finished.
    pub fn drain(&self) -> Vec<Outcome> {
        std::mem::take(&mut *self.lock())
    }

    /// Consume the collector and return its outcomes.
    pub fn into_outcomes(self) -> Vec<Outcome> {
        self.outcomes
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // A producer that panicked while holding the lock cannot have left a
    // half-written Vec behind (push is the only mutation), so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Vec<Outcome>> {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
