//! Dependency handles.
//!
//! When a random variable is promoted to a *dependency* (a named variable
//! other decompositions can condition on), it receives a stable identity
//! from a process-wide monotonic counter. Handles are cheap reference
//! clones; two handles denote the same dependency iff their ids are equal —
//! the variable's content never takes part in the comparison.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::random_variable::RandomVariable;

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Debug)]
struct Dependency {
    id: usize,
    variable: RandomVariable,
}

/// A shared, identity-stable reference to a promoted random variable.
#[derive(Debug, Clone)]
pub struct DependencyHandle {
    inner: Arc<Dependency>,
}

impl DependencyHandle {
    /// Promote `variable` into a fresh dependency with a new identity.
    pub fn promote(variable: RandomVariable) -> Self {
        Self {
            inner: Arc::new(Dependency {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                variable,
            }),
        }
    }

    /// The identity of this dependency.
    pub fn id(&self) -> usize {
        self.inner.id
    }

    /// The promoted random variable.
    pub fn variable(&self) -> &RandomVariable {
        &self.inner.variable
    }

    /// Size of the dependency's support; its radix in the mixed-radix
    /// indexing of conditional leaves.
    pub fn len(&self) -> usize {
        self.inner.variable.len()
    }

    /// `true` iff the promoted variable is the impossible event.
    pub fn is_empty(&self) -> bool {
        self.inner.variable.is_empty()
    }
}

impl PartialEq for DependencyHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for DependencyHandle {}

impl PartialOrd for DependencyHandle {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DependencyHandle {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id().cmp(&other.id())
    }
}
