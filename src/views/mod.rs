// Views module - headless view-models for the hero screens
//
// Each view owns its state behind a ViewCell and talks to the backend through
// an injected `Arc<dyn HeroApi>`:
// - List: loads all heroes, client-side search, delete with confirmation
// - Detail: resolves one hero from the route id
// - Form: create or edit, validation, submit
//
// Loads run as spawned tasks. Activation hands out a ticket; a task only writes
// its result back while its ticket is still current, so results of loads that
// were superseded or outlived their view are dropped (the request itself is not
// aborted).

use std::sync::{Arc, Mutex, MutexGuard};

mod detail;
mod filter;
mod form;
mod list;
mod route;

pub use detail::DetailView;
pub use form::{Field, FormView, SubmitOutcome};
pub use list::{DeleteOutcome, ListView};
pub use route::Route;

#[cfg(test)]
pub(crate) mod testing;

/// Explicit user confirmation before a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

struct Inner<S> {
    state: S,
    /// Bumped on every (re)activation and deactivation
    epoch: u64,
    active: bool,
}

/// View state plus activation bookkeeping, shared with spawned load tasks
pub(crate) struct ViewCell<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S> Clone for ViewCell<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Clone> ViewCell<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                epoch: 0,
                active: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> S {
        self.lock().state.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock().state)
    }

    /// Mark active, supersede any earlier ticket, and prepare state
    pub fn activate(&self, prepare: impl FnOnce(&mut S)) -> u64 {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.active = true;
        prepare(&mut inner.state);
        inner.epoch
    }

    pub fn deactivate(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// Unconditional update (user input on the view itself)
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock().state)
    }

    /// Apply a load result only if `ticket` is still the current activation
    pub fn apply(&self, ticket: u64, f: impl FnOnce(&mut S)) -> bool {
        let mut inner = self.lock();
        if !inner.active || inner.epoch != ticket {
            return false;
        }
        f(&mut inner.state);
        true
    }

    /// Apply a result as long as the view is still active
    pub fn apply_if_active(&self, f: impl FnOnce(&mut S)) -> bool {
        let mut inner = self.lock();
        if !inner.active {
            return false;
        }
        f(&mut inner.state);
        true
    }
}
