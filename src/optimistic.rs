//! Speculative local mutation with rollback.
//!
//! `begin` snapshots the state and applies the speculative change right away,
//! so the caller sees it before the service answers. `settle` then either
//! reconciles with the service's result or restores the snapshot.

pub struct Optimistic<'a, S: Clone> {
    state: &'a mut S,
    snapshot: S,
}

impl<'a, S: Clone> Optimistic<'a, S> {
    pub fn begin(state: &'a mut S, speculate: impl FnOnce(&mut S)) -> Self {
        let snapshot = state.clone();
        speculate(state);
        Self { state, snapshot }
    }

    /// Read access to the speculative state while the call is in flight.
    pub fn current(&self) -> &S {
        self.state
    }

    pub fn settle<T, E>(
        self,
        outcome: Result<T, E>,
        reconcile: impl FnOnce(&mut S, &T),
    ) -> Result<T, E> {
        match &outcome {
            Ok(value) => reconcile(self.state, value),
            Err(_) => *self.state = self.snapshot,
        }
        outcome
    }
}
