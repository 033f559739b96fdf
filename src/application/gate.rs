use crate::domain::lifecycle::HostState;
use std::sync::{Mutex, PoisonError};

/// Effect of a lifecycle transition on the orchestration core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    /// The host became resumed. `first` is set on the first entry of this host instance.
    EnteredResumed { first: bool },
    LeftResumed,
    Unchanged,
}

#[derive(Debug, Default)]
struct GateState {
    current: HostState,
    resumed_entries: u32,
}

/// Tracks the host's lifecycle and lets orchestration run only while resumed.
///
/// The gate is fed by whatever drives the host's lifecycle: the real UI
/// container or a fake driver in tests.
#[derive(Debug, Default)]
pub struct LifecycleGate {
    state: Mutex<GateState>,
}

impl LifecycleGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HostState {
        self.lock().current
    }

    pub fn is_resumed(&self) -> bool {
        self.state().is_resumed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state() == HostState::Destroyed
    }

    /// Records the move to `next` and reports whether it crossed the resumed boundary.
    ///
    /// `Destroyed` is terminal: every later transition is ignored.
    pub fn transition(&self, next: HostState) -> GateTransition {
        let mut state = self.lock();
        if state.current == HostState::Destroyed {
            return GateTransition::Unchanged;
        }
        let was_resumed = state.current.is_resumed();
        state.current = next;

        match (was_resumed, next.is_resumed()) {
            (false, true) => {
                state.resumed_entries += 1;
                GateTransition::EnteredResumed {
                    first: state.resumed_entries == 1,
                }
            }
            (true, false) => GateTransition::LeftResumed,
            _ => GateTransition::Unchanged,
        }
    }

    /// Runs `f` only if the host is currently resumed.
    pub fn run_if_resumed<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        if self.is_resumed() { Some(f()) } else { None }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
