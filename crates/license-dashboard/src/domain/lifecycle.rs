//! Two-phase load cycle state machine.
//!
//! ```text
//! [IDLE] ──begin──→ [LOADING_CRITICAL] ──critical loaded──→ [LOADING_SECONDARY]
//!   ↑                      │                                        │
//!   │                      └──critical failed──→ [FAILED]           └──settled──→ [READY]
//!   │                                               │                               │
//!   └───────────────── begin (next cycle) ──────────┴───────────────────────────────┘
//! ```
//!
//! `FAILED` is only reachable from `LOADING_CRITICAL`: secondary query
//! failures never fail the cycle.

use std::fmt;

/// Load cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// No cycle started yet
    #[default]
    Idle,
    /// Waiting for the summary statistics
    LoadingCritical,
    /// Summary loaded, secondary sections in progress
    LoadingSecondary,
    /// Cycle complete
    Ready,
    /// Summary query failed; the cycle was aborted
    Failed,
}

impl LoadPhase {
    pub fn label(&self) -> &'static str {
        match self {
            LoadPhase::Idle => "idle",
            LoadPhase::LoadingCritical => "loading_critical",
            LoadPhase::LoadingSecondary => "loading_secondary",
            LoadPhase::Ready => "ready",
            LoadPhase::Failed => "failed",
        }
    }

    /// A cycle is running.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::LoadingCritical | LoadPhase::LoadingSecondary)
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Events driving the load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    /// A new cycle starts
    Begin,
    /// Summary statistics arrived
    CriticalLoaded,
    /// Summary statistics query failed
    CriticalFailed,
    /// Every secondary section succeeded, failed or was discarded
    SecondarySettled,
}

/// Load cycle tracker
#[derive(Debug, Default)]
pub struct LoadLifecycle {
    phase: LoadPhase,
    /// Completed cycles (Ready or Failed)
    cycles: u64,
    /// Cycles that ended in Failed
    failures: u64,
}

impl LoadLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Apply an event. Events that make no sense in the current phase
    /// leave it unchanged.
    pub fn process_event(&mut self, event: LoadEvent) -> LoadPhase {
        let next = self.next_state(event);

        if next != self.phase {
            match next {
                LoadPhase::Ready => self.cycles += 1,
                LoadPhase::Failed => {
                    self.cycles += 1;
                    self.failures += 1;
                }
                _ => {}
            }
        }

        self.phase = next;
        next
    }

    /// Pure transition function.
    fn next_state(&self, event: LoadEvent) -> LoadPhase {
        match (self.phase, event) {
            (LoadPhase::Idle | LoadPhase::Ready | LoadPhase::Failed, LoadEvent::Begin) => {
                LoadPhase::LoadingCritical
            }
            (LoadPhase::LoadingCritical, LoadEvent::CriticalLoaded) => LoadPhase::LoadingSecondary,
            (LoadPhase::LoadingCritical, LoadEvent::CriticalFailed) => LoadPhase::Failed,
            (LoadPhase::LoadingSecondary, LoadEvent::SecondarySettled) => LoadPhase::Ready,
            (phase, _) => phase,
        }
    }
}
