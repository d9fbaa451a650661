//! View state consumed by the rendering layer.

use super::types::SummaryStats;

/// Latest successfully loaded summary plus the loading flag.
///
/// Only two transitions exist: [`ViewState::begin_load`] and
/// [`ViewState::complete_load`]. Stats are replaced on each successful
/// cycle, never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    stats: Option<SummaryStats>,
    loading: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Empty state, loading.
    pub fn new() -> Self {
        Self {
            stats: None,
            loading: true,
        }
    }

    /// Enter loading. Previously loaded stats stay visible.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Store freshly loaded stats and leave loading.
    pub fn complete_load(&mut self, stats: SummaryStats) {
        self.stats = Some(stats);
        self.loading = false;
    }

    pub fn stats(&self) -> Option<&SummaryStats> {
        self.stats.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
