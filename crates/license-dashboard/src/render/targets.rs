//! Logical display slots and their injected sinks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::ports::RenderSink;

/// Stable logical names the host page binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    StatTotal,
    StatActive,
    StatExpired,
    StatExpiring,
    TopClients,
    TopModules,
    ExpiringLicenses,
    LicenseEditions,
    LicenseTrends,
    ErrorBanner,
}

impl Slot {
    pub const ALL: [Slot; 10] = [
        Slot::StatTotal,
        Slot::StatActive,
        Slot::StatExpired,
        Slot::StatExpiring,
        Slot::TopClients,
        Slot::TopModules,
        Slot::ExpiringLicenses,
        Slot::LicenseEditions,
        Slot::LicenseTrends,
        Slot::ErrorBanner,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Slot::StatTotal => "stat_total",
            Slot::StatActive => "stat_active",
            Slot::StatExpired => "stat_expired",
            Slot::StatExpiring => "stat_expiring",
            Slot::TopClients => "top_clients",
            Slot::TopModules => "top_modules",
            Slot::ExpiringLicenses => "expiring_licenses",
            Slot::LicenseEditions => "license_editions",
            Slot::LicenseTrends => "license_trends",
            Slot::ErrorBanner => "error_banner",
        }
    }

    pub fn from_name(name: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Scalar counter (as opposed to a table body or banner).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Slot::StatTotal | Slot::StatActive | Slot::StatExpired | Slot::StatExpiring
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from slot to sink, fixed at construction.
///
/// Writes to an unbound slot are skipped.
#[derive(Clone, Default)]
pub struct OutputTargets {
    sinks: HashMap<Slot, Arc<dyn RenderSink>>,
}

impl OutputTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one slot.
    pub fn bind(mut self, slot: Slot, sink: Arc<dyn RenderSink>) -> Self {
        self.sinks.insert(slot, sink);
        self
    }

    /// Bind every slot to the same sink.
    pub fn bind_all(mut self, sink: Arc<dyn RenderSink>) -> Self {
        for slot in Slot::ALL {
            self.sinks.insert(slot, Arc::clone(&sink));
        }
        self
    }

    pub fn is_bound(&self, slot: Slot) -> bool {
        self.sinks.contains_key(&slot)
    }

    /// Write `markup` to `slot`. Returns whether a sink accepted it.
    pub fn write(&self, slot: Slot, markup: &str) -> bool {
        let Some(sink) = self.sinks.get(&slot) else {
            return false;
        };

        match sink.write(slot, markup) {
            Ok(()) => true,
            Err(e) => {
                warn!(slot = %slot, error = %e, "Failed to write slot");
                false
            }
        }
    }
}

impl fmt::Debug for OutputTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<_> = self.sinks.keys().map(Slot::name).collect();
        bound.sort_unstable();
        f.debug_struct("OutputTargets").field("bound", &bound).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        writes: Mutex<Vec<(Slot, String)>>,
    }

    impl RenderSink for RecordingSink {
        fn write(&self, slot: Slot, markup: &str) -> std::io::Result<()> {
            self.writes.lock().push((slot, markup.to_string()));
            Ok(())
        }
    }

    struct BrokenSink;

    impl RenderSink for BrokenSink {
        fn write(&self, _slot: Slot, _markup: &str) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_slot_names_round_trip() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_name(slot.name()), Some(slot));
        }
        assert_eq!(Slot::from_name("stat_unknown"), None);
    }

    #[test]
    fn test_unbound_slot_skipped() {
        let sink = Arc::new(RecordingSink::default());
        let targets = OutputTargets::new().bind(Slot::TopClients, sink.clone());

        assert!(targets.write(Slot::TopClients, "<tr></tr>"));
        assert!(!targets.write(Slot::TopModules, "<tr></tr>"));
        assert_eq!(sink.writes.lock().len(), 1);
    }

    #[test]
    fn test_bind_all() {
        let sink = Arc::new(RecordingSink::default());
        let targets = OutputTargets::new().bind_all(sink.clone());
        for slot in Slot::ALL {
            assert!(targets.is_bound(slot));
        }
    }

    #[test]
    fn test_sink_error_reported_as_not_written() {
        let targets = OutputTargets::new().bind(Slot::ErrorBanner, Arc::new(BrokenSink));
        assert!(!targets.write(Slot::ErrorBanner, "x"));
    }

    #[test]
    fn test_scalar_slots() {
        let scalars: Vec<_> = Slot::ALL.into_iter().filter(Slot::is_scalar).collect();
        assert_eq!(scalars.len(), 4);
    }
}
