//! Dashboard Service - two-phase load cycle
//!
//! Phase 1 loads the summary statistics and must succeed. Phase 2 loads the
//! five secondary sections on a best-effort basis; a failing section is
//! logged and reported but does not stop the others.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashboard_telemetry::log_cycle_event;
use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::{Mutex, RwLock};

use crate::client::QueryClient;
use crate::domain::{
    ClientUsage, DashboardConfig, EditionBreakdown, Endpoint, ExpiringLicense, LoadEvent,
    LoadLifecycle, LoadPhase, ModuleUsage, SecondaryDispatch, SummaryStats, TrendPoint, ViewState,
};
use crate::error::{DashboardError, DashboardResult, QueryResult, RemoteQueryError};
use crate::metrics;
use crate::ports::RpcTransport;
use crate::render::{
    render_editions, render_error_banner, render_expiring_licenses, render_summary,
    render_top_clients, render_top_modules, render_trends, OutputTargets, Slot,
};

/// Secondary dashboard section, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Editions,
    Trends,
    TopClients,
    TopModules,
    ExpiringLicenses,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Editions,
        Section::Trends,
        Section::TopClients,
        Section::TopModules,
        Section::ExpiringLicenses,
    ];

    /// Backend operation feeding this section.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Section::Editions => Endpoint::LicenseByEdition,
            Section::Trends => Endpoint::LicenseTrends,
            Section::TopClients => Endpoint::LicenseByClient,
            Section::TopModules => Endpoint::ModuleUsage,
            Section::ExpiringLicenses => Endpoint::ExpiringLicenses,
        }
    }

    /// Display slot receiving the rendered table body.
    pub fn slot(&self) -> Slot {
        match self {
            Section::Editions => Slot::LicenseEditions,
            Section::Trends => Slot::LicenseTrends,
            Section::TopClients => Slot::TopClients,
            Section::TopModules => Slot::TopModules,
            Section::ExpiringLicenses => Slot::ExpiringLicenses,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slot().name())
    }
}

/// Decoded data of one secondary section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    Editions(EditionBreakdown),
    Trends(Vec<TrendPoint>),
    TopClients(Vec<ClientUsage>),
    TopModules(Vec<ModuleUsage>),
    ExpiringLicenses(Vec<ExpiringLicense>),
}

impl SectionData {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        match self {
            SectionData::Editions(editions) => editions.0.len(),
            SectionData::Trends(points) => points.len(),
            SectionData::TopClients(clients) => clients.len(),
            SectionData::TopModules(modules) => modules.len(),
            SectionData::ExpiringLicenses(licenses) => licenses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the table body for this section.
    pub fn render(&self, expiring_horizon_days: u32) -> String {
        match self {
            SectionData::Editions(editions) => render_editions(&editions.0),
            SectionData::Trends(points) => render_trends(points),
            SectionData::TopClients(clients) => render_top_clients(clients),
            SectionData::TopModules(modules) => render_top_modules(modules),
            SectionData::ExpiringLicenses(licenses) => {
                render_expiring_licenses(licenses, expiring_horizon_days)
            }
        }
    }
}

/// What happened to one secondary section.
#[derive(Debug, Clone)]
pub enum SectionStatus {
    /// Rendered with this many data rows (0 means the placeholder)
    Rendered { rows: usize },
    /// Query failed; the slot keeps its previous content
    Failed(RemoteQueryError),
    /// Dashboard was unmounted; nothing was written
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SectionReport {
    pub section: Section,
    pub status: SectionStatus,
}

impl SectionReport {
    pub fn is_rendered(&self) -> bool {
        matches!(self.status, SectionStatus::Rendered { .. })
    }
}

/// Summary of a completed cycle.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub stats: SummaryStats,
    /// One entry per section, in load order
    pub sections: Vec<SectionReport>,
    pub completed_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn section(&self, section: Section) -> Option<&SectionReport> {
        self.sections.iter().find(|r| r.section == section)
    }

    pub fn failed_sections(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections
            .iter()
            .filter(|r| matches!(r.status, SectionStatus::Failed(_)))
    }

    /// Every section rendered.
    pub fn is_complete(&self) -> bool {
        self.sections.iter().all(SectionReport::is_rendered)
    }
}

/// Result of one load cycle.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// Summary loaded; see the report for the secondary sections
    Ready(LoadReport),
    /// Summary query failed; phase 2 never started
    Failed { error: RemoteQueryError },
}

impl LoadOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadOutcome::Ready(_))
    }

    pub fn report(&self) -> Option<&LoadReport> {
        match self {
            LoadOutcome::Ready(report) => Some(report),
            LoadOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&RemoteQueryError> {
        match self {
            LoadOutcome::Ready(_) => None,
            LoadOutcome::Failed { error } => Some(error),
        }
    }
}

/// Shared "still mounted" flag.
///
/// Cloned into whatever tears the dashboard down. After [`MountHandle::unmount`]
/// in-flight queries still complete, but nothing more is rendered and no new
/// query is issued.
#[derive(Debug, Clone)]
pub struct MountHandle(Arc<AtomicBool>);

impl MountHandle {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Clears the in-flight flag when the cycle ends, including on early return.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Dashboard aggregator.
pub struct DashboardService<T: RpcTransport> {
    config: DashboardConfig,
    client: QueryClient<T>,
    targets: OutputTargets,
    view: RwLock<ViewState>,
    lifecycle: Mutex<LoadLifecycle>,
    in_flight: AtomicBool,
    mount: MountHandle,
}

impl<T: RpcTransport> DashboardService<T> {
    /// Create a dashboard. The configuration is validated here.
    pub fn new(
        config: DashboardConfig,
        transport: T,
        targets: OutputTargets,
    ) -> DashboardResult<Self> {
        config.validate()?;

        Ok(Self {
            client: QueryClient::new(transport, &config),
            config,
            targets,
            view: RwLock::new(ViewState::new()),
            lifecycle: Mutex::new(LoadLifecycle::new()),
            in_flight: AtomicBool::new(false),
            mount: MountHandle::new(),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn client(&self) -> &QueryClient<T> {
        &self.client
    }

    /// Snapshot of the view state.
    pub fn view_state(&self) -> ViewState {
        self.view.read().clone()
    }

    pub fn phase(&self) -> LoadPhase {
        self.lifecycle.lock().phase()
    }

    /// Completed cycles and how many of them failed.
    pub fn cycle_counts(&self) -> (u64, u64) {
        let lifecycle = self.lifecycle.lock();
        (lifecycle.cycles(), lifecycle.failures())
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    /// Run one load cycle.
    ///
    /// Returns `Err` only when the cycle cannot start (unmounted, or another
    /// cycle in flight). Query failures are reported in the outcome.
    pub async fn load(&self) -> DashboardResult<LoadOutcome> {
        if !self.mount.is_mounted() {
            return Err(DashboardError::Unmounted);
        }
        let _in_flight =
            InFlightGuard::acquire(&self.in_flight).ok_or(DashboardError::LoadInProgress)?;

        let start = Instant::now();
        self.view.write().begin_load();
        let phase = self.transition(LoadEvent::Begin);
        log_cycle_event!(info, phase, "Load cycle started");

        // Phase 1: summary statistics
        let stats = match self.client.license_statistics().await {
            Ok(stats) => stats,
            Err(error) => {
                let phase = self.transition(LoadEvent::CriticalFailed);
                log_cycle_event!(
                    error,
                    phase,
                    "Summary statistics failed, skipping secondary sections",
                    kind = error.kind(),
                    error = %error
                );
                self.render(Slot::ErrorBanner, &render_error_banner(&error.to_string()));
                metrics::record_load_cycle("failed");
                return Ok(LoadOutcome::Failed { error });
            }
        };

        self.view.write().complete_load(stats);
        for (slot, markup) in render_summary(Some(&stats)) {
            self.render(slot, &markup);
        }
        self.render(Slot::ErrorBanner, "");
        let phase = self.transition(LoadEvent::CriticalLoaded);
        log_cycle_event!(debug, phase, "Summary statistics loaded", total = stats.total);

        // Phase 2: secondary sections
        let sections = match self.config.load.secondary_dispatch {
            SecondaryDispatch::Sequential => self.load_sequential().await,
            SecondaryDispatch::Concurrent => self.load_concurrent().await,
        };

        let phase = self.transition(LoadEvent::SecondarySettled);
        let elapsed = start.elapsed();
        let report = LoadReport {
            stats,
            sections,
            completed_at: Utc::now(),
            elapsed,
        };
        let failed = report.failed_sections().count();
        log_cycle_event!(
            info,
            phase,
            "Load cycle complete",
            failed_sections = failed,
            elapsed_ms = elapsed.as_millis() as u64
        );
        metrics::record_load_cycle(if failed == 0 { "ready" } else { "partial" });

        Ok(LoadOutcome::Ready(report))
    }

    /// One query at a time, in load order.
    async fn load_sequential(&self) -> Vec<SectionReport> {
        let mut reports = Vec::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            let status = if self.mount.is_mounted() {
                let result = self.fetch(section).await;
                self.settle(section, result)
            } else {
                SectionStatus::Discarded
            };
            reports.push(SectionReport { section, status });
        }
        reports
    }

    /// All queries at once; each section renders as soon as it arrives.
    async fn load_concurrent(&self) -> Vec<SectionReport> {
        if !self.mount.is_mounted() {
            return Section::ALL
                .into_iter()
                .map(|section| SectionReport {
                    section,
                    status: SectionStatus::Discarded,
                })
                .collect();
        }

        let mut pending: FuturesUnordered<_> = Section::ALL
            .into_iter()
            .map(|section| async move { (section, self.fetch(section).await) })
            .collect();

        let mut reports = Vec::with_capacity(Section::ALL.len());
        while let Some((section, result)) = pending.next().await {
            let status = self.settle(section, result);
            reports.push(SectionReport { section, status });
        }
        reports.sort_by_key(|r| r.section);
        reports
    }

    async fn fetch(&self, section: Section) -> QueryResult<SectionData> {
        let params = &self.config.queries;
        match section {
            Section::Editions => self
                .client
                .license_by_edition()
                .await
                .map(SectionData::Editions),
            Section::Trends => self
                .client
                .license_trends(params.trends_months)
                .await
                .map(SectionData::Trends),
            Section::TopClients => self
                .client
                .license_by_client(params.top_clients_limit)
                .await
                .map(SectionData::TopClients),
            Section::TopModules => self
                .client
                .module_usage()
                .await
                .map(SectionData::TopModules),
            Section::ExpiringLicenses => self
                .client
                .expiring_licenses(params.expiring_horizon_days)
                .await
                .map(SectionData::ExpiringLicenses),
        }
    }

    fn settle(&self, section: Section, result: QueryResult<SectionData>) -> SectionStatus {
        match result {
            Ok(_) if !self.mount.is_mounted() => SectionStatus::Discarded,
            Ok(data) => {
                let markup = data.render(self.config.queries.expiring_horizon_days);
                self.render(section.slot(), &markup);
                SectionStatus::Rendered { rows: data.len() }
            }
            Err(error) => {
                log_cycle_event!(
                    warn,
                    LoadPhase::LoadingSecondary,
                    "Secondary section failed",
                    section = %section,
                    kind = error.kind(),
                    error = %error
                );
                SectionStatus::Failed(error)
            }
        }
    }

    /// Write to a slot unless unmounted.
    fn render(&self, slot: Slot, markup: &str) {
        if self.mount.is_mounted() {
            self.targets.write(slot, markup);
        }
    }

    fn transition(&self, event: LoadEvent) -> LoadPhase {
        self.lifecycle.lock().process_event(event)
    }
}
