use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Weak,
};

use chrono::Utc;
use shared::protocol::{Activity, Report, StoreEvent};
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

mod seed;

pub use seed::{seed_activities, seed_reports};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("report store used without a provider")]
    ProviderMissing,
}

pub type StoreResult<T> = Result<T, StoreError>;

struct StoreInner {
    reports: RwLock<Vec<Report>>,
    activities: RwLock<Vec<Activity>>,
    ids: IdClock,
    events: broadcast::Sender<StoreEvent>,
}

/// Owns the session's reports and activities.
///
/// Views never hold the provider itself; they receive [`ReportStore`] handles
/// which stop working once the provider is dropped.
pub struct ReportProvider {
    inner: Arc<StoreInner>,
}

impl ReportProvider {
    /// A session pre-filled with the sample reports and activities.
    pub fn new() -> Self {
        Self::with_records(seed_reports(), seed_activities())
    }

    pub fn empty() -> Self {
        Self::with_records(Vec::new(), Vec::new())
    }

    pub fn with_records(reports: Vec<Report>, activities: Vec<Activity>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                reports: RwLock::new(reports),
                activities: RwLock::new(activities),
                ids: IdClock::default(),
                events,
            }),
        }
    }

    pub fn store(&self) -> ReportStore {
        ReportStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }
}

impl Default for ReportProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a session store. Cheap to clone.
#[derive(Clone)]
pub struct ReportStore {
    inner: Weak<StoreInner>,
}

impl ReportStore {
    /// A handle with no provider behind it; every operation fails.
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    fn inner(&self) -> StoreResult<Arc<StoreInner>> {
        self.inner.upgrade().ok_or(StoreError::ProviderMissing)
    }

    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub async fn add_report(&self, report: Report) -> StoreResult<()> {
        let inner = self.inner()?;
        debug!(report_id = report.id.0, "prepending report");
        inner.reports.write().await.insert(0, report.clone());
        let _ = inner.events.send(StoreEvent::ReportAdded { report });
        Ok(())
    }

    pub async fn add_activity(&self, activity: Activity) -> StoreResult<()> {
        let inner = self.inner()?;
        debug!(activity_id = activity.id.0, "prepending activity");
        inner.activities.write().await.insert(0, activity.clone());
        let _ = inner.events.send(StoreEvent::ActivityAdded { activity });
        Ok(())
    }

    /// Prepends both records while holding both write locks, so readers never
    /// observe the report without its activity.
    pub async fn add_report_with_activity(
        &self,
        report: Report,
        activity: Activity,
    ) -> StoreResult<()> {
        let inner = self.inner()?;
        {
            let mut reports = inner.reports.write().await;
            let mut activities = inner.activities.write().await;
            reports.insert(0, report.clone());
            activities.insert(0, activity.clone());
        }
        debug!(
            report_id = report.id.0,
            activity_id = activity.id.0,
            "prepended report with activity"
        );
        let _ = inner.events.send(StoreEvent::ReportAdded { report });
        let _ = inner.events.send(StoreEvent::ActivityAdded { activity });
        Ok(())
    }

    pub async fn reports(&self) -> StoreResult<Vec<Report>> {
        let inner = self.inner()?;
        let reports = inner.reports.read().await;
        Ok(reports.clone())
    }

    pub async fn activities(&self) -> StoreResult<Vec<Activity>> {
        let inner = self.inner()?;
        let activities = inner.activities.read().await;
        Ok(activities.clone())
    }

    pub async fn report_count(&self) -> StoreResult<usize> {
        let inner = self.inner()?;
        let count = inner.reports.read().await.len();
        Ok(count)
    }

    pub async fn activity_count(&self) -> StoreResult<usize> {
        let inner = self.inner()?;
        let count = inner.activities.read().await.len();
        Ok(count)
    }

    /// Next record id for this session, derived from the wall clock.
    pub fn next_id(&self) -> StoreResult<i64> {
        Ok(self.inner()?.ids.next())
    }
}

/// Millisecond timestamps, bumped by one whenever the clock has not advanced
/// past the last id handed out.
#[derive(Default)]
pub struct IdClock {
    last: AtomicI64,
}

impl IdClock {
    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => current = observed,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
