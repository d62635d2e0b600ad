use std::{fmt, time::Duration};

use async_trait::async_trait;
use tracing::debug;

use crate::error::PortalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SubmitReport,
    SchedulePickup,
    TrackSearch,
    TrackDetail,
}

impl Operation {
    fn is_submission(self) -> bool {
        matches!(self, Operation::SubmitReport | Operation::SchedulePickup)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::SubmitReport => "submit_report",
            Operation::SchedulePickup => "schedule_pickup",
            Operation::TrackSearch => "track_search",
            Operation::TrackDetail => "track_detail",
        };
        f.write_str(name)
    }
}

/// Stand-in for the remote side of every flow. A flow calls it exactly once
/// per user action and never retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, operation: Operation) -> Result<(), PortalError>;
}

/// Resolves every call after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedTransport {
    submit_delay: Duration,
    lookup_delay: Duration,
}

impl SimulatedTransport {
    pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1500);
    pub const DEFAULT_LOOKUP_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(submit_delay: Duration, lookup_delay: Duration) -> Self {
        Self {
            submit_delay,
            lookup_delay,
        }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn delay_for(&self, operation: Operation) -> Duration {
        if operation.is_submission() {
            self.submit_delay
        } else {
            self.lookup_delay
        }
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SUBMIT_DELAY, Self::DEFAULT_LOOKUP_DELAY)
    }
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn round_trip(&self, operation: Operation) -> Result<(), PortalError> {
        let delay = self.delay_for(operation);
        debug!(%operation, delay_ms = delay.as_millis() as u64, "simulated round trip");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}
