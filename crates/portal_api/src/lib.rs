use std::sync::Arc;

use storage::ReportStore;

pub mod dashboard;
pub mod error;
pub mod flows;
pub mod presentation;
pub mod tracker;
pub mod transport;
pub mod uploads;

pub use error::PortalError;
pub use flows::PendingSubmission;
pub use tracker::{PickupTracker, TrackingView};
pub use transport::{Operation, SimulatedTransport, Transport};
pub use uploads::{FileStaging, UploadPolicy};

/// Everything a flow needs, passed explicitly to each call.
#[derive(Clone)]
pub struct ApiContext {
    pub store: ReportStore,
    pub tracker: Arc<PickupTracker>,
    pub transport: Arc<dyn Transport>,
    pub uploads: UploadPolicy,
}

impl ApiContext {
    pub fn new(store: ReportStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            tracker: Arc::new(PickupTracker::with_samples()),
            transport,
            uploads: UploadPolicy::default(),
        }
    }

    pub fn with_tracker(mut self, tracker: PickupTracker) -> Self {
        self.tracker = Arc::new(tracker);
        self
    }

    pub fn with_upload_policy(mut self, uploads: UploadPolicy) -> Self {
        self.uploads = uploads;
        self
    }
}
