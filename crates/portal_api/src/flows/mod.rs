use std::future::Future;

use shared::protocol::Notification;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::PortalError;

pub mod report;
pub mod schedule;
pub mod tracking;

const INCOMPLETE_TITLE: &str = "Incomplete form";
const INCOMPLETE_DESCRIPTION: &str = "Please fill in all required fields.";

/// A flow running in the background on behalf of a view.
///
/// The task is aborted when the handle is cancelled or dropped, so a view
/// that goes away takes its unfinished submission with it.
pub struct PendingSubmission<T> {
    task: Option<JoinHandle<Result<T, PortalError>>>,
}

impl<T: Send + 'static> PendingSubmission<T> {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, PortalError>> + Send + 'static,
    {
        Self {
            task: Some(tokio::spawn(future)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub async fn wait(mut self) -> Result<T, PortalError> {
        let Some(task) = self.task.as_mut() else {
            return Err(PortalError::Cancelled);
        };
        let joined = task.await;
        self.task = None;
        match joined {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(PortalError::Cancelled),
            Err(err) => {
                warn!(%err, "submission task failed");
                Err(PortalError::Transport(format!("submission task failed: {err}")))
            }
        }
    }
}

impl<T> Drop for PendingSubmission<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Notification for a failed flow. Cancelled flows stay silent; validation
/// failures share one message; anything else gets the flow's own wording.
fn failure_notification(
    err: &PortalError,
    failure_title: &str,
    failure_description: &str,
) -> Option<Notification> {
    match err {
        PortalError::Cancelled => None,
        PortalError::MissingFields(_) => Some(Notification::destructive(
            INCOMPLETE_TITLE,
            INCOMPLETE_DESCRIPTION,
        )),
        PortalError::InvalidField { .. } => {
            Some(Notification::destructive("Invalid form", err.to_string()))
        }
        _ => Some(Notification::destructive(failure_title, failure_description)),
    }
}

/// Returns the names of required fields that are blank after trimming.
fn missing_fields<'a>(
    fields: impl IntoIterator<Item = (&'static str, &'a str)>,
) -> Vec<&'static str> {
    fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
}

#[cfg(test)]
#[path = "../tests/flows_tests.rs"]
mod tests;
