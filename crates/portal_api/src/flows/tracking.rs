use shared::protocol::{FlowOutcome, Notification, Route, TrackSearchRequest};
use tracing::{info, warn};

use super::PendingSubmission;
use crate::{error::PortalError, tracker::TrackingView, transport::Operation, ApiContext};

/// Resolves a typed-in tracking id to the id of a known pickup.
pub async fn search_tracking(
    ctx: &ApiContext,
    request: TrackSearchRequest,
) -> Result<String, PortalError> {
    let tracking_id = request.tracking_id.trim();
    if tracking_id.is_empty() {
        return Err(PortalError::MissingFields(vec!["tracking_id"]));
    }

    ctx.transport.round_trip(Operation::TrackSearch).await?;

    if ctx.tracker.contains(tracking_id) {
        info!(%tracking_id, "tracking id found");
        Ok(tracking_id.to_string())
    } else {
        info!(%tracking_id, "tracking id not found");
        Err(PortalError::TrackingNotFound(tracking_id.to_string()))
    }
}

pub async fn load_tracking(ctx: &ApiContext, id: &str) -> Result<TrackingView, PortalError> {
    ctx.transport.round_trip(Operation::TrackDetail).await?;
    let pickup = ctx.tracker.lookup_pickup(id)?;
    Ok(TrackingView::new(pickup.clone()))
}

pub fn spawn_tracking_search(
    ctx: ApiContext,
    request: TrackSearchRequest,
) -> PendingSubmission<String> {
    PendingSubmission::spawn(async move { search_tracking(&ctx, request).await })
}

pub fn spawn_tracking_load(ctx: ApiContext, id: String) -> PendingSubmission<TrackingView> {
    PendingSubmission::spawn(async move { load_tracking(&ctx, &id).await })
}

pub fn search_outcome(result: &Result<String, PortalError>) -> FlowOutcome {
    let notification = match result {
        Ok(id) => {
            return FlowOutcome {
                notification: None,
                redirect: Some(Route::TrackDetail(id.clone())),
            }
        }
        Err(PortalError::Cancelled) => None,
        Err(PortalError::MissingFields(_)) => Some(Notification::destructive(
            "Please enter a tracking ID",
            "Tracking ID is required to search for your pickup.",
        )),
        Err(PortalError::TrackingNotFound(_)) => Some(Notification::destructive(
            "Tracking ID not found",
            "The tracking ID you entered could not be found. Please check and try again.",
        )),
        Err(_) => Some(Notification::destructive(
            "Search failed",
            "There was an error searching for the tracking ID. Please try again.",
        )),
    };
    FlowOutcome {
        notification,
        redirect: None,
    }
}

/// A miss sends the caller back to the search view; other failures leave it
/// on a "not found" card.
pub fn detail_outcome(result: &Result<TrackingView, PortalError>) -> FlowOutcome {
    match result {
        Ok(_) | Err(PortalError::Cancelled) => FlowOutcome {
            notification: None,
            redirect: None,
        },
        Err(PortalError::TrackingNotFound(_)) => FlowOutcome {
            notification: None,
            redirect: Some(Route::TrackSearch),
        },
        Err(err) => {
            warn!(%err, "failed to load pickup details");
            FlowOutcome {
                notification: Some(Notification::destructive(
                    "Pickup not found",
                    "The requested pickup could not be found.",
                )),
                redirect: None,
            }
        }
    }
}
