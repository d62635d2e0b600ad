use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use shared::{
    domain::{waste_type_label, ActivityId, ActivityKind, ActivityStatus, JUST_NOW, TIME_SLOTS},
    protocol::{Activity, FlowOutcome, Notification, Route, SchedulePickupRequest},
};
use tracing::info;

use super::{failure_notification, missing_fields, report::format_report_date, PendingSubmission};
use crate::{error::PortalError, transport::Operation, ApiContext};

/// How far ahead a pickup may be booked.
pub const BOOKING_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledPickup {
    pub date: NaiveDate,
    pub time_slot: String,
    pub waste_type: String,
    pub urgent: bool,
    pub activity: Activity,
}

pub fn validate_schedule(
    request: &SchedulePickupRequest,
    today: NaiveDate,
) -> Result<NaiveDate, PortalError> {
    let mut missing = missing_fields([
        ("name", request.name.as_str()),
        ("phone", request.phone.as_str()),
        ("address", request.address.as_str()),
        ("waste_type", request.waste_type.as_str()),
    ]);
    if request.date.is_none() {
        missing.push("date");
    }
    if request.time_slot.trim().is_empty() {
        missing.push("time_slot");
    }
    let Some(date) = request.date.filter(|_| missing.is_empty()) else {
        return Err(PortalError::MissingFields(missing));
    };

    let last_day = today
        .checked_add_days(Days::new(BOOKING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);
    if date < today || date > last_day {
        return Err(PortalError::InvalidField {
            field: "date",
            reason: format!("pickup date must fall between {today} and {last_day}"),
        });
    }

    if !TIME_SLOTS.contains(&request.time_slot.trim()) {
        return Err(PortalError::InvalidField {
            field: "time_slot",
            reason: format!("'{}' is not an available time slot", request.time_slot),
        });
    }
    Ok(date)
}

pub async fn schedule_pickup(
    ctx: &ApiContext,
    request: SchedulePickupRequest,
) -> Result<ScheduledPickup, PortalError> {
    schedule_pickup_on(ctx, request, Local::now().date_naive()).await
}

pub async fn schedule_pickup_on(
    ctx: &ApiContext,
    request: SchedulePickupRequest,
    today: NaiveDate,
) -> Result<ScheduledPickup, PortalError> {
    let date = validate_schedule(&request, today)?;
    let time_slot = request.time_slot.trim().to_string();
    let label = waste_type_label(request.waste_type.trim());

    info!(%date, %time_slot, urgent = request.urgent, "scheduling pickup");
    ctx.transport.round_trip(Operation::SchedulePickup).await?;

    let mut description = format!("Pickup scheduled for {}", label.to_lowercase());
    if request.urgent {
        description.push_str(" (urgent)");
    }
    let activity = Activity {
        id: ActivityId(ctx.store.next_id()?),
        kind: ActivityKind::Schedule,
        title: "Pickup Scheduled".into(),
        description,
        date: JUST_NOW.into(),
        status: Some(ActivityStatus::Pending),
    };
    ctx.store.add_activity(activity.clone()).await?;

    Ok(ScheduledPickup {
        date,
        time_slot,
        waste_type: label,
        urgent: request.urgent,
        activity,
    })
}

pub fn spawn_pickup_scheduling(
    ctx: ApiContext,
    request: SchedulePickupRequest,
) -> PendingSubmission<ScheduledPickup> {
    PendingSubmission::spawn(async move { schedule_pickup(&ctx, request).await })
}

pub fn schedule_outcome(result: &Result<ScheduledPickup, PortalError>) -> FlowOutcome {
    match result {
        Ok(scheduled) => FlowOutcome {
            notification: Some(Notification::info(
                "Pickup scheduled successfully",
                format!(
                    "Your pickup has been scheduled for {} at {}.",
                    format_report_date(scheduled.date),
                    scheduled.time_slot
                ),
            )),
            redirect: Some(Route::Dashboard),
        },
        Err(err) => FlowOutcome {
            notification: failure_notification(
                err,
                "Scheduling failed",
                "There was an error scheduling your pickup. Please try again.",
            ),
            redirect: None,
        },
    }
}
