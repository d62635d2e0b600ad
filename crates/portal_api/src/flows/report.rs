use chrono::{Local, NaiveDate};
use serde::Serialize;
use shared::{
    domain::{
        waste_type_label, ActivityId, ActivityKind, ActivityStatus, ReportId, ReportStatus,
        DEFAULT_TIME_SLOT, JUST_NOW,
    },
    protocol::{Activity, FlowOutcome, Notification, Report, Route, SubmitReportRequest},
};
use tracing::info;

use super::{failure_notification, missing_fields, PendingSubmission};
use crate::{error::PortalError, transport::Operation, uploads::FileStaging, ApiContext};

const LOCATION_PREVIEW_CHARS: usize = 30;
const QUANTITY_NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedReport {
    pub report: Report,
    pub activity: Activity,
}

pub fn validate_report(request: &SubmitReportRequest) -> Result<(), PortalError> {
    let missing = missing_fields([
        ("waste_type", request.waste_type.as_str()),
        ("location", request.location.as_str()),
        ("description", request.description.as_str()),
    ]);
    if !missing.is_empty() {
        return Err(PortalError::MissingFields(missing));
    }

    if let Some(quantity) = quantity_value(request) {
        match quantity.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => {}
            _ => {
                return Err(PortalError::InvalidField {
                    field: "quantity",
                    reason: format!("'{quantity}' is not a non-negative number"),
                })
            }
        }
    }
    Ok(())
}

fn quantity_value(request: &SubmitReportRequest) -> Option<&str> {
    request
        .quantity
        .as_deref()
        .map(str::trim)
        .filter(|quantity| !quantity.is_empty())
}

pub async fn submit_report(
    ctx: &ApiContext,
    request: SubmitReportRequest,
) -> Result<SubmittedReport, PortalError> {
    submit_report_on(ctx, request, Local::now().date_naive()).await
}

/// Validates, waits on the transport, then prepends the report and its
/// activity in one store operation. Nothing is written when any step fails.
pub async fn submit_report_on(
    ctx: &ApiContext,
    request: SubmitReportRequest,
    today: NaiveDate,
) -> Result<SubmittedReport, PortalError> {
    validate_report(&request)?;

    let mut staging = FileStaging::new(ctx.uploads.clone());
    let staged = staging.stage(request.files.clone());
    if let Some(rejection) = staged.rejections.first() {
        return Err(PortalError::InvalidField {
            field: "files",
            reason: rejection.notification().description,
        });
    }

    info!(
        waste_type = %request.waste_type,
        images = staging.len(),
        "submitting waste report"
    );
    ctx.transport.round_trip(Operation::SubmitReport).await?;

    let id = ctx.store.next_id()?;
    let label = waste_type_label(request.waste_type.trim());
    let location = request.location.trim();

    let report = Report {
        id: ReportId(id),
        date: format_report_date(today),
        time: DEFAULT_TIME_SLOT.into(),
        address: location.into(),
        waste_type: label.clone(),
        status: ReportStatus::Scheduled,
        quantity: Some(
            quantity_value(&request)
                .map(|quantity| format!("{quantity} {}", request.unit.as_str()))
                .unwrap_or_else(|| QUANTITY_NOT_SPECIFIED.into()),
        ),
        description: Some(request.description.trim().into()),
        image_count: Some(staging.len() as u32),
    };

    let activity = Activity {
        id: ActivityId(ctx.store.next_id()?),
        kind: ActivityKind::Report,
        title: "Waste Reported".into(),
        description: format!("{label} reported at {}", location_preview(location)),
        date: JUST_NOW.into(),
        status: Some(ActivityStatus::Pending),
    };

    ctx.store
        .add_report_with_activity(report.clone(), activity.clone())
        .await?;
    info!(report_id = id, "waste report stored");

    Ok(SubmittedReport { report, activity })
}

pub fn spawn_report_submission(
    ctx: ApiContext,
    request: SubmitReportRequest,
) -> PendingSubmission<SubmittedReport> {
    PendingSubmission::spawn(async move { submit_report(&ctx, request).await })
}

pub fn report_outcome(result: &Result<SubmittedReport, PortalError>) -> FlowOutcome {
    match result {
        Ok(_) => FlowOutcome {
            notification: Some(Notification::info(
                "Report submitted successfully",
                "Your waste report has been submitted for processing.",
            )),
            redirect: Some(Route::Dashboard),
        },
        Err(err) => FlowOutcome {
            notification: failure_notification(
                err,
                "Submission failed",
                "There was an error submitting your report. Please try again.",
            ),
            redirect: None,
        },
    }
}

/// "May 15, 2023" style date used on reports.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn location_preview(location: &str) -> String {
    if location.chars().count() > LOCATION_PREVIEW_CHARS {
        let head: String = location.chars().take(LOCATION_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        location.to_string()
    }
}
