use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    domain::{ActivityKind, ActivityStatus, QuantityUnit, ReportStatus},
    protocol::{
        NotificationVariant, Route, SchedulePickupRequest, StagedFile, SubmitReportRequest,
        TrackSearchRequest,
    },
};
use storage::ReportProvider;

use super::{
    report::{report_outcome, spawn_report_submission, submit_report_on},
    schedule::{schedule_outcome, schedule_pickup_on},
    tracking::{detail_outcome, load_tracking, search_outcome, search_tracking},
    *,
};
use crate::{
    transport::{Operation, SimulatedTransport, Transport},
    ApiContext,
};

struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn round_trip(&self, operation: Operation) -> Result<(), PortalError> {
        Err(PortalError::Transport(format!("{operation} unreachable")))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("date")
}

fn context(provider: &ReportProvider) -> ApiContext {
    ApiContext::new(provider.store(), Arc::new(SimulatedTransport::instant()))
}

fn report_request(description: &str) -> SubmitReportRequest {
    SubmitReportRequest {
        waste_type: "organic".into(),
        location: "Test St".into(),
        description: description.into(),
        quantity: None,
        unit: QuantityUnit::Kg,
        files: Vec::new(),
    }
}

fn schedule_request() -> SchedulePickupRequest {
    SchedulePickupRequest {
        name: "Jamie Doe".into(),
        phone: "(123) 456-7890".into(),
        address: "78 Green Street".into(),
        waste_type: "electronic".into(),
        date: Some(NaiveDate::from_ymd_opt(2024, 6, 10).expect("date")),
        time_slot: "2:00 PM - 4:00 PM".into(),
        notes: None,
        urgent: false,
    }
}

#[tokio::test]
async fn organic_report_produces_report_and_fresh_activity() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);

    let submitted = submit_report_on(&ctx, report_request("leaves"), today())
        .await
        .expect("submit");

    assert_eq!(submitted.report.waste_type, "Organic Waste");
    assert_eq!(submitted.report.status, ReportStatus::Scheduled);
    assert_eq!(submitted.report.date, "June 1, 2024");
    assert_eq!(submitted.report.time, "10:00 AM - 12:00 PM");
    assert_eq!(submitted.report.quantity.as_deref(), Some("Not specified"));
    assert_eq!(submitted.report.image_count, Some(0));
    assert_eq!(submitted.activity.kind, ActivityKind::Report);
    assert_eq!(submitted.activity.date, "Just now");
    assert_eq!(submitted.activity.status, Some(ActivityStatus::Pending));
    assert_eq!(
        submitted.activity.description,
        "Organic Waste reported at Test St"
    );

    let reports = ctx.store.reports().await.expect("reports");
    let activities = ctx.store.activities().await.expect("activities");
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0], submitted.report);
    assert_eq!(activities[0], submitted.activity);
    assert!(submitted.activity.id.0 > submitted.report.id.0);
}

#[tokio::test]
async fn empty_description_is_rejected_before_any_write() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);

    let result = submit_report_on(&ctx, report_request("   "), today()).await;
    assert!(matches!(
        &result,
        Err(PortalError::MissingFields(fields)) if fields == &vec!["description"]
    ));
    assert_eq!(ctx.store.report_count().await.expect("count"), 3);
    assert_eq!(ctx.store.activity_count().await.expect("count"), 4);

    let outcome = report_outcome(&result);
    let notification = outcome.notification.expect("notification");
    assert_eq!(notification.title, "Incomplete form");
    assert_eq!(notification.variant, NotificationVariant::Destructive);
    assert!(outcome.redirect.is_none());
}

#[tokio::test]
async fn quantity_and_photos_are_recorded() {
    let provider = ReportProvider::empty();
    let ctx = context(&provider);
    let mut request = report_request("broken chairs");
    request.waste_type = "construction".into();
    request.quantity = Some("4".into());
    request.unit = QuantityUnit::Bags;
    request.location = "Unit 12, Riverside Industrial Estate, North Gate".into();
    request.files = vec![StagedFile {
        name: "pile.jpg".into(),
        size_bytes: 2048,
        mime_type: "image/jpeg".into(),
    }];

    let submitted = submit_report_on(&ctx, request, today()).await.expect("submit");
    assert_eq!(submitted.report.quantity.as_deref(), Some("4 bags"));
    assert_eq!(submitted.report.image_count, Some(1));
    assert_eq!(
        submitted.activity.description,
        "Construction Debris reported at Unit 12, Riverside Industrial ..."
    );
}

#[tokio::test]
async fn negative_quantity_and_bad_files_are_invalid() {
    let provider = ReportProvider::empty();
    let ctx = context(&provider);

    let mut request = report_request("tyres");
    request.quantity = Some("-2".into());
    let err = submit_report_on(&ctx, request, today()).await.expect_err("quantity");
    assert!(matches!(err, PortalError::InvalidField { field: "quantity", .. }));

    let mut request = report_request("tyres");
    request.files = vec![StagedFile {
        name: "scan.pdf".into(),
        size_bytes: 10,
        mime_type: "application/pdf".into(),
    }];
    let err = submit_report_on(&ctx, request, today()).await.expect_err("files");
    assert!(matches!(err, PortalError::InvalidField { field: "files", .. }));
    assert_eq!(ctx.store.report_count().await.expect("count"), 0);
}

#[tokio::test]
async fn transport_failure_reports_generic_error() {
    let provider = ReportProvider::new();
    let ctx = ApiContext::new(provider.store(), Arc::new(FailingTransport));

    let result = submit_report_on(&ctx, report_request("leaves"), today()).await;
    assert!(matches!(result, Err(PortalError::Transport(_))));
    assert_eq!(ctx.store.report_count().await.expect("count"), 3);

    let outcome = report_outcome(&result);
    assert_eq!(
        outcome.notification.map(|n| n.title),
        Some("Submission failed".to_string())
    );
}

#[tokio::test]
async fn successful_report_routes_to_dashboard() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);
    let result = submit_report_on(&ctx, report_request("leaves"), today()).await;
    let outcome = report_outcome(&result);
    assert_eq!(outcome.redirect, Some(Route::Dashboard));
    assert_eq!(
        outcome.notification.map(|n| n.title),
        Some("Report submitted successfully".to_string())
    );
}

#[tokio::test]
async fn dropped_submission_never_writes() {
    let provider = ReportProvider::new();
    let slow = SimulatedTransport::new(Duration::from_secs(30), Duration::from_secs(30));
    let ctx = ApiContext::new(provider.store(), Arc::new(slow));

    let pending = spawn_report_submission(ctx.clone(), report_request("leaves"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!pending.is_finished());
    drop(pending);
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(ctx.store.report_count().await.expect("count"), 3);
}

#[tokio::test]
async fn pending_submission_completes_when_awaited() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);

    let submitted = spawn_report_submission(ctx.clone(), report_request("leaves"))
        .wait()
        .await
        .expect("submitted");
    assert_eq!(
        ctx.store.reports().await.expect("reports")[0].id,
        submitted.report.id
    );
}

#[tokio::test]
async fn cancelled_submission_reports_nothing() {
    let provider = ReportProvider::new();
    let slow = SimulatedTransport::new(Duration::from_secs(30), Duration::from_secs(30));
    let ctx = ApiContext::new(provider.store(), Arc::new(slow));

    let pending = spawn_report_submission(ctx.clone(), report_request("leaves"));
    pending.cancel();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(ctx.store.report_count().await.expect("count"), 3);

    let outcome = report_outcome(&Err(PortalError::Cancelled));
    assert!(outcome.notification.is_none());
    assert!(outcome.redirect.is_none());
}

#[tokio::test]
async fn scheduling_prepends_activity_and_confirms_slot() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);

    let result = schedule_pickup_on(&ctx, schedule_request(), today()).await;
    let scheduled = result.as_ref().expect("scheduled");
    assert_eq!(scheduled.waste_type, "Electronic Waste");
    assert_eq!(scheduled.activity.kind, ActivityKind::Schedule);
    assert_eq!(
        ctx.store.activities().await.expect("activities")[0],
        scheduled.activity
    );
    assert_eq!(ctx.store.report_count().await.expect("count"), 3);

    let outcome = schedule_outcome(&result);
    assert_eq!(outcome.redirect, Some(Route::Dashboard));
    assert_eq!(
        outcome.notification.expect("notification").description,
        "Your pickup has been scheduled for June 10, 2024 at 2:00 PM - 4:00 PM."
    );
}

#[tokio::test]
async fn scheduling_lists_every_missing_field() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);
    let mut request = schedule_request();
    request.phone = String::new();
    request.date = None;

    let err = schedule_pickup_on(&ctx, request, today())
        .await
        .expect_err("missing");
    assert!(matches!(
        err,
        PortalError::MissingFields(ref fields) if fields == &vec!["phone", "date"]
    ));
    assert_eq!(ctx.store.activity_count().await.expect("count"), 4);
}

#[tokio::test]
async fn scheduling_enforces_booking_window_and_slots() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);

    let mut past = schedule_request();
    past.date = NaiveDate::from_ymd_opt(2024, 5, 31);
    let err = schedule_pickup_on(&ctx, past, today()).await.expect_err("past");
    assert!(matches!(err, PortalError::InvalidField { field: "date", .. }));

    let mut far = schedule_request();
    far.date = NaiveDate::from_ymd_opt(2024, 7, 2);
    let err = schedule_pickup_on(&ctx, far, today()).await.expect_err("far");
    assert!(matches!(err, PortalError::InvalidField { field: "date", .. }));

    let mut last_day = schedule_request();
    last_day.date = NaiveDate::from_ymd_opt(2024, 7, 1);
    schedule_pickup_on(&ctx, last_day, today())
        .await
        .expect("last bookable day");

    let mut odd_slot = schedule_request();
    odd_slot.time_slot = "6:00 PM - 8:00 PM".into();
    let err = schedule_pickup_on(&ctx, odd_slot, today())
        .await
        .expect_err("slot");
    assert!(matches!(err, PortalError::InvalidField { field: "time_slot", .. }));
}

#[tokio::test]
async fn search_routes_known_ids_to_detail() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);

    let result = search_tracking(
        &ctx,
        TrackSearchRequest {
            tracking_id: " 2 ".into(),
        },
    )
    .await;
    assert_eq!(result.as_deref().ok(), Some("2"));
    assert_eq!(
        search_outcome(&result).redirect,
        Some(Route::TrackDetail("2".into()))
    );
}

#[tokio::test]
async fn search_miss_and_blank_id_notify() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);

    let miss = search_tracking(
        &ctx,
        TrackSearchRequest {
            tracking_id: "999".into(),
        },
    )
    .await;
    let outcome = search_outcome(&miss);
    assert!(outcome.redirect.is_none());
    assert_eq!(
        outcome.notification.map(|n| n.title),
        Some("Tracking ID not found".to_string())
    );

    let blank = search_tracking(
        &ctx,
        TrackSearchRequest {
            tracking_id: "  ".into(),
        },
    )
    .await;
    assert_eq!(
        search_outcome(&blank).notification.map(|n| n.title),
        Some("Please enter a tracking ID".to_string())
    );
}

#[tokio::test]
async fn detail_miss_routes_back_to_search() {
    let provider = ReportProvider::new();
    let ctx = context(&provider);

    let view = load_tracking(&ctx, "3").await.expect("pickup 3");
    assert_eq!(view.pickup.progress, 75);
    assert!(view.driver.is_some());

    let miss = load_tracking(&ctx, "999").await;
    assert!(matches!(miss, Err(PortalError::TrackingNotFound(_))));
    assert_eq!(detail_outcome(&miss).redirect, Some(Route::TrackSearch));
}

#[test]
fn missing_fields_keeps_declared_order() {
    let missing = missing_fields([("a", ""), ("b", "x"), ("c", "  ")]);
    assert_eq!(missing, vec!["a", "c"]);
}
