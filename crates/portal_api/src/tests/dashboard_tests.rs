use std::sync::Arc;

use super::*;
use crate::transport::SimulatedTransport;
use shared::domain::{ActivityId, ActivityKind, ReportId};
use storage::{seed_activities, seed_reports, ReportProvider, ReportStore};

#[test]
fn summary_counts_sample_session() {
    let summary = summarize(&seed_reports(), &seed_activities());
    assert_eq!(
        summary,
        DashboardSummary {
            total_reports: 3,
            scheduled: 2,
            in_transit: 1,
            completed: 0,
            pending_activities: 1,
            images_attached: 0,
        }
    );
}

#[test]
fn completed_reports_are_not_upcoming() {
    let mut reports = seed_reports();
    reports[0].status = ReportStatus::Completed;
    let upcoming = upcoming_pickups(&reports);
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].report.id, ReportId(2));
    assert_eq!(upcoming[0].track, Route::TrackDetail("2".into()));
}

#[test]
fn feed_flags_fresh_entries() {
    let mut activities = seed_activities();
    activities.insert(
        0,
        Activity {
            id: ActivityId(99),
            kind: ActivityKind::Report,
            title: "Waste Reported".into(),
            description: "Organic Waste reported at Test St".into(),
            date: "Just now".into(),
            status: None,
        },
    );
    let feed = activity_feed(&activities);
    assert!(feed[0].fresh);
    assert!(feed[0].badge.is_none());
    assert_eq!(feed[0].icon, Icon::Trash);
    assert!(feed[1..].iter().all(|entry| !entry.fresh));
}

#[tokio::test]
async fn dashboard_requires_a_live_store() {
    let ctx = ApiContext::new(ReportStore::detached(), Arc::new(SimulatedTransport::instant()));
    let err = load_dashboard(&ctx).await.expect_err("no provider");
    assert!(matches!(err, PortalError::Store(_)));

    let provider = ReportProvider::new();
    let ctx = ApiContext::new(provider.store(), Arc::new(SimulatedTransport::instant()));
    let view = load_dashboard(&ctx).await.expect("dashboard");
    assert_eq!(view.upcoming.len(), 3);
    assert_eq!(view.activities.len(), 4);
}

#[tokio::test]
async fn dashboard_serializes_with_wire_names() {
    let provider = ReportProvider::new();
    let ctx = ApiContext::new(provider.store(), Arc::new(SimulatedTransport::instant()));
    let view = load_dashboard(&ctx).await.expect("dashboard");

    let value = serde_json::to_value(&view).expect("json");
    assert_eq!(value["summary"]["scheduled"], 2);
    assert_eq!(value["upcoming"][2]["report"]["status"], "in-transit");
    assert_eq!(
        value["upcoming"][0]["track"],
        serde_json::json!({ "view": "track_detail", "id": "1" })
    );
    assert_eq!(value["activities"][0]["activity"]["type"], "report");
    assert_eq!(value["activities"][0]["fresh"], false);
}
