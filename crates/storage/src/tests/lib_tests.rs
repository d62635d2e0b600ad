use super::*;
use shared::domain::{ActivityId, ActivityKind, ActivityStatus, ReportId, ReportStatus};

fn report(id: i64) -> Report {
    Report {
        id: ReportId(id),
        date: "June 1, 2024".into(),
        time: "10:00 AM - 12:00 PM".into(),
        address: "9 Elm Road".into(),
        waste_type: "Organic Waste".into(),
        status: ReportStatus::Scheduled,
        quantity: Some("3 bags".into()),
        description: Some("garden clippings".into()),
        image_count: Some(0),
    }
}

fn activity(id: i64) -> Activity {
    Activity {
        id: ActivityId(id),
        kind: ActivityKind::Report,
        title: "Waste Reported".into(),
        description: "Organic Waste reported at 9 Elm Road".into(),
        date: "Just now".into(),
        status: Some(ActivityStatus::Pending),
    }
}

#[tokio::test]
async fn new_session_starts_with_sample_records() {
    let provider = ReportProvider::new();
    let store = provider.store();
    assert_eq!(store.reports().await.expect("reports").len(), 3);
    assert_eq!(store.activities().await.expect("activities").len(), 4);
}

#[tokio::test]
async fn add_report_prepends_and_grows_by_one() {
    let provider = ReportProvider::new();
    let store = provider.store();
    let before = store.report_count().await.expect("count");

    store.add_report(report(1_000)).await.expect("add");

    let reports = store.reports().await.expect("reports");
    assert_eq!(reports.len(), before + 1);
    assert_eq!(reports[0], report(1_000));
}

#[tokio::test]
async fn add_activity_prepends_and_grows_by_one() {
    let provider = ReportProvider::empty();
    let store = provider.store();

    store.add_activity(activity(1)).await.expect("first");
    store.add_activity(activity(2)).await.expect("second");

    let activities = store.activities().await.expect("activities");
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0].id, ActivityId(2));
    assert_eq!(activities[1].id, ActivityId(1));
}

#[tokio::test]
async fn paired_insert_publishes_both_events() {
    let provider = ReportProvider::empty();
    let mut events = provider.subscribe();
    let store = provider.store();

    store
        .add_report_with_activity(report(5), activity(5))
        .await
        .expect("add pair");

    assert!(matches!(
        events.recv().await.expect("event"),
        StoreEvent::ReportAdded { report } if report.id == ReportId(5)
    ));
    assert!(matches!(
        events.recv().await.expect("event"),
        StoreEvent::ActivityAdded { activity } if activity.id == ActivityId(5)
    ));
}

#[tokio::test]
async fn handle_fails_once_provider_is_gone() {
    let provider = ReportProvider::new();
    let store = provider.store();
    assert!(store.is_attached());
    drop(provider);

    assert!(!store.is_attached());
    let err = store.reports().await.expect_err("provider dropped");
    assert_eq!(err, StoreError::ProviderMissing);
    assert_eq!(err.to_string(), "report store used without a provider");
}

#[tokio::test]
async fn detached_handle_rejects_writes() {
    let store = ReportStore::detached();
    let err = store.add_report(report(1)).await.expect_err("detached");
    assert_eq!(err, StoreError::ProviderMissing);
    assert!(store.next_id().is_err());
}

#[test]
fn id_clock_is_strictly_increasing() {
    let clock = IdClock::default();
    let ids: Vec<i64> = (0..100).map(|_| clock.next()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(ids[0] >= Utc::now().timestamp_millis() - 1_000);
}
