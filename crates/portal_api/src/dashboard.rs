use serde::Serialize;
use shared::{
    domain::{ActivityStatus, ReportStatus},
    protocol::{Activity, Report, Route},
};

use crate::{
    error::PortalError,
    presentation::{activity_badge, activity_icon, report_badge, Badge, Icon},
    ApiContext,
};

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingPickup {
    pub report: Report,
    pub badge: Badge,
    pub track: Route,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub activity: Activity,
    pub icon: Icon,
    pub badge: Option<Badge>,
    pub fresh: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_reports: usize,
    pub scheduled: usize,
    pub in_transit: usize,
    pub completed: usize,
    pub pending_activities: usize,
    pub images_attached: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    pub upcoming: Vec<UpcomingPickup>,
    pub activities: Vec<ActivityEntry>,
}

pub fn summarize(reports: &[Report], activities: &[Activity]) -> DashboardSummary {
    let mut summary = DashboardSummary {
        total_reports: reports.len(),
        ..DashboardSummary::default()
    };
    for report in reports {
        match report.status {
            ReportStatus::Scheduled => summary.scheduled += 1,
            ReportStatus::InTransit => summary.in_transit += 1,
            ReportStatus::Completed => summary.completed += 1,
        }
        summary.images_attached += report.image_count.unwrap_or(0);
    }
    summary.pending_activities = activities
        .iter()
        .filter(|activity| activity.status == Some(ActivityStatus::Pending))
        .count();
    summary
}

/// Reports still waiting on collection, newest first.
pub fn upcoming_pickups(reports: &[Report]) -> Vec<UpcomingPickup> {
    reports
        .iter()
        .filter(|report| report.status != ReportStatus::Completed)
        .map(|report| UpcomingPickup {
            report: report.clone(),
            badge: report_badge(report.status),
            track: Route::TrackDetail(report.id.0.to_string()),
        })
        .collect()
}

pub fn activity_feed(activities: &[Activity]) -> Vec<ActivityEntry> {
    activities
        .iter()
        .map(|activity| ActivityEntry {
            activity: activity.clone(),
            icon: activity_icon(activity.kind),
            badge: activity_badge(activity.status),
            fresh: activity.is_fresh(),
        })
        .collect()
}

pub async fn load_dashboard(ctx: &ApiContext) -> Result<DashboardView, PortalError> {
    let reports = ctx.store.reports().await?;
    let activities = ctx.store.activities().await?;
    Ok(DashboardView {
        summary: summarize(&reports, &activities),
        upcoming: upcoming_pickups(&reports),
        activities: activity_feed(&activities),
    })
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
