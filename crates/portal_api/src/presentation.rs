use serde::{Deserialize, Serialize};
use shared::domain::{ActivityKind, ActivityStatus, PickupStatus, ReportStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Amber,
    Sky,
    Blue,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

impl Badge {
    const fn new(label: &'static str, tone: BadgeTone) -> Self {
        Self { label, tone }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Trash,
    Calendar,
    Truck,
    CheckCircle,
}

pub fn pickup_badge(status: PickupStatus) -> Badge {
    match status {
        PickupStatus::Scheduled => Badge::new("Scheduled", BadgeTone::Amber),
        PickupStatus::Confirmed => Badge::new("Confirmed", BadgeTone::Sky),
        PickupStatus::InTransit => Badge::new("In Transit", BadgeTone::Blue),
        PickupStatus::Completed => Badge::new("Completed", BadgeTone::Green),
    }
}

pub fn report_badge(status: ReportStatus) -> Badge {
    match status {
        ReportStatus::Scheduled => Badge::new("Scheduled", BadgeTone::Amber),
        ReportStatus::InTransit => Badge::new("In Transit", BadgeTone::Blue),
        ReportStatus::Completed => Badge::new("Completed", BadgeTone::Green),
    }
}

/// Activities without a status carry no badge.
pub fn activity_badge(status: Option<ActivityStatus>) -> Option<Badge> {
    let badge = match status? {
        ActivityStatus::Pending => Badge::new("Pending", BadgeTone::Amber),
        ActivityStatus::InProgress => Badge::new("In Progress", BadgeTone::Blue),
        ActivityStatus::Completed => Badge::new("Completed", BadgeTone::Green),
    };
    Some(badge)
}

pub fn activity_icon(kind: ActivityKind) -> Icon {
    match kind {
        ActivityKind::Report => Icon::Trash,
        ActivityKind::Schedule => Icon::Calendar,
        ActivityKind::Pickup => Icon::Truck,
        ActivityKind::Complete => Icon::CheckCircle,
    }
}

/// Labels shown under the tracker's progress bar.
pub fn stage_labels() -> [&'static str; 4] {
    PickupStatus::ALL.map(PickupStatus::label)
}
