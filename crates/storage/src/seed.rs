use shared::{
    domain::{ActivityId, ActivityKind, ActivityStatus, ReportId, ReportStatus},
    protocol::{Activity, Report},
};

fn sample_report(
    id: i64,
    date: &str,
    time: &str,
    address: &str,
    waste_type: &str,
    status: ReportStatus,
) -> Report {
    Report {
        id: ReportId(id),
        date: date.into(),
        time: time.into(),
        address: address.into(),
        waste_type: waste_type.into(),
        status,
        quantity: None,
        description: None,
        image_count: None,
    }
}

pub fn seed_reports() -> Vec<Report> {
    vec![
        sample_report(
            1,
            "May 15, 2023",
            "10:00 AM - 12:00 PM",
            "123 Main St, Apt 4B, Eco City",
            "Recyclables (Paper, Plastic)",
            ReportStatus::Scheduled,
        ),
        sample_report(
            2,
            "May 20, 2023",
            "2:00 PM - 4:00 PM",
            "45 Park Avenue, Suite 301, Eco City",
            "Electronic Waste",
            ReportStatus::Scheduled,
        ),
        sample_report(
            3,
            "May 22, 2023",
            "9:00 AM - 11:00 AM",
            "78 Green Street, Eco City",
            "Organic Waste",
            ReportStatus::InTransit,
        ),
    ]
}

pub fn seed_activities() -> Vec<Activity> {
    let entry = |id: i64, kind, title: &str, description: &str, date: &str, status| Activity {
        id: ActivityId(id),
        kind,
        title: title.into(),
        description: description.into(),
        date: date.into(),
        status: Some(status),
    };

    vec![
        entry(
            1,
            ActivityKind::Report,
            "Waste Reported",
            "Plastic and paper waste reported at 123 Main St",
            "2 hours ago",
            ActivityStatus::Pending,
        ),
        entry(
            2,
            ActivityKind::Schedule,
            "Pickup Scheduled",
            "Pickup scheduled for electronic waste",
            "5 hours ago",
            ActivityStatus::InProgress,
        ),
        entry(
            3,
            ActivityKind::Pickup,
            "Waste Collected",
            "Organic waste collected from 45 Park Avenue",
            "Yesterday",
            ActivityStatus::InProgress,
        ),
        entry(
            4,
            ActivityKind::Complete,
            "Disposal Completed",
            "Hazardous waste properly disposed",
            "2 days ago",
            ActivityStatus::Completed,
        ),
    ]
}
