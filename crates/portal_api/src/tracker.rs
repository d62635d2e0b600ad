use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;
use shared::{
    domain::PickupStatus,
    protocol::{DriverAssignment, PickupDetails, StatusHistoryEntry},
};

use crate::{
    error::PortalError,
    presentation::{pickup_badge, stage_labels, Badge},
};

const RECEIVED_DESCRIPTION: &str = "Your pickup request has been received and is being processed.";
const CONFIRMED_DESCRIPTION: &str = "Your pickup has been confirmed and assigned to a driver.";
const IN_TRANSIT_DESCRIPTION: &str = "Driver is en route to your location for pickup.";
const COMPLETED_DESCRIPTION: &str = "Your waste has been collected and sent for processing.";

/// Closed table of tracked pickups, keyed by tracking id.
#[derive(Debug, Clone)]
pub struct PickupTracker {
    pickups: BTreeMap<String, PickupDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownPickup {
    pub id: String,
    pub waste_type: String,
}

impl PickupTracker {
    pub fn with_samples() -> Self {
        Self::from_rows(sample_rows())
    }

    /// Builds each row; rows that fail validation are logged and left out.
    pub fn from_rows(rows: Vec<PickupRecord<'_>>) -> Self {
        let records = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.to_string();
                row.build()
                    .inspect_err(|err| warn!(%id, %err, "skipping invalid pickup row"))
                    .ok()
            })
            .collect();
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<PickupDetails>) -> Self {
        let pickups = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self { pickups }
    }

    /// Exact-key lookup; there is no prefix or fuzzy matching.
    pub fn lookup_pickup(&self, id: &str) -> Result<&PickupDetails, PortalError> {
        self.pickups
            .get(id)
            .ok_or_else(|| PortalError::TrackingNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pickups.contains_key(id)
    }

    pub fn known_ids(&self) -> Vec<KnownPickup> {
        self.pickups
            .values()
            .map(|pickup| KnownPickup {
                id: pickup.id.clone(),
                waste_type: pickup.waste_type.clone(),
            })
            .collect()
    }
}

impl Default for PickupTracker {
    fn default() -> Self {
        Self::with_samples()
    }
}

/// Raw row of the pickup table.
pub struct PickupRecord<'a> {
    pub id: &'a str,
    pub status: PickupStatus,
    pub date: &'a str,
    pub time: &'a str,
    pub address: &'a str,
    pub waste_type: &'a str,
    pub driver: Option<DriverAssignment>,
    /// Timestamps for each history entry reached so far, oldest first.
    /// The first timestamp belongs to "Request Received".
    pub history_times: &'a [&'a str],
}

impl PickupRecord<'_> {
    /// Builds the details record, deriving progress and history descriptions
    /// from the status. Drivers are only kept once the pickup is in transit.
    pub fn build(self) -> Result<PickupDetails, PortalError> {
        let expected = self.status.stage() + 2;
        if self.history_times.len() != expected {
            return Err(PortalError::InvalidField {
                field: "status_history",
                reason: format!(
                    "{} status needs {expected} history entries, got {}",
                    self.status.label(),
                    self.history_times.len()
                ),
            });
        }

        let mut status_history = Vec::with_capacity(expected);
        status_history.push(StatusHistoryEntry {
            status: "Request Received".into(),
            time: self.history_times[0].into(),
            description: RECEIVED_DESCRIPTION.into(),
        });
        for (stage, time) in PickupStatus::ALL.iter().zip(&self.history_times[1..]) {
            let description = match stage {
                PickupStatus::Scheduled => format!(
                    "Your pickup has been scheduled for {} between {}.",
                    self.date,
                    self.time.replace(" - ", " and ")
                ),
                PickupStatus::Confirmed => CONFIRMED_DESCRIPTION.into(),
                PickupStatus::InTransit => IN_TRANSIT_DESCRIPTION.into(),
                PickupStatus::Completed => COMPLETED_DESCRIPTION.into(),
            };
            status_history.push(StatusHistoryEntry {
                status: stage.label().into(),
                time: (*time).into(),
                description,
            });
        }

        let driver = self
            .driver
            .filter(|_| self.status >= PickupStatus::InTransit);

        Ok(PickupDetails {
            id: self.id.into(),
            status: self.status,
            date: self.date.into(),
            time: self.time.into(),
            address: self.address.into(),
            waste_type: self.waste_type.into(),
            driver_name: driver.as_ref().map(|d| d.name.clone()),
            driver_phone: driver.as_ref().map(|d| d.phone.clone()),
            estimated_arrival: driver.map(|d| d.estimated_arrival),
            progress: self.status.progress(),
            status_history,
        })
    }
}

fn sample_rows() -> Vec<PickupRecord<'static>> {
    vec![
        PickupRecord {
            id: "1",
            status: PickupStatus::Scheduled,
            date: "May 15, 2023",
            time: "10:00 AM - 12:00 PM",
            address: "123 Main St, Apt 4B, Eco City",
            waste_type: "Recyclables (Paper, Plastic)",
            driver: None,
            history_times: &["May 10, 2023 - 11:23 AM", "May 10, 2023 - 11:45 AM"],
        },
        PickupRecord {
            id: "2",
            status: PickupStatus::Confirmed,
            date: "May 20, 2023",
            time: "2:00 PM - 4:00 PM",
            address: "45 Park Avenue, Suite 301, Eco City",
            waste_type: "Electronic Waste",
            driver: None,
            history_times: &[
                "May 15, 2023 - 09:12 AM",
                "May 15, 2023 - 09:30 AM",
                "May 18, 2023 - 02:15 PM",
            ],
        },
        PickupRecord {
            id: "3",
            status: PickupStatus::InTransit,
            date: "May 22, 2023",
            time: "9:00 AM - 11:00 AM",
            address: "78 Green Street, Eco City",
            waste_type: "Organic Waste",
            driver: Some(DriverAssignment {
                name: "Michael Johnson".into(),
                phone: "(555) 123-4567".into(),
                estimated_arrival: "9:45 AM".into(),
            }),
            history_times: &[
                "May 18, 2023 - 10:05 AM",
                "May 18, 2023 - 10:30 AM",
                "May 21, 2023 - 04:20 PM",
                "May 22, 2023 - 08:45 AM",
            ],
        },
    ]
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub status: String,
    pub time: String,
    pub description: String,
    pub is_current: bool,
}

/// Everything the tracking detail view shows for one pickup.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub pickup: PickupDetails,
    pub badge: Badge,
    pub stage_labels: [&'static str; 4],
    pub timeline: Vec<TimelineEntry>,
    pub driver: Option<DriverAssignment>,
    pub can_report_issue: bool,
}

impl TrackingView {
    pub fn new(pickup: PickupDetails) -> Self {
        let last = pickup.status_history.len().saturating_sub(1);
        let timeline = pickup
            .status_history
            .iter()
            .enumerate()
            .map(|(index, entry)| TimelineEntry {
                status: entry.status.clone(),
                time: entry.time.clone(),
                description: entry.description.clone(),
                is_current: index == last,
            })
            .collect();

        let driver = match (pickup.status, &pickup.driver_name) {
            (PickupStatus::InTransit, Some(name)) => Some(DriverAssignment {
                name: name.clone(),
                phone: pickup.driver_phone.clone().unwrap_or_default(),
                estimated_arrival: pickup.estimated_arrival.clone().unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            badge: pickup_badge(pickup.status),
            stage_labels: stage_labels(),
            timeline,
            driver,
            can_report_issue: pickup.status != PickupStatus::Completed,
            pickup,
        }
    }
}

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tests;
