use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ReportId);
id_newtype!(ActivityId);

/// Date sentinel carried by freshly created activities.
pub const JUST_NOW: &str = "Just now";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Scheduled,
    InTransit,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    Report,
    Schedule,
    Pickup,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityStatus {
    Pending,
    InProgress,
    Completed,
}

/// Lifecycle of a tracked pickup, in stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickupStatus {
    Scheduled,
    Confirmed,
    InTransit,
    Completed,
}

impl PickupStatus {
    pub const ALL: [PickupStatus; 4] = [
        PickupStatus::Scheduled,
        PickupStatus::Confirmed,
        PickupStatus::InTransit,
        PickupStatus::Completed,
    ];

    /// Zero-based position in the lifecycle.
    pub fn stage(self) -> usize {
        match self {
            PickupStatus::Scheduled => 0,
            PickupStatus::Confirmed => 1,
            PickupStatus::InTransit => 2,
            PickupStatus::Completed => 3,
        }
    }

    pub fn progress(self) -> u8 {
        match self {
            PickupStatus::Scheduled => 25,
            PickupStatus::Confirmed => 50,
            PickupStatus::InTransit => 75,
            PickupStatus::Completed => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PickupStatus::Scheduled => "Scheduled",
            PickupStatus::Confirmed => "Confirmed",
            PickupStatus::InTransit => "In Transit",
            PickupStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteType {
    Recyclable,
    Organic,
    Electronic,
    Hazardous,
    Construction,
    Other,
}

impl WasteType {
    pub const ALL: [WasteType; 6] = [
        WasteType::Recyclable,
        WasteType::Organic,
        WasteType::Electronic,
        WasteType::Hazardous,
        WasteType::Construction,
        WasteType::Other,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            WasteType::Recyclable => "recyclable",
            WasteType::Organic => "organic",
            WasteType::Electronic => "electronic",
            WasteType::Hazardous => "hazardous",
            WasteType::Construction => "construction",
            WasteType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WasteType::Recyclable => "Recyclable (Paper, Plastic, Glass)",
            WasteType::Organic => "Organic Waste",
            WasteType::Electronic => "Electronic Waste",
            WasteType::Hazardous => "Hazardous Waste",
            WasteType::Construction => "Construction Debris",
            WasteType::Other => "Other Waste",
        }
    }
}

/// Display label for a waste-type key; unknown keys are shown as given.
pub fn waste_type_label(key: &str) -> String {
    WasteType::from_key(key)
        .map(|kind| kind.label().to_string())
        .unwrap_or_else(|| key.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUnit {
    #[default]
    Kg,
    Tons,
    Bags,
    Items,
}

impl QuantityUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            QuantityUnit::Kg => "kg",
            QuantityUnit::Tons => "tons",
            QuantityUnit::Bags => "bags",
            QuantityUnit::Items => "items",
        }
    }
}

impl std::str::FromStr for QuantityUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" => Ok(QuantityUnit::Kg),
            "tons" => Ok(QuantityUnit::Tons),
            "bags" => Ok(QuantityUnit::Bags),
            "items" => Ok(QuantityUnit::Items),
            other => Err(format!("unknown quantity unit '{other}'")),
        }
    }
}

pub const TIME_SLOTS: [&str; 5] = [
    "8:00 AM - 10:00 AM",
    "10:00 AM - 12:00 PM",
    "12:00 PM - 2:00 PM",
    "2:00 PM - 4:00 PM",
    "4:00 PM - 6:00 PM",
];

/// Pickup window assigned to reports filed without a slot.
pub const DEFAULT_TIME_SLOT: &str = TIME_SLOTS[1];
