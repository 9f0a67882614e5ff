//! Domain types - shape of the herd and robot records, no behavior
//!
//! Wire names are camelCase so settings/report JSON matches the legacy
//! export format consumed by the farm office tooling.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Robot
// ─────────────────────────────────────────────────────────────────────────────

/// Operational status of a milking robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    Active,
    Idle,
    Maintenance,
    Error,
}

impl std::fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Idle => write!(f, "IDLE"),
            Self::Maintenance => write!(f, "MAINTENANCE"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// An automated milking unit
///
/// `current_cow` is a weak reference by cow id. Intended (not enforced)
/// invariant: it is set only while the robot is milking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Robot {
    pub id: String,
    pub name: String,
    pub status: RobotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_cow: Option<String>,
    /// Date of the last maintenance pass, `%Y-%m-%d`
    pub last_maintenance: String,
    /// Completed sessions since startup. No midnight reset rule exists.
    pub sessions_today: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cow
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Excellent,
    Good,
    Attention,
    Poor,
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Attention => write!(f, "attention"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Waiting,
    Milking,
    Pasture,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Milking => write!(f, "milking"),
            Self::Pasture => write!(f, "pasture"),
        }
    }
}

/// A herd animal tracked by RFID tag, yield metrics and location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cow {
    pub id: String,
    pub name: String,
    /// External RFID label, free text
    pub tag_id: String,
    /// Time of the last milking, `%H:%M`
    pub last_milking: String,
    /// Litres milked today
    pub daily_yield: f64,
    /// Rolling average, litres
    pub avg_yield: f64,
    pub health: Health,
    pub location: Location,
}

/// All cow fields except the id, as collected by the herd form.
/// The id is generated when the record is admitted to the herd.
#[derive(Debug, Clone, PartialEq)]
pub struct CowDraft {
    pub name: String,
    pub tag_id: String,
    pub last_milking: String,
    pub daily_yield: f64,
    pub avg_yield: f64,
    pub health: Health,
    pub location: Location,
}

impl CowDraft {
    pub fn into_cow(self, id: String) -> Cow {
        Cow {
            id,
            name: self.name,
            tag_id: self.tag_id,
            last_milking: self.last_milking,
            daily_yield: self.daily_yield,
            avg_yield: self.avg_yield,
            health: self.health,
            location: self.location,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Milking session
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Excellent,
    Good,
    Poor,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// A completed historical record of one robot servicing one cow.
///
/// `cow_id` / `robot_id` are weak references with no cascade rules; sessions
/// are seed data only and are never created or removed at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkingSession {
    pub id: String,
    pub cow_id: String,
    pub robot_id: String,
    pub start_time: String,
    /// Minutes
    pub duration: u32,
    /// Litres
    #[serde(rename = "yield")]
    pub yield_litres: f64,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robot_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RobotStatus::Maintenance).unwrap(),
            "\"maintenance\""
        );
    }

    #[test]
    fn robot_omits_current_cow_when_unset() {
        let robot = Robot {
            id: "R002".into(),
            name: "Robot Beta".into(),
            status: RobotStatus::Idle,
            current_cow: None,
            last_maintenance: "2025-01-13".into(),
            sessions_today: 22,
        };
        let json = serde_json::to_value(&robot).unwrap();
        assert!(json.get("currentCow").is_none());
        assert_eq!(json["lastMaintenance"], "2025-01-13");
        assert_eq!(json["sessionsToday"], 22);
    }

    #[test]
    fn session_yield_field_name() {
        let session = MilkingSession {
            id: "S001".into(),
            cow_id: "C123".into(),
            robot_id: "R001".into(),
            start_time: "14:30".into(),
            duration: 8,
            yield_litres: 12.5,
            quality: Quality::Excellent,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["yield"], 12.5);
        assert_eq!(json["cowId"], "C123");
    }

    #[test]
    fn cow_round_trips() {
        let cow = Cow {
            id: "C123".into(),
            name: "Burenka".into(),
            tag_id: "TAG-001".into(),
            last_milking: "14:30".into(),
            daily_yield: 28.5,
            avg_yield: 26.2,
            health: Health::Excellent,
            location: Location::Milking,
        };
        let json = serde_json::to_string(&cow).unwrap();
        let back: Cow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cow);
    }
}
