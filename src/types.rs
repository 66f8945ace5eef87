use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            other => Err(format!("unknown skill level: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub slot: String,
}

/// A booking joined with its owning student, as shown on the dashboard
/// and in the attendance export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub slot: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub level: SkillLevel,
}

impl BookingRow {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A named shift window. `capacity` is the maximum number of bookings per
/// (date, slot); 0 means unlimited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub name: String,
    pub start: NaiveTime,
    pub capacity: u32,
}

impl FromStr for SlotConfig {
    type Err = String;

    /// Parses `NAME@HH:MM` or `NAME@HH:MMxCAP`, e.g. `12:00 to 14:00@12:00x1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .rsplit_once('@')
            .ok_or_else(|| format!("invalid slot '{s}', expected NAME@HH:MM[xCAP]"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("invalid slot '{s}', empty name"));
        }
        let (start, capacity) = match rest.split_once('x') {
            Some((start, cap)) => {
                let capacity = cap
                    .parse::<u32>()
                    .map_err(|err| format!("invalid slot capacity '{cap}': {err}"))?;
                (start, capacity)
            }
            None => (rest, 1),
        };
        let start = NaiveTime::parse_from_str(start, "%H:%M")
            .map_err(|err| format!("invalid slot start time '{start}': {err}"))?;
        Ok(Self {
            name: name.to_string(),
            start,
            capacity,
        })
    }
}

impl fmt::Display for SlotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}x{}",
            self.name,
            self.start.format("%H:%M"),
            self.capacity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotStatus {
    Booked { students: Vec<String> },
    Free,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub slot: String,
    pub start: NaiveTime,
    pub status: SlotStatus,
}
