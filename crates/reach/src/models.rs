use std::{fmt, str::FromStr};

use enum_map::Enum;
use geo::Point;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Child,
    Adult,
    Elderly,
}

impl AgeGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            AgeGroup::Child => "child",
            AgeGroup::Adult => "adult",
            AgeGroup::Elderly => "elderly",
        }
    }
}

impl FromStr for AgeGroup {
    type Err = ParseError;

    /// Accepts the English codes and the labels used in the published dataset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "child" | "子ども" | "子供" => Ok(AgeGroup::Child),
            "adult" | "成人" | "大人" => Ok(AgeGroup::Adult),
            "elderly" | "高齢者" => Ok(AgeGroup::Elderly),
            _ => Err(ParseError::AgeGroup(s.to_string())),
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode of movement used when evacuating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Walking,
    Wheelchair,
    Stroller,
    Bicycle,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Walking => "walking",
            ActivityType::Wheelchair => "wheelchair",
            ActivityType::Stroller => "stroller",
            ActivityType::Bicycle => "bicycle",
        }
    }
}

impl FromStr for ActivityType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "walking" | "徒歩" => Ok(ActivityType::Walking),
            "wheelchair" | "車椅子" | "車いす" => Ok(ActivityType::Wheelchair),
            "stroller" | "ベビーカー" => Ok(ActivityType::Stroller),
            "bicycle" | "自転車" => Ok(ActivityType::Bicycle),
            _ => Err(ParseError::ActivityType(s.to_string())),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evacuation time choice indexing the precomputed distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum DurationBucket {
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "15")]
    Fifteen,
}

impl DurationBucket {
    pub fn minutes(self) -> u32 {
        match self {
            DurationBucket::Five => 5,
            DurationBucket::Ten => 10,
            DurationBucket::Fifteen => 15,
        }
    }
}

impl FromStr for DurationBucket {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix("min")
            .or_else(|| trimmed.strip_suffix('分'))
            .unwrap_or(trimmed)
            .trim();
        match digits {
            "5" => Ok(DurationBucket::Five),
            "10" => Ok(DurationBucket::Ten),
            "15" => Ok(DurationBucket::Fifteen),
            _ => Err(ParseError::Duration(s.to_string())),
        }
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes())
    }
}

/// Snapshot of the four controls, read fresh for every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub age_group: AgeGroup,
    pub activity_type: ActivityType,
    pub duration: DurationBucket,
    /// Perceived physical condition, 0 (worst) to 100 (best).
    pub condition_percent: u8,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            age_group: AgeGroup::Adult,
            activity_type: ActivityType::Walking,
            duration: DurationBucket::Ten,
            condition_percent: 100,
        }
    }
}

/// The single origin every reachable area is drawn around.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub label: String,
    /// x = longitude, y = latitude.
    pub location: Point<f64>,
}

impl Station {
    pub fn new(name: impl Into<String>, label: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            location: Point::new(lng, lat),
        }
    }

    pub fn tenri() -> Self {
        Self::new("天理駅", "天理駅 奈良県天理市", 34.5967, 135.8333)
    }

    pub fn lat(&self) -> f64 {
        self.location.y()
    }

    pub fn lng(&self) -> f64 {
        self.location.x()
    }
}

impl Default for Station {
    fn default() -> Self {
        Self::tenri()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_labels() {
        assert_eq!("高齢者".parse::<AgeGroup>(), Ok(AgeGroup::Elderly));
        assert_eq!(" Adult ".parse::<AgeGroup>(), Ok(AgeGroup::Adult));
        assert!("toddler".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn test_activity_type_labels() {
        assert_eq!("車椅子".parse::<ActivityType>(), Ok(ActivityType::Wheelchair));
        assert_eq!("walking".parse::<ActivityType>(), Ok(ActivityType::Walking));
    }

    #[test]
    fn test_duration_suffixes() {
        assert_eq!("5".parse::<DurationBucket>(), Ok(DurationBucket::Five));
        assert_eq!("10min".parse::<DurationBucket>(), Ok(DurationBucket::Ten));
        assert_eq!("15分".parse::<DurationBucket>(), Ok(DurationBucket::Fifteen));
        assert!("20".parse::<DurationBucket>().is_err());
    }

    #[test]
    fn test_station_coordinates() {
        let station = Station::tenri();
        assert!((station.lat() - 34.5967).abs() < 1e-9);
        assert!((station.lng() - 135.8333).abs() < 1e-9);
    }
}
