//! Condition-adjusted reachable distance around the station.

use std::f64::consts::PI;

use geo::Point;
use serde::Serialize;

use crate::{condition, models::Selection, speed_table::SpeedTable};

/// Stroke/fill styling of the reachable-area overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub weight: f64,
    pub opacity: f64,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            color: "#667eea".to_string(),
            fill_color: "#667eea".to_string(),
            fill_opacity: 0.2,
            weight: 3.0,
            opacity: 0.8,
        }
    }
}

/// Drawing instruction for the map collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleOverlay {
    pub center: Point<f64>,
    pub radius_meters: f64,
    pub style: CircleStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Coverage {
    Circle(CircleOverlay),
    /// Nothing reachable: remove any overlay and show placeholders.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reachability {
    pub base_distance_km: f64,
    pub multiplier: f64,
    pub adjusted_distance_km: f64,
    pub radius_meters: f64,
    pub area_km2: f64,
    pub coverage: Coverage,
}

impl Reachability {
    /// Looks up the base distance for `selection` and scales it by condition.
    pub fn compute(table: &SpeedTable, selection: &Selection, center: Point<f64>) -> Self {
        let base_distance_km = table.distance(
            selection.age_group,
            selection.activity_type,
            selection.duration,
        );
        let multiplier = condition::multiplier(selection.condition_percent);
        let adjusted_distance_km = base_distance_km * multiplier;
        let radius_meters = adjusted_distance_km * 1000.0;
        let area_km2 = PI * adjusted_distance_km * adjusted_distance_km;

        let coverage = if adjusted_distance_km > 0.0 {
            Coverage::Circle(CircleOverlay {
                center,
                radius_meters,
                style: CircleStyle::default(),
            })
        } else {
            Coverage::None
        };

        Self {
            base_distance_km,
            multiplier,
            adjusted_distance_km,
            radius_meters,
            area_km2,
            coverage,
        }
    }

    pub fn has_coverage(&self) -> bool {
        matches!(self.coverage, Coverage::Circle(_))
    }

    pub fn display(&self) -> DisplayValues {
        if self.has_coverage() {
            DisplayValues {
                distance: format!("{} km", fixed2(self.adjusted_distance_km)),
                radius: format!("{} m", self.radius_meters.round()),
                area: format!("{} km²", fixed2(self.area_km2)),
            }
        } else {
            DisplayValues::placeholder()
        }
    }
}

/// Two decimals, ties rounded away from zero.
fn fixed2(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

/// The three result strings written back to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayValues {
    pub distance: String,
    pub radius: String,
    pub area: String,
}

impl DisplayValues {
    pub fn placeholder() -> Self {
        Self {
            distance: "- km".to_string(),
            radius: "- m".to_string(),
            area: "- km²".to_string(),
        }
    }
}

impl Default for DisplayValues {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{ActivityType, AgeGroup, DurationBucket, Station},
        speed_table::SpeedEntry,
    };

    fn table() -> SpeedTable {
        let mut table = SpeedTable::empty();
        table.insert(
            AgeGroup::Adult,
            ActivityType::Walking,
            SpeedEntry::new(1.5, 4.0, 6.0),
        );
        table
    }

    fn selection(condition_percent: u8) -> Selection {
        Selection {
            age_group: AgeGroup::Adult,
            activity_type: ActivityType::Walking,
            duration: DurationBucket::Ten,
            condition_percent,
        }
    }

    #[test]
    fn test_worked_example() {
        let center = Station::tenri().location;
        let reach = Reachability::compute(&table(), &selection(50), center);
        assert_eq!(reach.multiplier, 0.75);
        assert_eq!(reach.adjusted_distance_km, 3.0);
        assert_eq!(reach.radius_meters, 3000.0);
        assert!((reach.area_km2 - 28.274_333_882_308_138).abs() < 1e-9);

        let display = reach.display();
        assert_eq!(display.distance, "3.00 km");
        assert_eq!(display.radius, "3000 m");
        assert_eq!(display.area, "28.27 km²");

        match reach.coverage {
            Coverage::Circle(circle) => {
                assert_eq!(circle.center, center);
                assert_eq!(circle.radius_meters, 3000.0);
            }
            Coverage::None => panic!("expected coverage"),
        }
    }

    #[test]
    fn test_adjusted_never_exceeds_base() {
        let center = Station::tenri().location;
        for c in 0..=100 {
            let reach = Reachability::compute(&table(), &selection(c), center);
            assert!(reach.adjusted_distance_km >= 0.0);
            assert!(reach.adjusted_distance_km <= reach.base_distance_km);
            assert_eq!(reach.radius_meters, reach.adjusted_distance_km * 1000.0);
            let expected_area = PI * reach.adjusted_distance_km.powi(2);
            assert!((reach.area_km2 - expected_area).abs() < 1e-9);
        }
    }

    #[test]
    fn test_missing_key_has_no_coverage() {
        let center = Station::tenri().location;
        let mut sel = selection(100);
        sel.activity_type = ActivityType::Bicycle;
        let reach = Reachability::compute(&table(), &sel, center);
        assert_eq!(reach.adjusted_distance_km, 0.0);
        assert_eq!(reach.coverage, Coverage::None);
        assert_eq!(reach.display(), DisplayValues::placeholder());
    }

    #[test]
    fn test_two_decimal_ties_round_up() {
        let mut table = SpeedTable::empty();
        table.insert(
            AgeGroup::Elderly,
            ActivityType::Walking,
            SpeedEntry::new(0.25, 0.5, 0.75),
        );
        table.insert(
            AgeGroup::Adult,
            ActivityType::Bicycle,
            SpeedEntry::new(1.25, 2.5, 3.75),
        );
        let center = Station::tenri().location;

        let mut sel = Selection {
            age_group: AgeGroup::Elderly,
            activity_type: ActivityType::Walking,
            duration: DurationBucket::Five,
            condition_percent: 0,
        };
        let reach = Reachability::compute(&table, &sel, center);
        assert_eq!(reach.adjusted_distance_km, 0.125);
        assert_eq!(reach.display().distance, "0.13 km");
        assert_eq!(reach.display().radius, "125 m");

        sel.age_group = AgeGroup::Adult;
        sel.activity_type = ActivityType::Bicycle;
        let reach = Reachability::compute(&table, &sel, center);
        assert_eq!(reach.display().distance, "0.63 km");
    }

    #[test]
    fn test_fixed2() {
        assert_eq!(fixed2(0.125), "0.13");
        assert_eq!(fixed2(28.274_333_882_308_138), "28.27");
        assert_eq!(fixed2(3.0), "3.00");
        assert_eq!(fixed2(0.0), "0.00");
    }

    #[test]
    fn test_radius_rounded_to_whole_meters() {
        let mut table = SpeedTable::empty();
        table.insert(
            AgeGroup::Elderly,
            ActivityType::Wheelchair,
            SpeedEntry::new(0.3333, 0.0, 0.0),
        );
        let sel = Selection {
            age_group: AgeGroup::Elderly,
            activity_type: ActivityType::Wheelchair,
            duration: DurationBucket::Five,
            condition_percent: 100,
        };
        let reach = Reachability::compute(&table, &sel, Station::tenri().location);
        assert_eq!(reach.display().radius, "333 m");
        assert_eq!(reach.display().distance, "0.33 km");
    }
}
