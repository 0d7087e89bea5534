//! Evacuation reachability around a station.
//!
//! A speed table gives the distance each age group can cover per activity
//! type within 5, 10 or 15 minutes. The selected distance is scaled by the
//! user's condition and drawn as a circle around the station.

pub mod app;
pub mod condition;
pub mod config;
pub mod errors;
pub mod map;
pub mod models;
pub mod reachability;
pub mod speed_table;
pub mod ui;

pub use app::ReachApp;
pub use config::AppConfig;
pub use map::{GeoJsonMap, MapSurface};
pub use models::{ActivityType, AgeGroup, DurationBucket, Selection, Station};
pub use reachability::{Coverage, Reachability};
pub use speed_table::{DataSource, SpeedTable};
