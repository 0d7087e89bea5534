//! Runtime configuration.

use crate::{models::Station, speed_table::DataSource};

pub const DEFAULT_DATA_PATH: &str = "./data/平均歩行速度.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_source: DataSource,
    pub station: Station,
    /// Zoom level of the initial view around the station.
    pub initial_zoom: u8,
    /// Padding kept around the reachable area when the map refits.
    pub fit_padding_px: u32,
    pub viewport_width_px: u32,
    pub viewport_height_px: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::File(DEFAULT_DATA_PATH.into()),
            station: Station::tenri(),
            initial_zoom: 14,
            fit_padding_px: 50,
            viewport_width_px: 1024,
            viewport_height_px: 768,
        }
    }
}

impl AppConfig {
    pub fn with_data_source(mut self, data_source: DataSource) -> Self {
        self.data_source = data_source;
        self
    }

    pub fn with_viewport(mut self, width_px: u32, height_px: u32) -> Self {
        self.viewport_width_px = width_px;
        self.viewport_height_px = height_px;
        self
    }
}
