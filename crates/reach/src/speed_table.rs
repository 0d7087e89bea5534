//! Lookup table of reachable distances keyed by age group and activity type.
//!
//! The table is built once from a delimited dataset and is read-only
//! afterwards. Lookups for keys the dataset does not cover resolve to zero.

use std::{collections::HashMap, fmt, io::Read, path::PathBuf, str::FromStr};

use enum_map::EnumMap;

use crate::{
    errors::LoadError,
    models::{ActivityType, AgeGroup, DurationBucket},
};

/// Notice shown to the user when the dataset cannot be loaded.
pub const LOAD_FAILURE_NOTICE: &str = "Failed to load speed data";

const AGE_GROUP_COLUMNS: &[&str] = &["年齢区分", "age_group"];
const ACTIVITY_TYPE_COLUMNS: &[&str] = &["活動種別", "activity_type"];

fn distance_columns(duration: DurationBucket) -> &'static [&'static str] {
    match duration {
        DurationBucket::Five => &["5分(km)", "5min_km"],
        DurationBucket::Ten => &["10分(km)", "10min_km"],
        DurationBucket::Fifteen => &["15分(km)", "15min_km"],
    }
}

/// Distances in kilometers reachable within each duration bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedEntry(EnumMap<DurationBucket, f64>);

impl SpeedEntry {
    pub fn new(five: f64, ten: f64, fifteen: f64) -> Self {
        let mut distances = EnumMap::default();
        distances[DurationBucket::Five] = sanitize(five);
        distances[DurationBucket::Ten] = sanitize(ten);
        distances[DurationBucket::Fifteen] = sanitize(fifteen);
        Self(distances)
    }

    pub fn distance(&self, duration: DurationBucket) -> f64 {
        self.0[duration]
    }
}

fn sanitize(km: f64) -> f64 {
    if km.is_finite() && km > 0.0 { km } else { 0.0 }
}

/// Where the dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(DataSource::Url(s.to_string()))
        } else {
            Ok(DataSource::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedTable {
    entries: HashMap<(AgeGroup, ActivityType), SpeedEntry>,
}

impl SpeedTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, age_group: AgeGroup, activity_type: ActivityType, entry: SpeedEntry) {
        self.entries.insert((age_group, activity_type), entry);
    }

    pub fn entry(&self, age_group: AgeGroup, activity_type: ActivityType) -> Option<&SpeedEntry> {
        self.entries.get(&(age_group, activity_type))
    }

    /// Base distance in km, zero when the key is absent.
    pub fn distance(
        &self,
        age_group: AgeGroup,
        activity_type: ActivityType,
        duration: DurationBucket,
    ) -> f64 {
        self.entry(age_group, activity_type)
            .map_or(0.0, |entry| entry.distance(duration))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let text = text.trim_start_matches('\u{feff}').trim();
        Self::from_reader(text.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let find = |names: &[&str]| headers.iter().position(|h| names.contains(&h));

        let age_col = find(AGE_GROUP_COLUMNS).ok_or(LoadError::MissingColumn("age group"))?;
        let activity_col =
            find(ACTIVITY_TYPE_COLUMNS).ok_or(LoadError::MissingColumn("activity type"))?;
        let distance_cols: EnumMap<DurationBucket, Option<usize>> =
            EnumMap::from_fn(|duration| find(distance_columns(duration)));

        let mut table = Self::empty();
        for result in rdr.records() {
            let record = result?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let age_cell = record.get(age_col).unwrap_or_default();
            let activity_cell = record.get(activity_col).unwrap_or_default();
            let (age_group, activity_type) =
                match (age_cell.parse::<AgeGroup>(), activity_cell.parse::<ActivityType>()) {
                    (Ok(age), Ok(activity)) => (age, activity),
                    (Err(e), _) | (_, Err(e)) => {
                        tracing::warn!(line = ?record.position().map(|p| p.line()), "Skipping row: {e}");
                        continue;
                    }
                };

            let cell = |duration: DurationBucket| {
                distance_cols[duration]
                    .and_then(|col| record.get(col))
                    .map_or(0.0, parse_distance)
            };
            let entry = SpeedEntry::new(
                cell(DurationBucket::Five),
                cell(DurationBucket::Ten),
                cell(DurationBucket::Fifteen),
            );
            table.insert(age_group, activity_type, entry);
        }

        Ok(table)
    }

    pub async fn load(source: &DataSource) -> Result<Self, LoadError> {
        let text = match source {
            DataSource::File(path) => tokio::fs::read_to_string(path).await?,
            DataSource::Url(url) => {
                let response = reqwest::get(url).await?;
                if !response.status().is_success() {
                    return Err(LoadError::Status(response.status()));
                }
                response.text().await?
            }
        };
        Self::parse(&text)
    }

    /// Loads the table, falling back to an empty one on failure.
    ///
    /// The second element is a user-facing notice, present only when the
    /// load failed.
    pub async fn load_or_empty(source: &DataSource) -> (Self, Option<String>) {
        match Self::load(source).await {
            Ok(table) => {
                tracing::info!(source = %source, rows = table.len(), "Loaded speed table");
                (table, None)
            }
            Err(e) => {
                tracing::error!(source = %source, "Speed data load error: {e}");
                (Self::empty(), Some(LOAD_FAILURE_NOTICE.to_string()))
            }
        }
    }
}

/// Lenient float parse: reads the longest numeric prefix, anything else is 0.
fn parse_distance(cell: &str) -> f64 {
    let cell = cell.trim();
    let prefix_len = cell
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    (1..=prefix_len)
        .rev()
        .find_map(|end| cell[..end].parse::<f64>().ok())
        .map_or(0.0, sanitize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAPANESE_CSV: &str = "\
年齢区分,活動種別,5分(km),10分(km),15分(km)
成人,徒歩,0.4,0.8,1.2
高齢者,徒歩,0.25,0.5,0.75
成人,車椅子,abc,,0.9
";

    #[test]
    fn test_parse_japanese_headers() {
        let table = SpeedTable::parse(JAPANESE_CSV).unwrap();
        assert_eq!(table.len(), 3);
        let d = table.distance(AgeGroup::Adult, ActivityType::Walking, DurationBucket::Ten);
        assert!((d - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_unparsable_cells_default_to_zero() {
        let table = SpeedTable::parse(JAPANESE_CSV).unwrap();
        let entry = table.entry(AgeGroup::Adult, ActivityType::Wheelchair).unwrap();
        assert_eq!(entry.distance(DurationBucket::Five), 0.0);
        assert_eq!(entry.distance(DurationBucket::Ten), 0.0);
        assert!((entry.distance(DurationBucket::Fifteen) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_missing_key_is_zero() {
        let table = SpeedTable::parse(JAPANESE_CSV).unwrap();
        let d = table.distance(AgeGroup::Child, ActivityType::Bicycle, DurationBucket::Five);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_english_headers_and_missing_column() {
        let csv = "age_group,activity_type,5min_km,15min_km\nchild,walking,0.3,0.9\n";
        let table = SpeedTable::parse(csv).unwrap();
        let entry = table.entry(AgeGroup::Child, ActivityType::Walking).unwrap();
        assert_eq!(entry.distance(DurationBucket::Ten), 0.0);
        assert!((entry.distance(DurationBucket::Fifteen) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_rows_skipped() {
        let csv = "age_group,activity_type,5min_km\ntoddler,walking,0.1\nadult,walking,0.4\n";
        let table = SpeedTable::parse(csv).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_key_column_is_error() {
        let result = SpeedTable::parse("activity_type,5min_km\nwalking,0.4\n");
        assert!(matches!(result, Err(LoadError::MissingColumn("age group"))));
    }

    #[test]
    fn test_parse_distance_prefix() {
        assert_eq!(parse_distance("3.2km"), 3.2);
        assert_eq!(parse_distance(" 1.5 "), 1.5);
        assert_eq!(parse_distance("1e"), 1.0);
        assert_eq!(parse_distance("-2"), 0.0);
        assert_eq!(parse_distance(""), 0.0);
        assert_eq!(parse_distance("n/a"), 0.0);
    }

    #[test]
    fn test_data_source_from_str() {
        assert_eq!(
            "https://example.com/speeds.csv".parse::<DataSource>(),
            Ok(DataSource::Url("https://example.com/speeds.csv".to_string()))
        );
        assert_eq!(
            "./data/speeds.csv".parse::<DataSource>(),
            Ok(DataSource::File(PathBuf::from("./data/speeds.csv")))
        );
    }
}
