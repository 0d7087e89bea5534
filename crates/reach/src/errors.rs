use thiserror::Error;

/// Failure to fetch or parse the speed dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dataset request returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
}

/// Failure to interpret a control value or dataset label.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown age group: {0}")]
    AgeGroup(String),

    #[error("Unknown activity type: {0}")]
    ActivityType(String),

    #[error("Unknown duration: {0}")]
    Duration(String),

    #[error("Invalid condition value: {0}")]
    Condition(String),

    #[error("Unknown control: {0}")]
    Control(String),
}
