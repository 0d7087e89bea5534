//! UI collaborator: control state, change events and the result panel.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    condition::{ConditionStatus, MAX_CONDITION},
    errors::ParseError,
    models::{ActivityType, AgeGroup, DurationBucket, Selection},
    reachability::DisplayValues,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Age,
    Transport,
    Duration,
    Condition,
}

impl FromStr for Control {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "age" => Ok(Control::Age),
            "transport" | "activity" => Ok(Control::Transport),
            "duration" | "time" => Ok(Control::Duration),
            "condition" => Ok(Control::Condition),
            _ => Err(ParseError::Control(s.to_string())),
        }
    }
}

/// A new value for one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Age(AgeGroup),
    Transport(ActivityType),
    Duration(DurationBucket),
    Condition(u8),
}

impl ControlEvent {
    pub fn control(&self) -> Control {
        match self {
            ControlEvent::Age(_) => Control::Age,
            ControlEvent::Transport(_) => Control::Transport,
            ControlEvent::Duration(_) => Control::Duration,
            ControlEvent::Condition(_) => Control::Condition,
        }
    }

    pub fn parse(control: Control, value: &str) -> Result<Self, ParseError> {
        Ok(match control {
            Control::Age => ControlEvent::Age(value.parse()?),
            Control::Transport => ControlEvent::Transport(value.parse()?),
            Control::Duration => ControlEvent::Duration(value.parse()?),
            Control::Condition => ControlEvent::Condition(parse_condition(value)?),
        })
    }
}

impl FromStr for ControlEvent {
    type Err = ParseError;

    /// Parses `"<control> <value>"`, e.g. `"condition 60"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (control, value) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| ParseError::Control(s.to_string()))?;
        Self::parse(control.parse()?, value.trim())
    }
}

pub fn parse_condition(value: &str) -> Result<u8, ParseError> {
    value
        .trim()
        .trim_end_matches('%')
        .parse::<u8>()
        .ok()
        .filter(|v| *v <= MAX_CONDITION)
        .ok_or_else(|| ParseError::Condition(value.to_string()))
}

/// Current values of the four controls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    selection: Selection,
}

impl Controls {
    pub fn new(selection: Selection) -> Self {
        Self { selection }
    }

    pub fn read(&self) -> Selection {
        self.selection
    }

    pub fn condition(&self) -> u8 {
        self.selection.condition_percent
    }

    pub fn set(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Age(age) => self.selection.age_group = age,
            ControlEvent::Transport(activity) => self.selection.activity_type = activity,
            ControlEvent::Duration(duration) => self.selection.duration = duration,
            ControlEvent::Condition(value) => {
                self.selection.condition_percent = value.min(MAX_CONDITION)
            }
        }
    }
}

/// Everything the page shows besides the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayPanel {
    pub values: DisplayValues,
    pub condition: Option<ConditionStatus>,
    /// User-visible alerts, oldest first.
    pub notices: Vec<String>,
}

impl DisplayPanel {
    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("Notice: {message}");
        self.notices.push(message);
    }
}

impl fmt::Display for DisplayPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notice in &self.notices {
            writeln!(f, "! {notice}")?;
        }
        writeln!(f, "Distance:  {}", self.values.distance)?;
        writeln!(f, "Radius:    {}", self.values.radius)?;
        writeln!(f, "Area:      {}", self.values.area)?;
        match &self.condition {
            Some(status) => write!(f, "Condition: {status}"),
            None => write!(f, "Condition: -"),
        }
    }
}
