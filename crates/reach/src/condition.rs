//! Condition (fatigue) slider: speed multiplier and status indicator.

use std::fmt;

use serde::Serialize;

pub const MAX_CONDITION: u8 = 100;
pub const INDICATOR_DOTS: usize = 5;

const GOOD_THRESHOLD: u8 = 80;
const NORMAL_THRESHOLD: u8 = 50;
const DOT_STEP: u8 = 20;

/// Speed multiplier for a condition percentage.
///
/// Linear from 0.5 at 0% to 1.0 at 100%; values above 100 are clamped.
pub fn multiplier(condition_percent: u8) -> f64 {
    let condition = f64::from(condition_percent.min(MAX_CONDITION));
    0.5 + (condition / 100.0) * 0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionLevel {
    Good,
    Normal,
    Poor,
}

impl ConditionLevel {
    pub fn from_percent(value: u8) -> Self {
        if value >= GOOD_THRESHOLD {
            ConditionLevel::Good
        } else if value >= NORMAL_THRESHOLD {
            ConditionLevel::Normal
        } else {
            ConditionLevel::Poor
        }
    }

    fn title(self) -> &'static str {
        match self {
            ConditionLevel::Good => "Good",
            ConditionLevel::Normal => "Normal",
            ConditionLevel::Poor => "Poor",
        }
    }
}

/// Label and five-dot indicator derived from the slider value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionStatus {
    pub value: u8,
    pub level: ConditionLevel,
    /// Dot `i` is lit once the value reaches `(i + 1) * 20`.
    pub dots: [bool; INDICATOR_DOTS],
}

impl ConditionStatus {
    pub fn from_percent(value: u8) -> Self {
        let value = value.min(MAX_CONDITION);
        let lit = usize::from(value / DOT_STEP);
        let mut dots = [false; INDICATOR_DOTS];
        dots.iter_mut().take(lit).for_each(|dot| *dot = true);
        Self {
            value,
            level: ConditionLevel::from_percent(value),
            dots,
        }
    }

    pub fn lit_dots(&self) -> usize {
        self.dots.iter().filter(|lit| **lit).count()
    }

    pub fn label(&self) -> String {
        format!("{} ({}%)", self.level.title(), self.value)
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dots: String = self
            .dots
            .iter()
            .map(|lit| if *lit { '●' } else { '○' })
            .collect();
        write!(f, "{} {}", self.label(), dots)
    }
}
