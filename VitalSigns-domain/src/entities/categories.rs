use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity color used when displaying a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityColor {
    Success,
    Warning,
    Error,
}

/// Label and severity color pair shown next to a derived value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub label: String,
    pub color: SeverityColor,
}

/// BMI category based on the computed BMI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CategoryLabel", try_from = "CategoryLabel")]
pub enum BmiCategory {
    /// BMI below 18.5
    Underweight,

    /// BMI from 18.5 up to 25
    Normal,

    /// BMI from 25 up to 30
    Overweight,

    /// BMI of 30 or more
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn color(&self) -> SeverityColor {
        match self {
            BmiCategory::Normal => SeverityColor::Success,
            BmiCategory::Underweight | BmiCategory::Overweight => SeverityColor::Warning,
            BmiCategory::Obese => SeverityColor::Error,
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<BmiCategory> for CategoryLabel {
    fn from(category: BmiCategory) -> Self {
        CategoryLabel {
            label: category.label().to_string(),
            color: category.color(),
        }
    }
}

impl TryFrom<CategoryLabel> for BmiCategory {
    type Error = String;

    fn try_from(value: CategoryLabel) -> Result<Self, Self::Error> {
        match value.label.as_str() {
            "Underweight" => Ok(BmiCategory::Underweight),
            "Normal" => Ok(BmiCategory::Normal),
            "Overweight" => Ok(BmiCategory::Overweight),
            "Obese" => Ok(BmiCategory::Obese),
            other => Err(format!("Invalid BMI category: {}", other)),
        }
    }
}

/// Blood pressure category based on a systolic/diastolic pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CategoryLabel", try_from = "CategoryLabel")]
pub enum BloodPressureCategory {
    /// Normal blood pressure (systolic < 120 and diastolic < 80)
    Normal,

    /// Elevated blood pressure (systolic 120-129 and diastolic < 80)
    Elevated,

    /// Stage 1 hypertension (systolic 130-139 or diastolic 80-89)
    Hypertension1,

    /// Stage 2 hypertension (systolic ≥ 140 or diastolic ≥ 90)
    Hypertension2,

    /// Hypertensive crisis (systolic ≥ 180 or diastolic ≥ 120)
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Hypertension1 => "High BP Stage 1",
            BloodPressureCategory::Hypertension2 => "High BP Stage 2",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive Crisis",
        }
    }

    pub fn color(&self) -> SeverityColor {
        match self {
            BloodPressureCategory::Normal => SeverityColor::Success,
            BloodPressureCategory::Elevated | BloodPressureCategory::Hypertension1 => {
                SeverityColor::Warning
            }
            BloodPressureCategory::Hypertension2 | BloodPressureCategory::HypertensiveCrisis => {
                SeverityColor::Error
            }
        }
    }
}

impl fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<BloodPressureCategory> for CategoryLabel {
    fn from(category: BloodPressureCategory) -> Self {
        CategoryLabel {
            label: category.label().to_string(),
            color: category.color(),
        }
    }
}

impl TryFrom<CategoryLabel> for BloodPressureCategory {
    type Error = String;

    fn try_from(value: CategoryLabel) -> Result<Self, Self::Error> {
        match value.label.as_str() {
            "Normal" => Ok(BloodPressureCategory::Normal),
            "Elevated" => Ok(BloodPressureCategory::Elevated),
            "High BP Stage 1" => Ok(BloodPressureCategory::Hypertension1),
            "High BP Stage 2" => Ok(BloodPressureCategory::Hypertension2),
            "Hypertensive Crisis" => Ok(BloodPressureCategory::HypertensiveCrisis),
            other => Err(format!("Invalid blood pressure category: {}", other)),
        }
    }
}

/// An in-range value that falls outside the clinically normal band.
///
/// Findings never block a submission; they ask the user to confirm first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AbnormalFinding {
    /// Temperature outside 95-100.4 °F
    Temperature { fahrenheit: f64 },

    /// Systolic ≥ 180 or diastolic ≥ 120
    HypertensiveCrisis {
        systolic: Option<u16>,
        diastolic: Option<u16>,
    },

    /// Heart rate outside 60-100 bpm
    HeartRate { bpm: u16 },

    /// SpO2 below 95%
    OxygenSaturation { percent: f64 },

    /// Respiratory rate outside 12-20 breaths/min
    RespiratoryRate { rate: u16 },
}

impl fmt::Display for AbnormalFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbnormalFinding::Temperature { fahrenheit } => {
                write!(f, "Temperature: {:.1}°F (normal 95-100.4°F)", fahrenheit)
            }
            AbnormalFinding::HypertensiveCrisis { systolic, diastolic } => {
                let side = |value: &Option<u16>| {
                    value.map_or_else(|| "--".to_string(), |v| v.to_string())
                };
                write!(
                    f,
                    "Blood Pressure: {}/{} mmHg (Hypertensive Crisis)",
                    side(systolic),
                    side(diastolic)
                )
            }
            AbnormalFinding::HeartRate { bpm } => {
                write!(f, "Heart Rate: {} bpm (normal 60-100)", bpm)
            }
            AbnormalFinding::OxygenSaturation { percent } => {
                write!(f, "SpO2: {}% (normal ≥95%)", percent)
            }
            AbnormalFinding::RespiratoryRate { rate } => {
                write!(f, "Respiratory Rate: {} breaths/min (normal 12-20)", rate)
            }
        }
    }
}
