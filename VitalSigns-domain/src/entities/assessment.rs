use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::categories::{AbnormalFinding, BloodPressureCategory, BmiCategory};
use super::vital_signs::VitalSignReading;

/// Derived values and warnings for an in-progress vital sign form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignAssessment {
    /// BMI rounded to one decimal place
    pub bmi: Option<f64>,

    /// Category for `bmi`
    pub bmi_category: Option<BmiCategory>,

    /// Category for the systolic/diastolic pair
    pub blood_pressure_category: Option<BloodPressureCategory>,

    /// SpO2 below the critical threshold of 90%
    pub spo2_critical: bool,

    /// Entered temperature expressed in °F
    pub temperature_fahrenheit: Option<f64>,

    /// Entered temperature expressed in °C
    pub temperature_celsius: Option<f64>,

    /// Values outside their normal band, in display order
    pub abnormal_findings: Vec<AbnormalFinding>,
}

impl VitalSignAssessment {
    pub fn has_abnormal_values(&self) -> bool {
        !self.abnormal_findings.is_empty()
    }

    /// Human-readable messages for the abnormal findings
    pub fn abnormal_messages(&self) -> Vec<String> {
        self.abnormal_findings.iter().map(ToString::to_string).collect()
    }
}

/// Outcome of submitting a vital sign form
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionDecision {
    /// The reading passed validation and can be sent
    Ready(VitalSignReading),

    /// Abnormal values were found; the user has to confirm before sending
    NeedsConfirmation(Vec<AbnormalFinding>),
}

/// Summary statistics for one vital over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalStatistics {
    /// Mean value, rounded to one decimal place
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Most recent value in the period
    pub latest: f64,
    /// Number of readings that recorded this vital
    pub count: usize,
}

/// Trend summary over a reading history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignTrends {
    /// Number of readings inside the analysis period
    pub reading_count: usize,

    /// Analysis period in days
    pub period_days: u32,

    /// End of the analysis period
    pub generated_at: DateTime<Utc>,

    pub systolic: Option<VitalStatistics>,
    pub diastolic: Option<VitalStatistics>,
    pub heart_rate: Option<VitalStatistics>,
    /// Temperature in °F
    pub temperature: Option<VitalStatistics>,
    pub weight: Option<VitalStatistics>,
    pub respiratory_rate: Option<VitalStatistics>,
    pub oxygen_saturation: Option<VitalStatistics>,

    /// Category of the averaged blood pressure
    pub blood_pressure_category: Option<BloodPressureCategory>,

    /// BMI of the most recent reading that has one
    pub latest_bmi: Option<f64>,
    pub latest_bmi_category: Option<BmiCategory>,

    /// Readings with at least one abnormal finding
    pub abnormal_reading_count: usize,
}
