use serde::{Deserialize, Serialize};
use vital_signs_domain::entities::{
    BloodPressureCategory, BmiCategory, SubmissionDecision, TemperatureUnit, VitalSignAssessment,
    VitalSignReading,
};

/// Public representation of a vital sign assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicVitalSignAssessment {
    /// BMI rounded to one decimal place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,

    /// BMI category as `{label, color}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi_category: Option<BmiCategory>,

    /// Blood pressure category as `{label, color}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure_category: Option<BloodPressureCategory>,

    /// SpO2 below 90%
    pub spo2_critical: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_fahrenheit: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_celsius: Option<f64>,

    /// Human-readable abnormal value warnings
    pub abnormal_values: Vec<String>,
}

/// Result of the `validate` command
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicValidationResponse {
    pub valid: bool,
}

/// Result of the `submit` command
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublicSubmissionResponse {
    /// The reading is ready to be sent to the vital signs API
    Ready { reading: VitalSignReading },

    /// Abnormal values need confirmation; rerun with `--confirm`
    #[serde(rename_all = "camelCase")]
    NeedsConfirmation { abnormal_values: Vec<String> },
}

/// Result of the `bmi` command
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicBmiResult {
    pub bmi: Option<f64>,
    pub category: Option<BmiCategory>,
}

/// Result of the `convert` command
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicTemperatureConversion {
    pub value: f64,
    pub unit: TemperatureUnit,
}

/// Convert a domain assessment to its public form
pub fn convert_to_public_assessment(assessment: VitalSignAssessment) -> PublicVitalSignAssessment {
    let abnormal_values = assessment.abnormal_messages();
    PublicVitalSignAssessment {
        bmi: assessment.bmi,
        bmi_category: assessment.bmi_category,
        blood_pressure_category: assessment.blood_pressure_category,
        spo2_critical: assessment.spo2_critical,
        temperature_fahrenheit: assessment.temperature_fahrenheit,
        temperature_celsius: assessment.temperature_celsius,
        abnormal_values,
    }
}

/// Convert a submission decision to its public form
pub fn convert_to_public_submission(decision: SubmissionDecision) -> PublicSubmissionResponse {
    match decision {
        SubmissionDecision::Ready(reading) => PublicSubmissionResponse::Ready { reading },
        SubmissionDecision::NeedsConfirmation(findings) => PublicSubmissionResponse::NeedsConfirmation {
            abnormal_values: findings.iter().map(ToString::to_string).collect(),
        },
    }
}
