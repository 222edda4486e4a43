use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Unit a temperature value was entered in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    /// Degrees Fahrenheit (the unit readings are stored in)
    #[default]
    #[serde(rename = "F", alias = "f")]
    Fahrenheit,

    /// Degrees Celsius
    #[serde(rename = "C", alias = "c")]
    Celsius,
}

impl TemperatureUnit {
    /// Display symbol, e.g. `°F`
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Celsius => "°C",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Fahrenheit => write!(f, "F"),
            TemperatureUnit::Celsius => write!(f, "C"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            other => Err(format!("Unknown temperature unit: {}", other)),
        }
    }
}

/// A set of vital sign values as captured on the vital sign form.
///
/// Every field is optional. Temperature is in °F once the measurement has
/// been normalized; while a form is in progress it is in whatever unit the
/// user selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignMeasurement {
    /// Systolic blood pressure in mmHg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure_systolic: Option<u16>,

    /// Diastolic blood pressure in mmHg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure_diastolic: Option<u16>,

    /// Body temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Weight in pounds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Height in inches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Heart rate in beats per minute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u16>,

    /// Respiratory rate in breaths per minute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<u16>,

    /// Peripheral oxygen saturation in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<f64>,

    /// Free-text notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VitalSignMeasurement {
    /// Whether any of the eight measurement fields is present. Notes do not count.
    pub fn has_any_vital(&self) -> bool {
        self.blood_pressure_systolic.is_some()
            || self.blood_pressure_diastolic.is_some()
            || self.temperature.is_some()
            || self.weight.is_some()
            || self.height.is_some()
            || self.heart_rate.is_some()
            || self.respiratory_rate.is_some()
            || self.oxygen_saturation.is_some()
    }
}

/// Request payload for recording or editing a vital sign reading
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVitalSignRequest {
    /// Systolic blood pressure in mmHg
    #[validate(range(min = 40, max = 300, message = "Systolic must be between 40 and 300"))]
    pub blood_pressure_systolic: Option<u16>,

    /// Diastolic blood pressure in mmHg
    #[validate(range(min = 20, max = 200, message = "Diastolic must be between 20 and 200"))]
    pub blood_pressure_diastolic: Option<u16>,

    /// Body temperature in `temperature_unit`. Its bound is checked after
    /// normalization to °F, so it carries no range attribute.
    pub temperature: Option<f64>,

    /// Unit the temperature was entered in
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// Weight in pounds
    #[validate(range(min = 1.0, max = 1500.0, message = "Weight must be between 1 and 1500 lbs"))]
    pub weight: Option<f64>,

    /// Height in inches
    #[validate(range(min = 10.0, max = 120.0, message = "Height must be between 10 and 120 inches"))]
    pub height: Option<f64>,

    /// Heart rate in beats per minute
    #[validate(range(min = 20, max = 300, message = "Heart rate must be between 20 and 300 bpm"))]
    pub heart_rate: Option<u16>,

    /// Respiratory rate in breaths per minute
    #[validate(range(min = 5, max = 60, message = "Respiratory rate must be between 5 and 60 breaths/min"))]
    pub respiratory_rate: Option<u16>,

    /// Oxygen saturation in percent
    #[validate(range(min = 0.0, max = 100.0, message = "Oxygen saturation must be between 0 and 100%"))]
    pub oxygen_saturation: Option<f64>,

    /// Optional notes about the reading
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,

    /// When the reading was taken. Defaults to the current time if not provided.
    pub recorded_at: Option<DateTime<Utc>>,
}

impl CreateVitalSignRequest {
    /// The measurement exactly as entered, temperature still in `temperature_unit`
    pub fn to_measurement(&self) -> VitalSignMeasurement {
        VitalSignMeasurement {
            blood_pressure_systolic: self.blood_pressure_systolic,
            blood_pressure_diastolic: self.blood_pressure_diastolic,
            temperature: self.temperature,
            weight: self.weight,
            height: self.height,
            heart_rate: self.heart_rate,
            respiratory_rate: self.respiratory_rate,
            oxygen_saturation: self.oxygen_saturation,
            notes: self.notes.clone(),
        }
    }
}

/// A validated reading, ready to be sent to the vital signs API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignReading {
    /// Unique identifier for the reading
    pub id: String,

    /// When the reading was taken
    pub recorded_at: DateTime<Utc>,

    /// The measured values, temperature in °F
    #[serde(flatten)]
    pub measurement: VitalSignMeasurement,

    /// BMI derived from weight and height, if both were recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
}
