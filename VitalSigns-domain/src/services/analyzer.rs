//! Clinical computations over vital sign values.
//!
//! Everything here is a pure function of its inputs. Callers hand in whatever
//! the form currently holds, partial input included, and get back plain values
//! to display.

use thiserror::Error;
use validator::Validate;

use crate::entities::{
    AbnormalFinding, BloodPressureCategory, BmiCategory, CreateVitalSignRequest, TemperatureUnit,
    VitalSignMeasurement,
};

/// SpO2 below this percentage is critical
pub const CRITICAL_SPO2_PERCENT: f64 = 90.0;

const POUNDS_TO_KILOGRAMS: f64 = 0.453592;
const INCHES_TO_METERS: f64 = 0.0254;

/// Hard-stop bounds for temperature, in °F
const TEMPERATURE_MIN_F: f64 = 90.0;
const TEMPERATURE_MAX_F: f64 = 110.0;

/// Order in which per-field range violations are reported
const FIELD_ORDER: [&str; 9] = [
    "blood_pressure_systolic",
    "blood_pressure_diastolic",
    "temperature",
    "weight",
    "height",
    "heart_rate",
    "respiratory_rate",
    "oxygen_saturation",
    "notes",
];

/// A rule a vital sign form failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VitalSignValidationError {
    #[error("At least one vital sign must be recorded")]
    NoVitalsRecorded,

    #[error("Systolic pressure must be greater than diastolic pressure")]
    SystolicNotGreaterThanDiastolic,

    #[error("{message}")]
    OutOfRange { field: String, message: String },

    #[error("Recorded time cannot be in the future")]
    FutureTimestamp,
}

/// Round half up to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

// Zero counts as "not entered", the same as an empty form field.
fn is_entered(value: f64) -> bool {
    value != 0.0 && value.is_finite()
}

/// BMI from weight in pounds and height in inches, rounded to one decimal.
///
/// Returns `None` when either value is missing or zero.
pub fn calculate_bmi(weight: Option<f64>, height: Option<f64>) -> Option<f64> {
    let weight = weight.filter(|w| is_entered(*w))?;
    let height = height.filter(|h| is_entered(*h))?;

    let weight_kg = weight * POUNDS_TO_KILOGRAMS;
    let height_m = height * INCHES_TO_METERS;
    let bmi = weight_kg / (height_m * height_m);

    bmi.is_finite().then(|| round_to_tenth(bmi))
}

/// Categorize a BMI value
pub fn bmi_category(bmi: Option<f64>) -> Option<BmiCategory> {
    let bmi = bmi.filter(|b| is_entered(*b))?;

    let category = if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    };
    Some(category)
}

/// Categorize blood pressure. Rules are checked in priority order and the
/// first match wins; a pair matching none of them is left uncategorized.
pub fn blood_pressure_category(
    systolic: Option<u16>,
    diastolic: Option<u16>,
) -> Option<BloodPressureCategory> {
    let (systolic, diastolic) = (systolic?, diastolic?);

    if systolic >= 180 || diastolic >= 120 {
        Some(BloodPressureCategory::HypertensiveCrisis)
    } else if systolic >= 140 || diastolic >= 90 {
        Some(BloodPressureCategory::Hypertension2)
    } else if (130..140).contains(&systolic) || (80..90).contains(&diastolic) {
        Some(BloodPressureCategory::Hypertension1)
    } else if (120..130).contains(&systolic) && diastolic < 80 {
        Some(BloodPressureCategory::Elevated)
    } else if systolic < 120 && diastolic < 80 {
        Some(BloodPressureCategory::Normal)
    } else {
        None
    }
}

/// Reject a measurement with none of the eight vitals filled in
pub fn validate_at_least_one_vital(
    measurement: &VitalSignMeasurement,
) -> Result<(), VitalSignValidationError> {
    if measurement.has_any_vital() {
        Ok(())
    } else {
        Err(VitalSignValidationError::NoVitalsRecorded)
    }
}

/// True when systolic exceeds diastolic, or when either is missing
pub fn validate_systolic_greater_than_diastolic(
    systolic: Option<u16>,
    diastolic: Option<u16>,
) -> bool {
    match (systolic, diastolic) {
        (Some(systolic), Some(diastolic)) => systolic > diastolic,
        _ => true,
    }
}

pub fn is_spo2_critical(spo2: Option<f64>) -> bool {
    matches!(spo2, Some(value) if value < CRITICAL_SPO2_PERCENT)
}

/// Systolic ≥ 180 or diastolic ≥ 120; each side is checked on its own
pub fn is_hypertensive_crisis(systolic: Option<u16>, diastolic: Option<u16>) -> bool {
    systolic.is_some_and(|s| s >= 180) || diastolic.is_some_and(|d| d >= 120)
}

/// Convert a temperature into `to_unit`, rounded to one decimal place.
///
/// The input is assumed to be in the other unit.
pub fn convert_temperature(value: f64, to_unit: TemperatureUnit) -> f64 {
    let converted = match to_unit {
        TemperatureUnit::Celsius => (value - 32.0) * 5.0 / 9.0,
        TemperatureUnit::Fahrenheit => value * 9.0 / 5.0 + 32.0,
    };
    round_to_tenth(converted)
}

/// Express a temperature entered in `from_unit` in °F
pub fn normalize_to_fahrenheit(value: f64, from_unit: TemperatureUnit) -> f64 {
    match from_unit {
        TemperatureUnit::Fahrenheit => value,
        TemperatureUnit::Celsius => convert_temperature(value, TemperatureUnit::Fahrenheit),
    }
}

/// Express a temperature entered in `from_unit` in °C
pub fn normalize_to_celsius(value: f64, from_unit: TemperatureUnit) -> f64 {
    match from_unit {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Fahrenheit => convert_temperature(value, TemperatureUnit::Celsius),
    }
}

/// Flag values outside their normal band.
///
/// `unit` is the unit `measurement.temperature` is in. Every check runs; the
/// findings come back in a fixed order: temperature, blood pressure, heart
/// rate, SpO2, respiratory rate.
pub fn check_abnormal_values(
    measurement: &VitalSignMeasurement,
    unit: TemperatureUnit,
) -> Vec<AbnormalFinding> {
    let mut findings = Vec::new();

    if let Some(temperature) = measurement.temperature {
        let fahrenheit = normalize_to_fahrenheit(temperature, unit);
        if !(95.0..=100.4).contains(&fahrenheit) {
            findings.push(AbnormalFinding::Temperature { fahrenheit });
        }
    }

    let systolic = measurement.blood_pressure_systolic;
    let diastolic = measurement.blood_pressure_diastolic;
    if is_hypertensive_crisis(systolic, diastolic) {
        findings.push(AbnormalFinding::HypertensiveCrisis { systolic, diastolic });
    }

    if let Some(bpm) = measurement.heart_rate {
        if !(60..=100).contains(&bpm) {
            findings.push(AbnormalFinding::HeartRate { bpm });
        }
    }

    if let Some(percent) = measurement.oxygen_saturation {
        if percent < 95.0 {
            findings.push(AbnormalFinding::OxygenSaturation { percent });
        }
    }

    if let Some(rate) = measurement.respiratory_rate {
        if !(12..=20).contains(&rate) {
            findings.push(AbnormalFinding::RespiratoryRate { rate });
        }
    }

    findings
}

/// Check every entered value against its hard-stop bounds.
///
/// All violations are reported, in form field order.
pub fn check_hard_stops(
    request: &CreateVitalSignRequest,
) -> Result<(), Vec<VitalSignValidationError>> {
    let mut violations: Vec<(usize, VitalSignValidationError)> = Vec::new();

    if let Err(validation_errors) = request.validate() {
        for (field, errors) in validation_errors.field_errors() {
            let position = FIELD_ORDER
                .iter()
                .position(|f| *f == field)
                .unwrap_or(FIELD_ORDER.len());
            for err in errors.iter() {
                let message = match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                };
                violations.push((
                    position,
                    VitalSignValidationError::OutOfRange {
                        field: field.to_string(),
                        message,
                    },
                ));
            }
        }
    }

    if let Some(temperature) = request.temperature {
        let fahrenheit = normalize_to_fahrenheit(temperature, request.temperature_unit);
        if !(TEMPERATURE_MIN_F..=TEMPERATURE_MAX_F).contains(&fahrenheit) {
            violations.push((
                2,
                VitalSignValidationError::OutOfRange {
                    field: "temperature".to_string(),
                    message: "Temperature must be between 90 and 110°F (32.2 and 43.3°C)"
                        .to_string(),
                },
            ));
        }
    }

    if violations.is_empty() {
        return Ok(());
    }

    violations.sort_by_key(|(position, _)| *position);
    Err(violations.into_iter().map(|(_, err)| err).collect())
}
