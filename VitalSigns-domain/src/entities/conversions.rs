use chrono::{DateTime, Utc};

use crate::entities::vital_signs::{
    CreateVitalSignRequest, TemperatureUnit, VitalSignMeasurement, VitalSignReading,
};
use crate::services::analyzer::{calculate_bmi, normalize_to_celsius, normalize_to_fahrenheit};

/// Conversion functions between form requests and submitted readings.
/// These follow the pattern convert_to_[target]_[model].

/// Convert a form request into a measurement with temperature in °F
pub fn convert_to_fahrenheit_measurement(request: &CreateVitalSignRequest) -> VitalSignMeasurement {
    VitalSignMeasurement {
        temperature: request
            .temperature
            .map(|t| normalize_to_fahrenheit(t, request.temperature_unit)),
        ..request.to_measurement()
    }
}

/// Convert a form request into the reading sent to the vital signs API.
///
/// `recorded_at` is used when the request does not carry its own timestamp.
pub fn convert_to_reading(
    request: &CreateVitalSignRequest,
    id: String,
    recorded_at: DateTime<Utc>,
) -> VitalSignReading {
    let measurement = convert_to_fahrenheit_measurement(request);
    let bmi = calculate_bmi(measurement.weight, measurement.height);

    VitalSignReading {
        id,
        recorded_at: request.recorded_at.unwrap_or(recorded_at),
        measurement,
        bmi,
    }
}

/// Load a stored reading into an edit form showing temperature in `unit`
pub fn convert_to_edit_request(
    reading: &VitalSignReading,
    unit: TemperatureUnit,
) -> CreateVitalSignRequest {
    let measurement = &reading.measurement;

    CreateVitalSignRequest {
        blood_pressure_systolic: measurement.blood_pressure_systolic,
        blood_pressure_diastolic: measurement.blood_pressure_diastolic,
        temperature: edit_temperature(measurement, unit),
        temperature_unit: unit,
        weight: measurement.weight,
        height: measurement.height,
        heart_rate: measurement.heart_rate,
        respiratory_rate: measurement.respiratory_rate,
        oxygen_saturation: measurement.oxygen_saturation,
        notes: measurement.notes.clone(),
        recorded_at: Some(reading.recorded_at),
    }
}

/// Whether the form still holds the stored temperature exactly as it was loaded
pub fn is_temperature_unchanged(reading: &VitalSignReading, request: &CreateVitalSignRequest) -> bool {
    edit_temperature(&reading.measurement, request.temperature_unit) == request.temperature
}

fn edit_temperature(measurement: &VitalSignMeasurement, unit: TemperatureUnit) -> Option<f64> {
    measurement.temperature.map(|t| match unit {
        TemperatureUnit::Fahrenheit => t,
        TemperatureUnit::Celsius => normalize_to_celsius(t, TemperatureUnit::Fahrenheit),
    })
}
