use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::entities::conversions;
use crate::entities::{
    CreateVitalSignRequest, SubmissionDecision, TemperatureUnit, VitalSignAssessment,
    VitalSignMeasurement, VitalSignReading, VitalSignTrends,
};
use crate::services::analyzer::{self, VitalSignValidationError};
use crate::services::trends::summarize_trends;

/// Vital sign service errors
#[derive(Debug, Error)]
pub enum VitalSignServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Insufficient data error
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl From<VitalSignValidationError> for VitalSignServiceError {
    fn from(err: VitalSignValidationError) -> Self {
        VitalSignServiceError::ValidationError(err.to_string())
    }
}

/// Trait for vital sign service operations
pub trait VitalSignServiceTrait {
    /// Validate a vital sign form request against hard stops and cross-field rules
    fn validate_create_request(
        &self,
        request: &CreateVitalSignRequest,
    ) -> Result<(), VitalSignServiceError>;

    /// Compute derived values and warnings for a possibly partial request
    fn assess(&self, request: &CreateVitalSignRequest) -> VitalSignAssessment;

    /// Validate a new reading and decide whether it can be sent as is
    fn prepare_submission(
        &self,
        request: &CreateVitalSignRequest,
        confirmed: bool,
    ) -> Result<SubmissionDecision, VitalSignServiceError>;

    /// Same as `prepare_submission`, keeping the identity of an existing reading
    fn apply_update(
        &self,
        existing: &VitalSignReading,
        request: &CreateVitalSignRequest,
        confirmed: bool,
    ) -> Result<SubmissionDecision, VitalSignServiceError>;

    /// Load a stored reading into an edit form
    fn to_edit_request(&self, reading: &VitalSignReading, unit: TemperatureUnit) -> CreateVitalSignRequest;

    /// Summarize the readings of the last `timeframe_days`
    fn calculate_trends(
        &self,
        readings: &[VitalSignReading],
        timeframe_days: u32,
    ) -> Result<VitalSignTrends, VitalSignServiceError>;

    /// Check if a measurement indicates a hypertensive crisis
    fn is_hypertensive_crisis(&self, measurement: &VitalSignMeasurement) -> bool;
}

/// Vital sign service for domain logic
#[derive(Debug, Clone)]
pub struct VitalSignService {
    require_confirmation: bool,
}

impl Default for VitalSignService {
    fn default() -> Self {
        Self::new()
    }
}

impl VitalSignService {
    /// Create a new vital sign service. Abnormal values require confirmation.
    pub fn new() -> Self {
        Self {
            require_confirmation: true,
        }
    }

    /// Set whether abnormal values have to be confirmed before submitting
    pub fn with_confirmation_required(mut self, required: bool) -> Self {
        self.require_confirmation = required;
        self
    }

    fn finalize(
        &self,
        request: &CreateVitalSignRequest,
        confirmed: bool,
        id: String,
        recorded_at: DateTime<Utc>,
    ) -> Result<SubmissionDecision, VitalSignServiceError> {
        self.validate_create_request(request)?;

        let findings = analyzer::check_abnormal_values(&request.to_measurement(), request.temperature_unit);
        if !findings.is_empty() && self.require_confirmation && !confirmed {
            info!(
                findings = findings.len(),
                "Abnormal values found, waiting for confirmation"
            );
            return Ok(SubmissionDecision::NeedsConfirmation(findings));
        }

        let reading = conversions::convert_to_reading(request, id, recorded_at);
        debug!(id = %reading.id, "Vital sign reading ready for submission");
        Ok(SubmissionDecision::Ready(reading))
    }
}

fn reject(message: String) -> VitalSignServiceError {
    warn!("Rejected vital sign request: {}", message);
    VitalSignServiceError::ValidationError(message)
}

impl VitalSignServiceTrait for VitalSignService {
    fn validate_create_request(
        &self,
        request: &CreateVitalSignRequest,
    ) -> Result<(), VitalSignServiceError> {
        // Hard stops first: out-of-range values block the form outright
        if let Err(violations) = analyzer::check_hard_stops(request) {
            let message = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<String>>()
                .join("; ");
            return Err(reject(message));
        }

        if let Some(recorded_at) = request.recorded_at {
            if recorded_at > Utc::now() {
                return Err(reject(VitalSignValidationError::FutureTimestamp.to_string()));
            }
        }

        if let Err(err) = analyzer::validate_at_least_one_vital(&request.to_measurement()) {
            return Err(reject(err.to_string()));
        }

        if !analyzer::validate_systolic_greater_than_diastolic(
            request.blood_pressure_systolic,
            request.blood_pressure_diastolic,
        ) {
            return Err(reject(
                VitalSignValidationError::SystolicNotGreaterThanDiastolic.to_string(),
            ));
        }

        Ok(())
    }

    fn assess(&self, request: &CreateVitalSignRequest) -> VitalSignAssessment {
        let unit = request.temperature_unit;
        let measurement = request.to_measurement();

        let bmi = analyzer::calculate_bmi(request.weight, request.height);
        let blood_pressure_category = analyzer::blood_pressure_category(
            request.blood_pressure_systolic,
            request.blood_pressure_diastolic,
        );
        let spo2_critical = analyzer::is_spo2_critical(request.oxygen_saturation);

        if self.is_hypertensive_crisis(&measurement) {
            warn!(
                systolic = ?request.blood_pressure_systolic,
                diastolic = ?request.blood_pressure_diastolic,
                "Hypertensive crisis values entered"
            );
        }
        if spo2_critical {
            warn!(spo2 = ?request.oxygen_saturation, "Critical oxygen saturation entered");
        }

        let assessment = VitalSignAssessment {
            bmi,
            bmi_category: analyzer::bmi_category(bmi),
            blood_pressure_category,
            spo2_critical,
            temperature_fahrenheit: request
                .temperature
                .map(|t| analyzer::normalize_to_fahrenheit(t, unit)),
            temperature_celsius: request
                .temperature
                .map(|t| analyzer::normalize_to_celsius(t, unit)),
            abnormal_findings: analyzer::check_abnormal_values(&measurement, unit),
        };

        debug!(
            bmi = ?assessment.bmi,
            findings = assessment.abnormal_findings.len(),
            "Assessed vital signs"
        );
        assessment
    }

    #[instrument(skip(self, request))]
    fn prepare_submission(
        &self,
        request: &CreateVitalSignRequest,
        confirmed: bool,
    ) -> Result<SubmissionDecision, VitalSignServiceError> {
        self.finalize(request, confirmed, Uuid::new_v4().to_string(), Utc::now())
    }

    #[instrument(skip(self, existing, request), fields(id = %existing.id))]
    fn apply_update(
        &self,
        existing: &VitalSignReading,
        request: &CreateVitalSignRequest,
        confirmed: bool,
    ) -> Result<SubmissionDecision, VitalSignServiceError> {
        let decision = self.finalize(request, confirmed, existing.id.clone(), existing.recorded_at)?;

        // Re-saving a °C form must not shift the stored °F value through rounding
        Ok(match decision {
            SubmissionDecision::Ready(mut reading) => {
                if conversions::is_temperature_unchanged(existing, request) {
                    reading.measurement.temperature = existing.measurement.temperature;
                }
                SubmissionDecision::Ready(reading)
            }
            other => other,
        })
    }

    fn to_edit_request(&self, reading: &VitalSignReading, unit: TemperatureUnit) -> CreateVitalSignRequest {
        conversions::convert_to_edit_request(reading, unit)
    }

    #[instrument(skip(self, readings), fields(total = readings.len()))]
    fn calculate_trends(
        &self,
        readings: &[VitalSignReading],
        timeframe_days: u32,
    ) -> Result<VitalSignTrends, VitalSignServiceError> {
        summarize_trends(readings, timeframe_days, Utc::now()).ok_or_else(|| {
            VitalSignServiceError::InsufficientData(format!(
                "No readings available in the last {} days",
                timeframe_days
            ))
        })
    }

    fn is_hypertensive_crisis(&self, measurement: &VitalSignMeasurement) -> bool {
        analyzer::is_hypertensive_crisis(
            measurement.blood_pressure_systolic,
            measurement.blood_pressure_diastolic,
        )
    }
}

/// Create a default vital sign service
pub fn create_default_vital_sign_service() -> impl VitalSignServiceTrait + Send + Sync {
    VitalSignService::new()
}

/// Create a mock vital sign service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_vital_sign_service() -> impl VitalSignServiceTrait + Send + Sync {
    crate::testing::MockVitalSignService::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AbnormalFinding, BloodPressureCategory, BmiCategory};
    use chrono::Duration;

    /// Create a request with a normal blood pressure reading
    fn create_test_request(systolic: u16, diastolic: u16) -> CreateVitalSignRequest {
        CreateVitalSignRequest {
            blood_pressure_systolic: Some(systolic),
            blood_pressure_diastolic: Some(diastolic),
            heart_rate: Some(72),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_create_request_valid() {
        let service = VitalSignService::new();
        assert!(service.validate_create_request(&create_test_request(120, 80)).is_ok());
    }

    #[test]
    fn test_validate_create_request_empty() {
        let service = VitalSignService::new();
        let result = service.validate_create_request(&CreateVitalSignRequest::default());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("At least one vital sign"));
    }

    #[test]
    fn test_validate_create_request_notes_only() {
        let service = VitalSignService::new();
        let request = CreateVitalSignRequest {
            notes: Some("Refused measurement".to_string()),
            ..Default::default()
        };
        assert!(service.validate_create_request(&request).is_err());
    }

    #[test]
    fn test_validate_create_request_invalid_systolic() {
        let service = VitalSignService::new();
        let result = service.validate_create_request(&create_test_request(350, 80));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Systolic"));
    }

    #[test]
    fn test_validate_create_request_reports_every_hard_stop() {
        let service = VitalSignService::new();
        let request = CreateVitalSignRequest {
            blood_pressure_diastolic: Some(250),
            respiratory_rate: Some(2),
            ..Default::default()
        };

        let message = service.validate_create_request(&request).unwrap_err().to_string();
        assert!(message.contains("Diastolic must be between 20 and 200"));
        assert!(message.contains("Respiratory rate must be between 5 and 60"));
    }

    #[test]
    fn test_validate_create_request_systolic_not_greater_than_diastolic() {
        let service = VitalSignService::new();
        let result = service.validate_create_request(&create_test_request(80, 80));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("greater than"));
    }

    #[test]
    fn test_validate_create_request_future_timestamp() {
        let service = VitalSignService::new();
        let request = CreateVitalSignRequest {
            recorded_at: Some(Utc::now() + Duration::days(1)),
            ..create_test_request(120, 80)
        };
        let result = service.validate_create_request(&request);
        assert!(result.unwrap_err().to_string().contains("future"));
    }

    #[test]
    fn test_assess_partial_request() {
        let service = VitalSignService::new();
        let request = CreateVitalSignRequest {
            weight: Some(154.0),
            height: Some(66.0),
            temperature: Some(38.5),
            temperature_unit: TemperatureUnit::Celsius,
            oxygen_saturation: Some(88.0),
            ..Default::default()
        };

        let assessment = service.assess(&request);
        assert_eq!(assessment.bmi, Some(24.9));
        assert_eq!(assessment.bmi_category, Some(BmiCategory::Normal));
        assert_eq!(assessment.blood_pressure_category, None);
        assert!(assessment.spo2_critical);
        assert_eq!(assessment.temperature_celsius, Some(38.5));
        assert_eq!(assessment.temperature_fahrenheit, Some(101.3));
        assert_eq!(
            assessment.abnormal_messages(),
            vec![
                "Temperature: 101.3°F (normal 95-100.4°F)".to_string(),
                "SpO2: 88% (normal ≥95%)".to_string(),
            ]
        );
    }

    #[test]
    fn test_assess_blood_pressure_category() {
        let service = VitalSignService::new();
        let assessment = service.assess(&create_test_request(150, 95));
        assert_eq!(
            assessment.blood_pressure_category,
            Some(BloodPressureCategory::Hypertension2)
        );
        assert!(!assessment.has_abnormal_values());
    }

    #[test]
    fn test_prepare_submission_ready() {
        let service = VitalSignService::new();
        let request = CreateVitalSignRequest {
            temperature: Some(37.0),
            temperature_unit: TemperatureUnit::Celsius,
            ..create_test_request(118, 76)
        };

        match service.prepare_submission(&request, false).unwrap() {
            SubmissionDecision::Ready(reading) => {
                assert!(Uuid::parse_str(&reading.id).is_ok());
                assert_eq!(reading.measurement.temperature, Some(98.6));
                assert_eq!(reading.measurement.blood_pressure_systolic, Some(118));
            }
            other => panic!("Expected a ready reading, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_submission_needs_confirmation() {
        let service = VitalSignService::new();
        let request = create_test_request(185, 100);

        match service.prepare_submission(&request, false).unwrap() {
            SubmissionDecision::NeedsConfirmation(findings) => {
                assert_eq!(
                    findings,
                    vec![AbnormalFinding::HypertensiveCrisis {
                        systolic: Some(185),
                        diastolic: Some(100),
                    }]
                );
            }
            other => panic!("Expected confirmation, got {:?}", other),
        }

        let confirmed = service.prepare_submission(&request, true).unwrap();
        assert!(matches!(confirmed, SubmissionDecision::Ready(_)));
    }

    #[test]
    fn test_prepare_submission_without_confirmation_step() {
        let service = VitalSignService::new().with_confirmation_required(false);
        let decision = service.prepare_submission(&create_test_request(185, 100), false).unwrap();
        assert!(matches!(decision, SubmissionDecision::Ready(_)));
    }

    #[test]
    fn test_prepare_submission_rejects_invalid() {
        let service = VitalSignService::new();
        let result = service.prepare_submission(&create_test_request(80, 120), true);
        assert!(matches!(result, Err(VitalSignServiceError::ValidationError(_))));
    }

    #[test]
    fn test_apply_update_keeps_identity() {
        let service = VitalSignService::new();
        let recorded_at = Utc::now() - Duration::days(2);
        let existing = VitalSignReading {
            id: "existing-id".to_string(),
            recorded_at,
            measurement: VitalSignMeasurement {
                heart_rate: Some(70),
                ..Default::default()
            },
            bmi: None,
        };

        let mut request = service.to_edit_request(&existing, TemperatureUnit::Fahrenheit);
        request.heart_rate = Some(74);
        request.recorded_at = None;

        match service.apply_update(&existing, &request, false).unwrap() {
            SubmissionDecision::Ready(reading) => {
                assert_eq!(reading.id, "existing-id");
                assert_eq!(reading.recorded_at, recorded_at);
                assert_eq!(reading.measurement.heart_rate, Some(74));
            }
            other => panic!("Expected a ready reading, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_update_uses_supplied_recorded_at() {
        let service = VitalSignService::new();
        let existing = VitalSignReading {
            id: "existing-id".to_string(),
            recorded_at: Utc::now() - Duration::days(2),
            measurement: VitalSignMeasurement {
                heart_rate: Some(70),
                ..Default::default()
            },
            bmi: None,
        };
        let corrected = Utc::now() - Duration::days(3);

        let mut request = service.to_edit_request(&existing, TemperatureUnit::Fahrenheit);
        request.recorded_at = Some(corrected);

        match service.apply_update(&existing, &request, false).unwrap() {
            SubmissionDecision::Ready(reading) => {
                assert_eq!(reading.id, "existing-id");
                assert_eq!(reading.recorded_at, corrected);
            }
            other => panic!("Expected a ready reading, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_update_unchanged_celsius_form_keeps_stored_temperature() {
        let service = VitalSignService::new();
        let existing = VitalSignReading {
            id: "existing-id".to_string(),
            recorded_at: Utc::now() - Duration::days(1),
            measurement: VitalSignMeasurement {
                temperature: Some(100.5),
                ..Default::default()
            },
            bmi: None,
        };

        let request = service.to_edit_request(&existing, TemperatureUnit::Celsius);
        assert_eq!(request.temperature, Some(38.1));

        match service.apply_update(&existing, &request, true).unwrap() {
            SubmissionDecision::Ready(reading) => {
                assert_eq!(reading.measurement.temperature, Some(100.5));
            }
            other => panic!("Expected a ready reading, got {:?}", other),
        }

        // An edited value is converted as usual
        let mut edited = request.clone();
        edited.temperature = Some(37.0);
        match service.apply_update(&existing, &edited, true).unwrap() {
            SubmissionDecision::Ready(reading) => {
                assert_eq!(reading.measurement.temperature, Some(98.6));
            }
            other => panic!("Expected a ready reading, got {:?}", other),
        }
    }

    #[test]
    fn test_calculate_trends_window_longer_than_calendar() {
        let service = VitalSignService::new();
        let reading = VitalSignReading {
            id: "old".to_string(),
            recorded_at: Utc::now() - Duration::days(400),
            measurement: VitalSignMeasurement {
                heart_rate: Some(72),
                ..Default::default()
            },
            bmi: None,
        };

        let trends = service.calculate_trends(&[reading], 200_000_000).unwrap();
        assert_eq!(trends.reading_count, 1);
    }

    #[test]
    fn test_calculate_trends_empty_readings() {
        let service = VitalSignService::new();
        let result = service.calculate_trends(&[], 30);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No readings"));
    }

    #[test]
    fn test_is_hypertensive_crisis() {
        let service = VitalSignService::new();
        let crisis = VitalSignMeasurement {
            blood_pressure_systolic: Some(200),
            blood_pressure_diastolic: Some(110),
            ..Default::default()
        };
        let diastolic_only = VitalSignMeasurement {
            blood_pressure_diastolic: Some(120),
            ..Default::default()
        };
        let normal = VitalSignMeasurement {
            blood_pressure_systolic: Some(120),
            blood_pressure_diastolic: Some(80),
            ..Default::default()
        };

        assert!(service.is_hypertensive_crisis(&crisis));
        assert!(service.is_hypertensive_crisis(&diastolic_only));
        assert!(!service.is_hypertensive_crisis(&normal));
    }
}
