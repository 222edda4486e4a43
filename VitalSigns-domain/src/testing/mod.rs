// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use std::sync::RwLock;

use chrono::Utc;

use crate::entities::conversions;
use crate::entities::{
    AbnormalFinding, CreateVitalSignRequest, SubmissionDecision, TemperatureUnit,
    VitalSignAssessment, VitalSignMeasurement, VitalSignReading, VitalSignTrends,
};
use crate::services::analyzer;
use crate::services::vital_signs::{VitalSignServiceError, VitalSignServiceTrait};

/// Mock implementation of the VitalSignServiceTrait for testing
pub struct MockVitalSignService {
    submissions: RwLock<Vec<CreateVitalSignRequest>>,
    findings: Vec<AbnormalFinding>,
    should_fail_validation: bool,
}

impl Default for MockVitalSignService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVitalSignService {
    /// Create a new mock vital sign service
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(Vec::new()),
            findings: Vec::new(),
            should_fail_validation: false,
        }
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Report these findings for every request
    pub fn with_findings(mut self, findings: Vec<AbnormalFinding>) -> Self {
        self.findings = findings;
        self
    }

    /// Requests that reached `prepare_submission` or `apply_update`
    pub fn submissions(&self) -> Vec<CreateVitalSignRequest> {
        self.submissions.read().unwrap().clone()
    }

    fn decide(
        &self,
        request: &CreateVitalSignRequest,
        confirmed: bool,
        id: String,
    ) -> Result<SubmissionDecision, VitalSignServiceError> {
        self.validate_create_request(request)?;
        self.submissions.write().unwrap().push(request.clone());

        if !self.findings.is_empty() && !confirmed {
            return Ok(SubmissionDecision::NeedsConfirmation(self.findings.clone()));
        }
        Ok(SubmissionDecision::Ready(conversions::convert_to_reading(
            request,
            id,
            Utc::now(),
        )))
    }
}

impl VitalSignServiceTrait for MockVitalSignService {
    fn validate_create_request(
        &self,
        _request: &CreateVitalSignRequest,
    ) -> Result<(), VitalSignServiceError> {
        if self.should_fail_validation {
            Err(VitalSignServiceError::ValidationError(
                "Validation failed - mock is configured to fail validation".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn assess(&self, request: &CreateVitalSignRequest) -> VitalSignAssessment {
        VitalSignAssessment {
            bmi: None,
            bmi_category: None,
            blood_pressure_category: None,
            spo2_critical: false,
            temperature_fahrenheit: request.temperature,
            temperature_celsius: None,
            abnormal_findings: self.findings.clone(),
        }
    }

    fn prepare_submission(
        &self,
        request: &CreateVitalSignRequest,
        confirmed: bool,
    ) -> Result<SubmissionDecision, VitalSignServiceError> {
        self.decide(request, confirmed, "mock-reading".to_string())
    }

    fn apply_update(
        &self,
        existing: &VitalSignReading,
        request: &CreateVitalSignRequest,
        confirmed: bool,
    ) -> Result<SubmissionDecision, VitalSignServiceError> {
        self.decide(request, confirmed, existing.id.clone())
    }

    fn to_edit_request(&self, reading: &VitalSignReading, unit: TemperatureUnit) -> CreateVitalSignRequest {
        conversions::convert_to_edit_request(reading, unit)
    }

    fn calculate_trends(
        &self,
        readings: &[VitalSignReading],
        timeframe_days: u32,
    ) -> Result<VitalSignTrends, VitalSignServiceError> {
        if readings.is_empty() {
            return Err(VitalSignServiceError::InsufficientData(
                "No readings available to calculate trends".to_string(),
            ));
        }

        Ok(VitalSignTrends {
            reading_count: readings.len(),
            period_days: timeframe_days,
            generated_at: Utc::now(),
            systolic: None,
            diastolic: None,
            heart_rate: None,
            temperature: None,
            weight: None,
            respiratory_rate: None,
            oxygen_saturation: None,
            blood_pressure_category: None,
            latest_bmi: None,
            latest_bmi_category: None,
            abnormal_reading_count: 0,
        })
    }

    fn is_hypertensive_crisis(&self, measurement: &VitalSignMeasurement) -> bool {
        analyzer::is_hypertensive_crisis(
            measurement.blood_pressure_systolic,
            measurement.blood_pressure_diastolic,
        )
    }
}

/// Factory function to create a mock vital sign service
pub fn create_mock_vital_sign_service() -> impl VitalSignServiceTrait {
    MockVitalSignService::new()
}
