// Domain entities and value objects
pub mod assessment;
pub mod categories;
pub mod conversions;
pub mod vital_signs;

// Re-export common types for easier imports
pub use assessment::{SubmissionDecision, VitalSignAssessment, VitalSignTrends, VitalStatistics};
pub use categories::{AbnormalFinding, BloodPressureCategory, BmiCategory, CategoryLabel, SeverityColor};
pub use vital_signs::{CreateVitalSignRequest, TemperatureUnit, VitalSignMeasurement, VitalSignReading};
