pub mod analyzer;
pub mod trends;
pub mod vital_signs;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use analyzer::VitalSignValidationError;
pub use vital_signs::{
    create_default_vital_sign_service, VitalSignService, VitalSignServiceError,
    VitalSignServiceTrait,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use vital_signs::create_mock_vital_sign_service;
