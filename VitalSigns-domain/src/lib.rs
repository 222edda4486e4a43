// VitalSigns Domain
// This crate contains the vital sign validation and clinical computation logic

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
