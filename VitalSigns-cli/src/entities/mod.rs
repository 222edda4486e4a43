// Public entities for the VitalSigns CLI
// This module contains the JSON shapes printed by the commands

// Vital sign assessment, submission and calculator output
pub mod vital_signs;

// Common entities for error reporting
pub mod common;
