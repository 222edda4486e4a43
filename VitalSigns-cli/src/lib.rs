// VitalSigns-cli lib.rs
//
// Command-line front-end over the vital sign domain services.

// Public modules
pub mod commands;
pub mod config;
pub mod entities;
