use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use vital_signs_domain::entities::{CreateVitalSignRequest, TemperatureUnit, VitalSignReading};
use vital_signs_domain::services::analyzer::{bmi_category, calculate_bmi, convert_temperature};
use vital_signs_domain::services::{VitalSignServiceError, VitalSignServiceTrait};

use crate::config::AppConfig;
use crate::entities::common::PublicErrorResponse;
use crate::entities::vital_signs::{
    convert_to_public_assessment, convert_to_public_submission, PublicBmiResult,
    PublicSubmissionResponse, PublicTemperatureConversion, PublicValidationResponse,
};

#[derive(Debug, Parser)]
#[command(name = "vital-signs")]
#[command(version)]
#[command(about = "Validate and assess vital sign readings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute derived values and warnings for a vital sign form
    Assess {
        /// JSON request file; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Unit of the entered temperature, overriding the request
        #[arg(short, long)]
        unit: Option<TemperatureUnit>,
    },

    /// Check a vital sign form against its validation rules
    Validate {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Build the reading to submit, asking for confirmation of abnormal values
    Submit {
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Accept abnormal values without asking again
        #[arg(long)]
        confirm: bool,
    },

    /// Calculate BMI from weight and height
    Bmi {
        /// Weight in pounds
        #[arg(long)]
        weight: f64,

        /// Height in inches
        #[arg(long)]
        height: f64,
    },

    /// Convert a temperature between °F and °C
    Convert {
        #[arg(long, allow_hyphen_values = true)]
        value: f64,

        /// Target unit (F or C)
        #[arg(long)]
        to: TemperatureUnit,
    },

    /// Summarize a JSON array of readings
    Trends {
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Analysis period in days
        #[arg(short, long)]
        days: Option<u32>,
    },
}

/// What a command printed and whether it succeeded
#[derive(Debug)]
pub struct CommandOutput {
    pub body: Value,
    pub success: bool,
}

impl CommandOutput {
    fn ok<T: Serialize>(body: &T) -> Result<Self> {
        Ok(Self {
            body: serde_json::to_value(body)?,
            success: true,
        })
    }

    fn failed<T: Serialize>(body: &T) -> Result<Self> {
        Ok(Self {
            body: serde_json::to_value(body)?,
            success: false,
        })
    }

    /// Render the body as JSON text
    pub fn render(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(&self.body)?
        } else {
            serde_json::to_string(&self.body)?
        };
        Ok(text)
    }
}

/// Run `command`, reading JSON input from its `--input` file or from `stdin`
pub fn execute<S>(
    command: &Command,
    config: &AppConfig,
    service: &S,
    stdin: &mut dyn Read,
) -> Result<CommandOutput>
where
    S: VitalSignServiceTrait + ?Sized,
{
    match command {
        Command::Assess { input, unit } => {
            let raw = read_input(input.as_deref(), stdin)?;
            let request = parse_request(&raw, config.temperature_unit, *unit)?;
            let assessment = service.assess(&request);
            CommandOutput::ok(&convert_to_public_assessment(assessment))
        }
        Command::Validate { input } => {
            let raw = read_input(input.as_deref(), stdin)?;
            let request = parse_request(&raw, config.temperature_unit, None)?;
            match service.validate_create_request(&request) {
                Ok(()) => CommandOutput::ok(&PublicValidationResponse { valid: true }),
                Err(err) => service_failure(err),
            }
        }
        Command::Submit { input, confirm } => {
            let raw = read_input(input.as_deref(), stdin)?;
            let request = parse_request(&raw, config.temperature_unit, None)?;
            match service.prepare_submission(&request, *confirm) {
                Ok(decision) => {
                    let response = convert_to_public_submission(decision);
                    match &response {
                        PublicSubmissionResponse::Ready { reading } => {
                            info!(id = %reading.id, "Reading ready for submission");
                            CommandOutput::ok(&response)
                        }
                        PublicSubmissionResponse::NeedsConfirmation { abnormal_values } => {
                            warn!(count = abnormal_values.len(), "Abnormal values need confirmation");
                            CommandOutput::failed(&response)
                        }
                    }
                }
                Err(err) => service_failure(err),
            }
        }
        Command::Bmi { weight, height } => {
            let bmi = calculate_bmi(Some(*weight), Some(*height));
            CommandOutput::ok(&PublicBmiResult {
                bmi,
                category: bmi_category(bmi),
            })
        }
        Command::Convert { value, to } => CommandOutput::ok(&PublicTemperatureConversion {
            value: convert_temperature(*value, *to),
            unit: *to,
        }),
        Command::Trends { input, days } => {
            let raw = read_input(input.as_deref(), stdin)?;
            let readings: Vec<VitalSignReading> =
                serde_json::from_str(&raw).context("Failed to parse readings JSON")?;
            let days = days.unwrap_or(config.trend_days);
            debug!(readings = readings.len(), days, "Calculating trends");
            match service.calculate_trends(&readings, days) {
                Ok(trends) => CommandOutput::ok(&trends),
                Err(err) => service_failure(err),
            }
        }
    }
}

fn service_failure(err: VitalSignServiceError) -> Result<CommandOutput> {
    let message = err.to_string();
    let response = match err {
        VitalSignServiceError::ValidationError(_) => PublicErrorResponse::validation_error(&message),
        VitalSignServiceError::InsufficientData(_) => PublicErrorResponse::insufficient_data(&message),
    };
    CommandOutput::failed(&response)
}

fn read_input(path: Option<&Path>, stdin: &mut dyn Read) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut raw = String::new();
            stdin
                .read_to_string(&mut raw)
                .context("Failed to read input from stdin")?;
            Ok(raw)
        }
    }
}

/// Parse a form request. A request without `temperatureUnit` takes
/// `default_unit`; `unit_override` wins over both.
fn parse_request(
    raw: &str,
    default_unit: TemperatureUnit,
    unit_override: Option<TemperatureUnit>,
) -> Result<CreateVitalSignRequest> {
    let mut value: Value = serde_json::from_str(raw).context("Failed to parse request JSON")?;

    if let Value::Object(fields) = &mut value {
        if let Some(unit) = unit_override {
            fields.insert("temperatureUnit".to_string(), serde_json::to_value(unit)?);
        } else if !fields.contains_key("temperatureUnit") {
            fields.insert("temperatureUnit".to_string(), serde_json::to_value(default_unit)?);
        }
    }

    serde_json::from_value(value).context("Request does not match the vital sign form")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vital_signs_domain::entities::AbnormalFinding;
    use vital_signs_domain::services::VitalSignService;
    use vital_signs_domain::testing::MockVitalSignService;

    fn run(command: Command, input: &str) -> CommandOutput {
        let service = VitalSignService::new();
        let mut stdin = input.as_bytes();
        execute(&command, &AppConfig::default(), &service, &mut stdin).unwrap()
    }

    #[test]
    fn test_parse_cli_arguments() {
        let cli = Cli::try_parse_from(["vital-signs", "--pretty", "convert", "--value", "-40", "--to", "C"]).unwrap();
        assert!(cli.pretty);
        match cli.command {
            Command::Convert { value, to } => {
                assert_eq!(value, -40.0);
                assert_eq!(to, TemperatureUnit::Celsius);
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_assess_command() {
        let output = run(
            Command::Assess { input: None, unit: None },
            r#"{"bloodPressureSystolic": 190, "bloodPressureDiastolic": 100, "weight": 154, "height": 66}"#,
        );

        assert!(output.success);
        assert_eq!(output.body["bmi"], 24.9);
        assert_eq!(output.body["bmiCategory"]["label"], "Normal");
        assert_eq!(output.body["bloodPressureCategory"]["label"], "Hypertensive Crisis");
        assert_eq!(output.body["bloodPressureCategory"]["color"], "error");
        assert_eq!(
            output.body["abnormalValues"][0],
            "Blood Pressure: 190/100 mmHg (Hypertensive Crisis)"
        );
    }

    #[test]
    fn test_assess_command_unit_override() {
        let output = run(
            Command::Assess {
                input: None,
                unit: Some(TemperatureUnit::Celsius),
            },
            r#"{"temperature": 37.0}"#,
        );
        assert_eq!(output.body["temperatureFahrenheit"], 98.6);
        assert_eq!(output.body["abnormalValues"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_default_unit_from_config() {
        let service = VitalSignService::new();
        let config = AppConfig {
            temperature_unit: TemperatureUnit::Celsius,
            ..AppConfig::default()
        };
        let mut stdin = r#"{"temperature": 39.0}"#.as_bytes();

        let output = execute(&Command::Assess { input: None, unit: None }, &config, &service, &mut stdin).unwrap();
        assert_eq!(output.body["temperatureCelsius"], 39.0);
        assert_eq!(output.body["temperatureFahrenheit"], 102.2);
    }

    #[test]
    fn test_validate_command_failure() {
        let output = run(Command::Validate { input: None }, "{}");
        assert!(!output.success);
        assert_eq!(output.body["code"], "validation_error");
        assert_eq!(output.body["details"][0], "At least one vital sign must be recorded");
    }

    #[test]
    fn test_validate_command_success() {
        let output = run(Command::Validate { input: None }, r#"{"heartRate": 72}"#);
        assert!(output.success);
        assert_eq!(output.body["valid"], true);
    }

    #[test]
    fn test_submit_command_needs_confirmation() {
        let input = r#"{"heartRate": 130, "oxygenSaturation": 93}"#;

        let output = run(Command::Submit { input: None, confirm: false }, input);
        assert!(!output.success);
        assert_eq!(output.body["status"], "needs_confirmation");
        assert_eq!(output.body["abnormalValues"].as_array().unwrap().len(), 2);

        let output = run(Command::Submit { input: None, confirm: true }, input);
        assert!(output.success);
        assert_eq!(output.body["status"], "ready");
        assert_eq!(output.body["reading"]["heartRate"], 130);
    }

    #[test]
    fn test_submit_command_with_mock_service() {
        let service = MockVitalSignService::new()
            .with_findings(vec![AbnormalFinding::HeartRate { bpm: 45 }]);
        let mut stdin = r#"{"heartRate": 45}"#.as_bytes();

        let output = execute(
            &Command::Submit { input: None, confirm: false },
            &AppConfig::default(),
            &service,
            &mut stdin,
        )
        .unwrap();

        assert_eq!(output.body["abnormalValues"][0], "Heart Rate: 45 bpm (normal 60-100)");
        assert_eq!(service.submissions().len(), 1);
    }

    #[test]
    fn test_submit_command_validation_failure_from_mock() {
        let service = MockVitalSignService::new().with_validation_failure();
        let mut stdin = r#"{"heartRate": 72}"#.as_bytes();

        let output = execute(
            &Command::Submit { input: None, confirm: true },
            &AppConfig::default(),
            &service,
            &mut stdin,
        )
        .unwrap();

        assert!(!output.success);
        assert_eq!(output.body["code"], "validation_error");
        assert!(service.submissions().is_empty());
    }

    #[test]
    fn test_mock_service_agrees_on_hypertensive_crisis() {
        let mock = MockVitalSignService::new();
        let service = VitalSignService::new();

        for (systolic, diastolic) in [(179, 119), (180, 90), (150, 120), (120, 80)] {
            let measurement = vital_signs_domain::entities::VitalSignMeasurement {
                blood_pressure_systolic: Some(systolic),
                blood_pressure_diastolic: Some(diastolic),
                ..Default::default()
            };
            assert_eq!(
                mock.is_hypertensive_crisis(&measurement),
                service.is_hypertensive_crisis(&measurement)
            );
        }
    }

    #[test]
    fn test_bmi_and_convert_commands() {
        let output = run(Command::Bmi { weight: 154.0, height: 66.0 }, "");
        assert_eq!(output.body["bmi"], 24.9);
        assert_eq!(output.body["category"]["label"], "Normal");

        let output = run(Command::Bmi { weight: 150.0, height: 0.0 }, "");
        assert!(output.body["bmi"].is_null());

        let output = run(
            Command::Convert {
                value: 98.6,
                to: TemperatureUnit::Celsius,
            },
            "",
        );
        assert_eq!(output.body["value"], 37.0);
        assert_eq!(output.body["unit"], "C");
    }

    #[test]
    fn test_trends_command_without_readings() {
        let output = run(Command::Trends { input: None, days: Some(7) }, "[]");
        assert!(!output.success);
        assert_eq!(output.body["code"], "insufficient_data");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let service = VitalSignService::new();
        let mut stdin = "not json".as_bytes();
        let result = execute(
            &Command::Validate { input: None },
            &AppConfig::default(),
            &service,
            &mut stdin,
        );
        assert!(result.is_err());
    }
}
