//! Config validation CLI tool
//!
//! Validates a repgate configuration file and reports any errors.

use repgate_config::ConfigError;
use repgate_util::{default_config_path, format_duration};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a repgate configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match repgate_config::load_config(&config_path) {
        Ok(policy) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", repgate_config::CURRENT_CONFIG_VERSION);
            println!(
                "  Grace period: {}",
                format_duration(std::time::Duration::from_secs(
                    policy.access.grace_period_seconds
                ))
            );
            println!("  Time policy: {:?}", policy.access.time_policy);
            println!("  Warnings: {}", policy.access.warnings.len());
            println!("  Workouts: {}", policy.workouts.len());
            println!("  Targets: {}", policy.targets.len());

            if !policy.workouts.is_empty() {
                println!();
                println!("Workouts:");
                for preset in &policy.workouts {
                    println!(
                        "  - {} [{} x{}]: {} -> {}",
                        preset.id,
                        preset.workout.kind,
                        preset.workout.reps,
                        preset.label,
                        format_duration(preset.workout.earned_time())
                    );
                }
            }

            if !policy.targets.is_empty() {
                println!();
                println!("Targets:");
                for target in &policy.targets {
                    match &target.category {
                        Some(category) => {
                            println!("  - {} ({})", target.display_name(), category)
                        }
                        None => println!("  - {}", target.display_name()),
                    }
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        repgate_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
