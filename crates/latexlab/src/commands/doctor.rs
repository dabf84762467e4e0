//! Doctor command - environment health check

use crate::context::Context;
use crate::output::print_json;
use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use latexlab_core::config::Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Doctor command JSON output schema
#[derive(Debug, Serialize, Deserialize)]
struct DoctorOutput {
    schema_version: String,
    config: ConfigInfo,
    timestamp: String,
    checks: Vec<Check>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigInfo {
    /// `None` when running on built-in defaults
    path: Option<String>,
    engine: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Check {
    id: String,
    name: String,
    status: CheckStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

/// Run environment health check
///
/// Always returns Ok(()): problems are reported in the output, not the exit code.
pub fn run(config_path: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
    let mut checks = Vec::new();

    let (config, path) = match Context::new(config_path.clone(), verbose) {
        Ok(ctx) => {
            let message = match &ctx.config_path {
                Some(path) => format!("{} is valid", path.display()),
                None => "No latexlab.toml found, using defaults".to_string(),
            };
            checks.push(Check {
                id: "config_valid".to_string(),
                name: "Configuration file".to_string(),
                status: CheckStatus::Ok,
                message,
                details: None,
            });
            (ctx.config, ctx.config_path)
        }
        Err(e) => {
            checks.push(Check {
                id: "config_valid".to_string(),
                name: "Configuration file".to_string(),
                status: CheckStatus::Error,
                message: format!("{:#}", e),
                details: None,
            });
            (Config::default(), config_path)
        }
    };

    checks.push(engine_check(&config.engine.default));
    if let Some(check) = templates_check(&config) {
        checks.push(check);
    }

    let output = DoctorOutput {
        schema_version: "1.0".to_string(),
        config: ConfigInfo {
            path: path.map(|p| p.display().to_string()),
            engine: config.engine.default.clone(),
        },
        timestamp: Utc::now().to_rfc3339(),
        checks,
    };

    if json {
        print_json(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_human_readable(&output);
    }

    Ok(())
}

fn engine_check(engine: &str) -> Check {
    match latexlab_tex::locate_engine(engine) {
        Some(info) => {
            let mut details = BTreeMap::new();
            details.insert(
                "path".to_string(),
                serde_json::Value::String(info.path.display().to_string()),
            );
            if let Some(version) = &info.version {
                details.insert(
                    "version".to_string(),
                    serde_json::Value::String(version.clone()),
                );
            }
            Check {
                id: "engine_available".to_string(),
                name: "LaTeX engine".to_string(),
                status: CheckStatus::Ok,
                message: format!("{} available", info.name),
                details: Some(details),
            }
        }
        None => Check {
            id: "engine_available".to_string(),
            name: "LaTeX engine".to_string(),
            status: CheckStatus::Error,
            message: format!("{} not found on PATH", engine),
            details: None,
        },
    }
}

fn templates_check(config: &Config) -> Option<Check> {
    let dir = config.templates.dir.as_ref()?;
    let (status, message) = if dir.is_dir() {
        (CheckStatus::Ok, format!("{} exists", dir.display()))
    } else {
        (
            CheckStatus::Warning,
            format!("{} is not a directory", dir.display()),
        )
    };
    Some(Check {
        id: "templates_dir".to_string(),
        name: "Template directory".to_string(),
        status,
        message,
        details: None,
    })
}

/// Print human-readable output
fn print_human_readable(output: &DoctorOutput) {
    println!("{}", "Environment Health Check".bold());
    println!();

    println!("{}", "Config:".bold());
    println!(
        "  File: {}",
        output.config.path.as_deref().unwrap_or("(defaults)")
    );
    println!("  Engine: {}", output.config.engine);
    println!();

    println!("{}", "Checks:".bold());
    for check in &output.checks {
        let status_str = match check.status {
            CheckStatus::Ok => "✓".green(),
            CheckStatus::Warning => "⚠".yellow(),
            CheckStatus::Error => "✗".red(),
        };

        println!("  {} {}: {}", status_str, check.name.bold(), check.message);

        if let Some(details) = &check.details {
            for (key, value) in details {
                println!("      {}: {}", key, value);
            }
        }
    }

    println!();
    println!("Timestamp: {}", output.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_engine_is_an_error_check() {
        let check = engine_check("latexlab-no-such-engine");
        assert_eq!(check.status, CheckStatus::Error);
        assert!(check.message.contains("latexlab-no-such-engine"));
    }

    #[test]
    fn test_templates_check_skipped_without_dir() {
        assert!(templates_check(&Config::default()).is_none());
    }

    #[test]
    fn test_templates_check_warns_on_missing_dir() {
        let mut config = Config::default();
        config.templates.dir = Some(PathBuf::from("/definitely/not/here"));
        let check = templates_check(&config).unwrap();
        assert_eq!(check.status, CheckStatus::Warning);
    }
}
