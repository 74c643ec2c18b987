use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use crate::error::{PruneError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Robot,
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RobotStatus {
    Ok { message: String },
    Error { code: String, message: String },
}

pub fn robot_ok<T: Serialize>(message: impl Into<String>, data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok {
            message: message.into(),
        },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
    }
}

pub fn robot_error(
    code: impl Into<String>,
    message: impl Into<String>,
) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::Error {
            code: code.into(),
            message: message.into(),
        },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: serde_json::Value::Null,
    }
}

pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|err| PruneError::Serialization(format!("serialize output: {err}")))
}

/// Where success messages and errors are shown to the operator.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    format: OutputFormat,
    pretty: bool,
}

impl Reporter {
    #[must_use]
    pub const fn new(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }

    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Human mode prints `Success: <message>` to stdout; robot mode prints
    /// the JSON envelope carrying `data`.
    pub fn success<T: Serialize>(&self, message: &str, data: T) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{} {message}", style("Success:").green().bold());
            }
            OutputFormat::Robot => {
                println!("{}", render_json(&robot_ok(message, data), self.pretty)?);
            }
        }
        Ok(())
    }

    /// Human errors go to stderr; robot errors to stdout so callers parse
    /// one stream.
    pub fn error(&self, err: &PruneError) {
        match self.format {
            OutputFormat::Human => eprintln!("{}", human_error(err)),
            OutputFormat::Robot => {
                let envelope = robot_error(err.code(), err.to_string());
                match robot_error_line(&envelope, err, self.pretty) {
                    Ok(payload) => println!("{payload}"),
                    Err(line) => eprintln!("{line}"),
                }
            }
        }
    }
}

fn human_error(err: &PruneError) -> String {
    format!("{} {err}", style("Error:").red().bold())
}

/// The JSON envelope, or the human `Error:` line when it cannot be rendered.
fn robot_error_line<T: Serialize>(
    envelope: &RobotResponse<T>,
    err: &PruneError,
    pretty: bool,
) -> std::result::Result<String, String> {
    render_json(envelope, pretty).map_err(|_| human_error(err))
}
