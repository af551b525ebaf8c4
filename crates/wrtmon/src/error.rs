//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wrtmon_config::ConfigError;
use wrtmon_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Device communication ─────────────────────────────────────────

    #[error("Update failed for device '{device}'")]
    #[diagnostic(
        code(wrtmon::update_failed),
        help(
            "{message}\n\
             Check that the router is reachable and rpcd is serving /ubus."
        )
    )]
    UpdateFailed { device: String, message: String },

    #[error("Authentication failed for device '{device}'")]
    #[diagnostic(
        code(wrtmon::auth_failed),
        help(
            "{message}\n\
             Verify username/password, or store the password with the system keyring\n\
             under service 'wrtmon', entry '{device}/password'."
        )
    )]
    AuthFailed { device: String, message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(wrtmon::not_found),
        help("Run: wrtmon {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wrtmon::validation))]
    Validation { field: String, reason: String },

    #[error("No devices configured")]
    #[diagnostic(
        code(wrtmon::no_devices),
        help(
            "Add a [devices.<id>] table with at least an address.\n\
             Expected at: {path}"
        )
    )]
    NoDevices { path: String },

    #[error(transparent)]
    #[diagnostic(code(wrtmon::config))]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(wrtmon::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(wrtmon::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UpdateFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoDevices { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { device, message } => {
                CliError::AuthFailed { device, message }
            }
            CoreError::UpdateFailed { device, message } => {
                CliError::UpdateFailed { device, message }
            }
            CoreError::DeviceNotFound { id } => CliError::NotFound {
                resource_type: "device".into(),
                identifier: id,
                list_command: "devices".into(),
            },
            CoreError::DuplicateDevice { id } => CliError::Validation {
                field: "devices".into(),
                reason: format!("device id '{id}' appears twice"),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "device".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoDevices => CliError::NoDevices {
                path: wrtmon_config::config_path().display().to_string(),
            },
            other @ ConfigError::Figment(_) => CliError::Config(other),
        }
    }
}
