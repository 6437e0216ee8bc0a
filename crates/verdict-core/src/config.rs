//! Configuration loading for .verdict.toml

use garde::Validate;
use serde::{Deserialize, Serialize};

/// Root configuration from .verdict.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VerdictConfig {
    #[serde(default)]
    pub checker: CheckerSettings,
}

/// Settings for the external checker tool.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[garde(context(()))]
pub struct CheckerSettings {
    /// Checker binary to invoke. Required to run a check (the CLI `--bin`
    /// flag overrides it).
    #[garde(custom(validate_command))]
    pub command: Option<String>,

    /// Base arguments passed on every invocation. The format flag is
    /// negotiated on top of these, never written into them.
    #[garde(skip)]
    pub args: Option<Vec<String>>,

    /// Kill the checker after this long.
    #[garde(custom(validate_timeout))]
    pub timeout_ms: Option<u64>,

    /// File extensions the checker understands; watch mode only re-checks
    /// matching files. Absent means every changed file.
    #[garde(skip)]
    pub extensions: Option<Vec<String>>,
}

/// Default base arguments when the config declares none.
pub const DEFAULT_ARGS: &[&str] = &["check"];

/// Default checker timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

impl CheckerSettings {
    #[must_use]
    pub fn effective_args(&self) -> Vec<String> {
        self.args.clone().unwrap_or_else(|| {
            DEFAULT_ARGS.iter().map(ToString::to_string).collect()
        })
    }

    #[must_use]
    pub const fn effective_timeout_ms(&self) -> u64 {
        match self.timeout_ms {
            Some(ms) => ms,
            None => DEFAULT_TIMEOUT_MS,
        }
    }
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn validate_command(value: &Option<String>, _ctx: &()) -> garde::Result {
    if let Some(v) = value
        && v.trim().is_empty()
    {
        return Err(garde::Error::new(
            "checker command must not be empty - name the binary to invoke",
        ));
    }
    Ok(())
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn validate_timeout(value: &Option<u64>, _ctx: &()) -> garde::Result {
    if let Some(v) = value {
        if *v >= 100 && *v <= 600_000 {
            Ok(())
        } else {
            Err(garde::Error::new(format!(
                "{v} is outside the range 100-600000 ms - common values are 5000 or 10000"
            )))
        }
    } else {
        Ok(())
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("config validation error: {0}")]
    Validation(String),
}

impl VerdictConfig {
    /// Load configuration from a TOML file with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read.
    /// Returns `ConfigError::Parse` if the TOML content is invalid.
    /// Returns `ConfigError::Validation` if checker settings fail validation.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config
            .checker
            .validate()
            .map_err(|e| ConfigError::Validation(format!("checker: {e}")))?;

        Ok(config)
    }

    /// Load from default location (.verdict.toml in current directory)
    #[must_use]
    pub fn load_default() -> Option<Self> {
        let cwd = std::env::current_dir().ok()?;
        let config_path = cwd.join(".verdict.toml");

        if !config_path.exists() {
            return None;
        }

        Self::from_file(&config_path).ok()
    }

    /// Load from default location, returning error details on failure.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` with details if loading or validation fails.
    pub fn load_default_strict() -> Result<Option<Self>, ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(e.to_string()))?;
        let config_path = cwd.join(".verdict.toml");

        if !config_path.exists() {
            return Ok(None);
        }

        Self::from_file(&config_path).map(Some)
    }
}
