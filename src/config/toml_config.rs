use crate::utils::error::{AtmError, Result};
use crate::utils::validation::{validate_email, validate_non_empty_string, validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_EMAIL_SUBJECT: &str = "ATM Notification";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bank: BankConfig,
    pub email: Option<EmailSettings>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    pub name: String,
    pub atms_file: String,
    pub accounts_file: String,
}

/// SMTP settings. Missing fields deserialize to empty values; an incomplete
/// section disables email instead of failing startup.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub enabled: bool,
    pub sender_email: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub subject: Option<String>,
}

// Keeps the password out of logs.
impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("enabled", &self.enabled)
            .field("sender_email", &self.sender_email)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"***")
            .field("subject", &self.subject)
            .finish()
    }
}

impl EmailSettings {
    /// Sender address, server and a non-zero port are the minimum to try a delivery.
    pub fn is_complete(&self) -> bool {
        !self.sender_email.trim().is_empty() && !self.smtp_server.trim().is_empty() && self.smtp_port > 0
    }

    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(DEFAULT_EMAIL_SUBJECT)
    }
}

impl Validate for EmailSettings {
    fn validate(&self) -> Result<()> {
        validate_email("email.sender_email", &self.sender_email)?;
        validate_non_empty_string("email.smtp_server", &self.smtp_server)?;
        validate_range("email.smtp_port", self.smtp_port, 1, u16::MAX)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AtmError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("bank.name", &self.bank.name)?;
        validate_path("bank.atms_file", &self.bank.atms_file)?;
        validate_path("bank.accounts_file", &self.bank.accounts_file)?;

        // Email problems are only reported here; the sender skips on its own.
        if let Some(email) = self.email.as_ref().filter(|e| e.enabled) {
            if let Err(e) = email.validate() {
                tracing::warn!("email notifications will be skipped: {}", e);
            }
        }

        Ok(())
    }

    pub fn email_enabled(&self) -> bool {
        self.email.as_ref().is_some_and(|e| e.enabled)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
