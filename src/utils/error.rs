use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtmError {
    #[error("No account is authenticated for this session")]
    NotAuthenticated,

    #[error("ATM with id {atm_id} not found")]
    AtmNotFound { atm_id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Notification delivery failed: {message}")]
    Notification { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Session,
    Lookup,
    Validation,
    Configuration,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AtmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AtmError::NotAuthenticated => ErrorCategory::Session,
            AtmError::AtmNotFound { .. } => ErrorCategory::Lookup,
            AtmError::Validation { .. } => ErrorCategory::Validation,
            AtmError::Config { .. }
            | AtmError::InvalidConfigValue { .. }
            | AtmError::Toml(_) => ErrorCategory::Configuration,
            AtmError::Notification { .. } => ErrorCategory::Delivery,
            AtmError::Io(_) | AtmError::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Delivery => ErrorSeverity::Low,
            ErrorCategory::Validation | ErrorCategory::Session => ErrorSeverity::Medium,
            ErrorCategory::Lookup | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AtmError::NotAuthenticated => "Please sign in with your card and PIN first.".to_string(),
            AtmError::AtmNotFound { atm_id } => format!("ATM '{}' is not registered with the bank.", atm_id),
            AtmError::Validation { message } => format!("Invalid data: {}", message),
            AtmError::Config { message } => format!("Configuration problem: {}", message),
            AtmError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            AtmError::Notification { message } => format!("A notification could not be delivered: {}", message),
            AtmError::Io(e) => format!("Could not read a required file: {}", e),
            AtmError::Serialization(e) => format!("A data file is not valid JSON: {}", e),
            AtmError::Toml(e) => format!("The configuration file is not valid TOML: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Session => "Authenticate the session before running account operations.",
            ErrorCategory::Lookup => "Check the ATM id against the ATMs listed in the seed file.",
            ErrorCategory::Validation => "Fix the offending record in the seed data and restart.",
            ErrorCategory::Configuration => "Check the TOML configuration file and its environment variables.",
            ErrorCategory::Delivery => "Check the SMTP settings; the transaction itself was not affected.",
            ErrorCategory::System => "Make sure the data files exist and are readable.",
        }
    }
}

pub type Result<T> = std::result::Result<T, AtmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        assert_eq!(AtmError::NotAuthenticated.severity(), ErrorSeverity::Medium);
        assert_eq!(
            AtmError::AtmNotFound { atm_id: "ATM009".to_string() }.category(),
            ErrorCategory::Lookup
        );
        assert_eq!(
            AtmError::Notification { message: "smtp down".to_string() }.severity(),
            ErrorSeverity::Low
        );
    }

    #[test]
    fn test_not_found_message_names_the_atm() {
        let err = AtmError::AtmNotFound { atm_id: "ATM009".to_string() };
        assert!(err.to_string().contains("ATM009"));
        assert!(err.user_friendly_message().contains("ATM009"));
    }
}
