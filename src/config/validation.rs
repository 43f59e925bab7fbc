use super::models::Config;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Highest permission bits a store mode may carry (no setuid/setgid/sticky)
const MAX_MODE: u32 = 0o777;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Store path must not be empty")]
    EmptyStorePath,

    #[error("Store mode {mode:#o} has bits outside 0o777")]
    InvalidMode { mode: u32 },

    #[error("open_timeout_ms must be positive (omit it for a single attempt)")]
    ZeroOpenTimeout,

    #[error("Size must be positive: {field}")]
    ZeroSize { field: String },

    #[error("Invalid log level '{level}': {reason}")]
    InvalidLogLevel { level: String, reason: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_store(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_store(config: &Config) -> Result<(), ValidationError> {
    let store = &config.store;

    if store.path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyStorePath);
    }

    if store.mode.bits() > MAX_MODE {
        return Err(ValidationError::InvalidMode {
            mode: store.mode.bits(),
        });
    }

    if store.open_timeout_ms == Some(0) {
        return Err(ValidationError::ZeroOpenTimeout);
    }

    if store.cache_size.as_u64() == 0 {
        return Err(ValidationError::ZeroSize {
            field: "cache_size".to_string(),
        });
    }

    if store.max_write_buffer_size.as_u64() == 0 {
        return Err(ValidationError::ZeroSize {
            field: "max_write_buffer_size".to_string(),
        });
    }

    Ok(())
}

fn validate_logging(config: &Config) -> Result<(), ValidationError> {
    EnvFilter::try_new(&config.logging.level).map_err(|e| ValidationError::InvalidLogLevel {
        level: config.logging.level.clone(),
        reason: e.to_string(),
    })?;
    Ok(())
}
