//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects every violation into a single `ConfigError`.

mod helpers;
mod reconnect;
mod server;


use crate::schema::PresenceConfig;
use presence_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &PresenceConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    server::validate_server(&mut errors, config);
    reconnect::validate_reconnect(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
