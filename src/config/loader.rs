//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RegistryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text, applying env overrides.
pub fn parse_config(content: &str) -> Result<RegistryConfig, ConfigError> {
    let mut config: RegistryConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    config.ipfs.apply_env();

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RegistryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Load the file if it exists, otherwise fall back to validated defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<RegistryConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => parse_config(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [blockchain]
            contract_address = "0x162459Bb429a63D2e31Fe2d1cdb5b058f2D31AdF"
            land_scan_limit = 25
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.blockchain.land_scan_limit, 25);
        assert_eq!(
            config.blockchain.contract_address,
            "0x162459Bb429a63D2e31Fe2d1cdb5b058f2D31AdF"
        );
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_config("[timeouts]\nrequest_secs = 0\n[blockchain]\nland_scan_limit = 0\n")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("timeouts.request_secs"));
        assert!(message.contains("blockchain.land_scan_limit"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[blockchain\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
