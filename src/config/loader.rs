//! Configuration loading from disk.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::KernelConfig;
use crate::config::validation::{build_routes, ValidationError};
use crate::routing::RouteCollection;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", JoinedErrors(.0))]
    Validation(Vec<ValidationError>),
}

/// Display helper joining every validation error into one line.
struct JoinedErrors<'a>(&'a [ValidationError]);

impl fmt::Display for JoinedErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Load configuration from a TOML file and build the validated route
/// collection in one pass.
pub fn load(path: &Path) -> Result<(KernelConfig, RouteCollection), ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: KernelConfig = toml::from_str(&content)?;
    let routes = build_routes(&config).map_err(ConfigError::Validation)?;
    Ok((config, routes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("web-kernel-loader-{name}.toml"));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let path = write_temp(
            "valid",
            r#"
            [[routes]]
            path = "/health"
            methods = ["GET"]
            controller = "health#check"
            "#,
        );

        let (config, routes) = load(&path).unwrap();
        assert_eq!(config.routes.len(), 1);
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let missing = std::env::temp_dir().join("web-kernel-loader-missing.toml");
        assert!(matches!(load(&missing), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let path = write_temp("malformed", "routes = definitely not toml [");
        assert!(matches!(load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_semantic_errors_are_validation_errors() {
        let path = write_temp(
            "semantic",
            r#"
            [[routes]]
            path = "/broken/{id"
            methods = ["GET"]
            controller = "broken#show"
            "#,
        );

        match load(&path) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
}
