use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ParleyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("temperature out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: temperature out of range"
        );
    }

    #[test]
    fn parley_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: ParleyError = config_err.into();
        assert!(matches!(err, ParleyError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn parley_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ParleyError = io_err.into();
        assert!(matches!(err, ParleyError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: file missing");
    }
}
