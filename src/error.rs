//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid boot mode: {0}")]
    InvalidMode(String),

    #[error("key derivation error: {0}")]
    KeyDerivation(String),

    #[error("file system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("certificate generation error: {0}")]
    CertificateGeneration(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),
}

impl AppError {
    /// Wrap an io error with the path it happened on.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::FileSystem { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn invalid_mode_display() {
        let e = AppError::InvalidMode("0x07".into());
        assert!(e.to_string().contains("invalid boot mode"));
        assert!(e.to_string().contains("0x07"));
    }

    #[test]
    fn key_derivation_display() {
        let e = AppError::KeyDerivation("bad length".into());
        assert!(e.to_string().contains("bad length"));
    }

    #[test]
    fn file_system_error_keeps_path_and_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = AppError::fs("/etc/skywire-visor.json", io_err);
        assert!(e.to_string().contains("/etc/skywire-visor.json"));
        assert!(e.source().is_some());
    }

    #[test]
    fn serde_json_error_converts() {
        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        let e: AppError = json_err.into();
        assert!(e.to_string().contains("serialization error"));
        let _: &dyn Error = &e;
    }
}
