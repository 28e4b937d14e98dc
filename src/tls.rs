//! TLS material for the hypervisor web UI.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use tracing::debug;

use crate::error::AppError;

/// Produces a certificate/key pair at the given paths.
pub trait CertGenerator {
    fn generate(&self, cert_path: &Path, key_path: &Path) -> Result<(), AppError>;
}

/// Self-signed certificate, PEM encoded.
#[derive(Debug, Clone)]
pub struct SelfSignedCerts {
    pub subject_alt_names: Vec<String>,
}

impl Default for SelfSignedCerts {
    fn default() -> Self {
        Self { subject_alt_names: vec!["localhost".into()] }
    }
}

impl CertGenerator for SelfSignedCerts {
    fn generate(&self, cert_path: &Path, key_path: &Path) -> Result<(), AppError> {
        let certified = rcgen::generate_simple_self_signed(self.subject_alt_names.clone())
            .map_err(|e| AppError::CertificateGeneration(e.to_string()))?;

        write_pem(cert_path, &certified.cert.pem(), 0o644)?;
        write_pem(key_path, &certified.key_pair.serialize_pem(), 0o600)?;

        debug!(cert = %cert_path.display(), key = %key_path.display(), "tls certificate written");
        Ok(())
    }
}

/// Write `pem` to `path` with `mode`. The mode is in place before any bytes
/// land, including when the file already exists.
fn write_pem(path: &Path, pem: &str, mode: u32) -> Result<(), AppError> {
    let fail = |e: std::io::Error| {
        AppError::CertificateGeneration(format!("cannot write {}: {e}", path.display()))
    };

    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(mode);
    }
    let mut file = opts.open(path).map_err(fail)?;

    // `mode` only applies on creation.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode)).map_err(fail)?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.write_all(pem.as_bytes()).map_err(fail)?;
    file.sync_all().map_err(fail)
}
