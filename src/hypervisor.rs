//! Hypervisor config record and its default builder.

use std::path::PathBuf;

use serde::Serialize;

use crate::{
    boot::BootParams,
    cipher::{self, KeyPair, PubKey, SecKey},
    defaults::{env, hypervisor as d},
    error::AppError,
    prepare::Config,
    tls::CertGenerator,
};

/// Session cookie settings for the hypervisor web UI.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CookieConfig {
    #[serde(serialize_with = "cipher::serialize_hex")]
    pub hash_key: Vec<u8>,
    #[serde(serialize_with = "cipher::serialize_hex")]
    pub block_key: Vec<u8>,
    /// Nanoseconds.
    pub expires_duration: u64,
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: u8,
}

impl CookieConfig {
    /// Fill unset expiry, path and `SameSite` fields, and force `secure` and
    /// `http_only` on. Keys are left alone.
    pub fn fill_defaults(&mut self) {
        if self.expires_duration == 0 {
            self.expires_duration = d::COOKIE_EXPIRES_DURATION_NS;
        }
        if self.path.is_empty() {
            self.path = d::COOKIE_PATH.into();
        }
        if self.same_site == 0 {
            self.same_site = d::COOKIE_SAME_SITE;
        }
        self.secure = d::COOKIE_SECURE;
        self.http_only = d::COOKIE_HTTP_ONLY;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HypervisorConfig {
    pub public_key: PubKey,
    pub secret_key: SecKey,
    pub db_path: String,
    pub enable_auth: bool,
    pub cookies: CookieConfig,
    pub dmsg_discovery: String,
    pub dmsg_port: u16,
    pub http_addr: String,
    pub enable_tls: bool,
    pub tls_cert_file: PathBuf,
    pub tls_key_file: PathBuf,
}

/// Build the default hypervisor config and generate its TLS material.
pub fn build(
    conf: &Config,
    bp: &BootParams,
    certs: &dyn CertGenerator,
) -> Result<HypervisorConfig, AppError> {
    let KeyPair { pk, sk } = KeyPair::derive(&bp.local_sk)?;

    let mut cookies = CookieConfig {
        block_key: cipher::rand_bytes(d::COOKIE_BLOCK_KEY_LEN),
        hash_key: cipher::rand_bytes(d::COOKIE_HASH_KEY_LEN),
        ..CookieConfig::default()
    };
    cookies.fill_defaults();

    let out = HypervisorConfig {
        public_key: pk,
        secret_key: sk,
        db_path: d::DB_PATH.into(),
        enable_auth: d::ENABLE_AUTH,
        cookies,
        dmsg_discovery: env::DMSG_DISCOVERY_ADDR.into(),
        dmsg_port: env::DMSG_HYPERVISOR_PORT,
        http_addr: d::HTTP_ADDR.into(),
        enable_tls: d::ENABLE_TLS,
        tls_cert_file: conf.tls_cert.clone(),
        tls_key_file: conf.tls_key.clone(),
    };

    certs.generate(&out.tls_cert_file, &out.tls_key_file)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::DeploymentMode;
    use std::{cell::RefCell, path::Path};

    #[derive(Default)]
    struct RecordingCerts {
        calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    }

    impl CertGenerator for RecordingCerts {
        fn generate(&self, cert_path: &Path, key_path: &Path) -> Result<(), AppError> {
            self.calls.borrow_mut().push((cert_path.to_path_buf(), key_path.to_path_buf()));
            Ok(())
        }
    }

    struct FailingCerts;

    impl CertGenerator for FailingCerts {
        fn generate(&self, _: &Path, _: &Path) -> Result<(), AppError> {
            Err(AppError::CertificateGeneration("no entropy".into()))
        }
    }

    fn conf() -> Config {
        Config {
            visor_conf: "/tmp/visor.json".into(),
            hypervisor_conf: "/tmp/hypervisor.json".into(),
            tls_cert: "/tmp/cert.pem".into(),
            tls_key: "/tmp/key.pem".into(),
        }
    }

    #[test]
    fn fixed_defaults_and_tls_paths() {
        let certs = RecordingCerts::default();
        let cfg = build(&conf(), &BootParams::new(DeploymentMode::Hypervisor), &certs).unwrap();
        assert_eq!(cfg.db_path, "/var/skywire-hypervisor/users.db");
        assert!(cfg.enable_auth);
        assert!(cfg.enable_tls);
        assert_eq!(cfg.http_addr, ":8000");
        assert_eq!(cfg.dmsg_port, 46);
        assert_eq!(cfg.tls_cert_file, PathBuf::from("/tmp/cert.pem"));
        assert_eq!(cfg.tls_key_file, PathBuf::from("/tmp/key.pem"));
        assert_eq!(
            *certs.calls.borrow(),
            vec![(PathBuf::from("/tmp/cert.pem"), PathBuf::from("/tmp/key.pem"))]
        );
    }

    #[test]
    fn cookie_keys_are_random_and_sized() {
        let certs = RecordingCerts::default();
        let bp = BootParams::new(DeploymentMode::Hypervisor);
        let a = build(&conf(), &bp, &certs).unwrap();
        let b = build(&conf(), &bp, &certs).unwrap();
        assert_eq!(a.cookies.block_key.len(), 32);
        assert_eq!(a.cookies.hash_key.len(), 64);
        assert_ne!(a.cookies.block_key, b.cookies.block_key);
        assert_eq!(a.cookies.path, "/");
        assert_eq!(a.cookies.expires_duration, 43_200_000_000_000);
        assert!(a.cookies.secure && a.cookies.http_only);
    }

    #[test]
    fn cert_failure_is_fatal() {
        let err = build(&conf(), &BootParams::new(DeploymentMode::Hypervisor), &FailingCerts)
            .unwrap_err();
        assert!(matches!(err, AppError::CertificateGeneration(_)));
    }

    #[test]
    fn fill_defaults_keeps_explicit_values() {
        let mut c = CookieConfig { path: "/ui".into(), expires_duration: 5, ..CookieConfig::default() };
        c.fill_defaults();
        assert_eq!(c.path, "/ui");
        assert_eq!(c.expires_duration, 5);
        assert_eq!(c.same_site, 1);
    }

    #[test]
    fn fill_defaults_forces_secure_and_http_only() {
        let mut c = CookieConfig { secure: false, http_only: false, ..CookieConfig::default() };
        c.fill_defaults();
        assert!(c.secure);
        assert!(c.http_only);
        assert!(c.block_key.is_empty() && c.hash_key.is_empty());
    }

    #[test]
    fn supplied_key_is_used() {
        let mut bp = BootParams::new(DeploymentMode::Hypervisor);
        bp.local_sk = SecKey::from_bytes([5u8; 32]);
        let cfg = build(&conf(), &bp, &RecordingCerts::default()).unwrap();
        assert_eq!(cfg.secret_key, bp.local_sk);
        assert_eq!(cfg.public_key, bp.local_sk.pub_key().unwrap());
    }

    #[test]
    fn cookie_keys_serialize_as_hex() {
        let cfg = build(&conf(), &BootParams::new(DeploymentMode::Hypervisor), &RecordingCerts::default())
            .unwrap();
        let v = serde_json::to_value(&cfg).unwrap();
        assert_eq!(v["cookies"]["block_key"].as_str().unwrap().len(), 64);
        assert_eq!(v["cookies"]["hash_key"].as_str().unwrap().len(), 128);
        assert!(v["cookies"].get("domain").is_none());
    }
}
