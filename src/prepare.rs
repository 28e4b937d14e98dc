//! Write the node config for the booted role, once.
//!
//! The target file is created exclusively. If it already exists the call is a
//! no-op: an existing config is never overwritten, merged or upgraded. A failed
//! call may leave a partial file behind; remove it before retrying.

use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::{
    boot::{BootParams, DeploymentMode},
    defaults::paths,
    error::AppError,
    hypervisor, visor,
    tls::{CertGenerator, SelfSignedCerts},
};

/// Output locations for generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub visor_conf: PathBuf,
    pub hypervisor_conf: PathBuf,
    pub tls_cert: PathBuf,
    pub tls_key: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            visor_conf: paths::VISOR_CONF.into(),
            hypervisor_conf: paths::HYPERVISOR_CONF.into(),
            tls_cert: paths::TLS_CERT.into(),
            tls_key: paths::TLS_KEY.into(),
        }
    }
}

/// What a call to [`prepare`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written(PathBuf),
    AlreadyExists(PathBuf),
}

impl DeploymentMode {
    /// Config file this role writes to.
    pub fn target<'a>(&self, conf: &'a Config) -> &'a Path {
        match self {
            DeploymentMode::Hypervisor => &conf.hypervisor_conf,
            DeploymentMode::Visor => &conf.visor_conf,
        }
    }

    /// Build this role's config and serialize it.
    fn render(
        &self,
        conf: &Config,
        bp: &BootParams,
        certs: &dyn CertGenerator,
    ) -> Result<Vec<u8>, AppError> {
        match self {
            DeploymentMode::Hypervisor => to_json(&hypervisor::build(conf, bp, certs)?),
            DeploymentMode::Visor => to_json(&visor::build(bp)?),
        }
    }
}

/// Ensure the config for `bp.mode` exists, generating TLS material with
/// [`SelfSignedCerts`] in hypervisor mode.
pub fn prepare(conf: &Config, bp: &BootParams) -> Result<Outcome, AppError> {
    prepare_with(conf, bp, &SelfSignedCerts::default())
}

/// [`prepare`] with an explicit certificate generator.
pub fn prepare_with(
    conf: &Config,
    bp: &BootParams,
    certs: &dyn CertGenerator,
) -> Result<Outcome, AppError> {
    let mode = DeploymentMode::try_from(bp.mode)?;
    let target = mode.target(conf);

    let mut file = match create_exclusive(target) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            debug!(mode = %mode, path = %target.display(), "config exists, leaving it untouched");
            return Ok(Outcome::AlreadyExists(target.to_path_buf()));
        }
        Err(e) => return Err(AppError::fs(target, e)),
    };

    let raw = mode.render(conf, bp, certs)?;
    file.write_all(&raw).map_err(|e| AppError::fs(target, e))?;
    file.sync_all().map_err(|e| AppError::fs(target, e))?;

    debug!(mode = %mode, path = %target.display(), bytes = raw.len(), "config written");
    Ok(Outcome::Written(target.to_path_buf()))
}

fn create_exclusive(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o644);
    }
    opts.open(path)
}

/// Tab-indented JSON, fields in declaration order.
fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::Mode;
    use std::fs;
    use tempfile::TempDir;

    struct NoCerts;

    impl CertGenerator for NoCerts {
        fn generate(&self, _: &Path, _: &Path) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn conf_in(dir: &Path) -> Config {
        Config {
            visor_conf: dir.join("skywire-visor.json"),
            hypervisor_conf: dir.join("skywire-hypervisor.json"),
            tls_cert: dir.join("cert.pem"),
            tls_key: dir.join("key.pem"),
        }
    }

    #[test]
    fn target_follows_mode() {
        let conf = Config::default();
        assert_eq!(DeploymentMode::Visor.target(&conf), Path::new("/etc/skywire-visor.json"));
        assert_eq!(
            DeploymentMode::Hypervisor.target(&conf),
            Path::new("/etc/skywire-hypervisor.json")
        );
    }

    #[test]
    fn writes_tab_indented_json() {
        let tmp = TempDir::new().unwrap();
        let conf = conf_in(tmp.path());
        let out = prepare_with(&conf, &BootParams::new(Mode::VISOR), &NoCerts).unwrap();
        assert_eq!(out, Outcome::Written(conf.visor_conf.clone()));

        let text = fs::read_to_string(&conf.visor_conf).unwrap();
        assert!(text.starts_with("{\n\t\"version\": \"1.0\""));
        assert!(!conf.hypervisor_conf.exists());
    }

    #[test]
    fn existing_file_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        let conf = conf_in(tmp.path());
        fs::write(&conf.hypervisor_conf, b"hand written").unwrap();

        let out = prepare_with(&conf, &BootParams::new(Mode::HYPERVISOR), &NoCerts).unwrap();
        assert_eq!(out, Outcome::AlreadyExists(conf.hypervisor_conf.clone()));
        assert_eq!(fs::read(&conf.hypervisor_conf).unwrap(), b"hand written");
    }

    #[test]
    fn invalid_mode_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let conf = conf_in(tmp.path());
        let err = prepare_with(&conf, &BootParams::new(Mode(0x09)), &NoCerts).unwrap_err();
        assert!(matches!(err, AppError::InvalidMode(_)));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_parent_dir_is_fs_error() {
        let tmp = TempDir::new().unwrap();
        let mut conf = conf_in(tmp.path());
        conf.visor_conf = tmp.path().join("missing/skywire-visor.json");
        let err = prepare_with(&conf, &BootParams::new(Mode::VISOR), &NoCerts).unwrap_err();
        assert!(matches!(err, AppError::FileSystem { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn config_mode_is_0644() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let conf = conf_in(tmp.path());
        prepare_with(&conf, &BootParams::new(Mode::VISOR), &NoCerts).unwrap();
        let mode = fs::metadata(&conf.visor_conf).unwrap().permissions().mode();
        // umask may only clear bits
        assert_eq!(mode & 0o133, 0);
    }
}
