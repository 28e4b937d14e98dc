//! The shipped config/default.toml must load cleanly.

use std::path::{Path, PathBuf};

use prepconf::{Mode, config};

#[test]
fn shipped_default_config_loads() {
    let s = config::load_from(Path::new("config/default.toml"), None, None).unwrap();
    assert_eq!(s.boot.mode, Mode::VISOR);
    assert!(s.boot.local_sk.is_null());
    assert_eq!(s.paths.visor_conf, PathBuf::from("/etc/skywire-visor.json"));
    assert_eq!(s.paths.tls_key, PathBuf::from("/etc/skywire-hypervisor/key.pem"));
}
