//! prepconf — first-boot config generator.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load settings
//!   3. Init logger at the configured level
//!   4. Materialize the node config for the boot mode
//!   5. Report and exit

use prepconf::{config, error::AppError, logger, prepare};
use tracing::info;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Optional; a missing .env is fine.
    let _ = dotenvy::dotenv();

    let settings = config::load()?;
    let level = logger::parse_level(&settings.log_level)?;
    logger::init(level)?;

    info!(
        mode = %settings.boot.mode,
        visor_conf = %settings.paths.visor_conf.display(),
        hypervisor_conf = %settings.paths.hypervisor_conf.display(),
        hypervisors = settings.boot.hypervisor_pks.len(),
        "settings loaded"
    );

    match prepare::prepare(&settings.paths, &settings.boot)? {
        prepare::Outcome::Written(path) => {
            info!(path = %path.display(), "config written");
            println!("✓ Config written: {}", path.display());
        }
        prepare::Outcome::AlreadyExists(path) => {
            info!(path = %path.display(), "config already present");
            println!("✓ Config already present: {}", path.display());
        }
    }

    Ok(())
}
