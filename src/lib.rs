//! First-boot config materialization for hypervisor and visor nodes.
//!
//! [`prepare::prepare`] picks the role from [`boot::BootParams`], builds the
//! default config for it and writes it to disk unless a config is already
//! there.

pub mod boot;
pub mod cipher;
pub mod config;
pub mod defaults;
pub mod error;
pub mod hypervisor;
pub mod logger;
pub mod prepare;
pub mod tls;
pub mod visor;

pub use boot::{BootParams, DeploymentMode, Mode};
pub use error::AppError;
pub use prepare::{Config, Outcome, prepare, prepare_with};
