//! Boot parameters handed over by the provisioning step.

use std::{fmt, str::FromStr};

use crate::{
    cipher::{PubKey, SecKey},
    error::AppError,
};

/// Raw mode byte as written by the boot-parameter source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode(pub u8);

impl Mode {
    pub const HYPERVISOR: Mode = Mode(0x00);
    pub const VISOR: Mode = Mode(0x01);
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DeploymentMode::try_from(*self) {
            Ok(m) => write!(f, "{m}"),
            Err(_) => write!(f, "{:#04x}", self.0),
        }
    }
}

/// The recognised deployment roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Hypervisor,
    Visor,
}

impl TryFrom<Mode> for DeploymentMode {
    type Error = AppError;

    fn try_from(mode: Mode) -> Result<Self, Self::Error> {
        match mode {
            Mode::HYPERVISOR => Ok(DeploymentMode::Hypervisor),
            Mode::VISOR => Ok(DeploymentMode::Visor),
            Mode(other) => Err(AppError::InvalidMode(format!("{other:#04x}"))),
        }
    }
}

impl From<DeploymentMode> for Mode {
    fn from(mode: DeploymentMode) -> Self {
        match mode {
            DeploymentMode::Hypervisor => Mode::HYPERVISOR,
            DeploymentMode::Visor => Mode::VISOR,
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hypervisor" => Ok(DeploymentMode::Hypervisor),
            "visor" => Ok(DeploymentMode::Visor),
            _ => Err(AppError::InvalidMode(format!("'{s}'"))),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentMode::Hypervisor => f.write_str("HYPERVISOR"),
            DeploymentMode::Visor => f.write_str("VISOR"),
        }
    }
}

/// Provisioning intent consumed once at first configuration.
#[derive(Debug, Clone)]
pub struct BootParams {
    pub mode: Mode,
    /// Null means "generate a fresh identity".
    pub local_sk: SecKey,
    /// Only meaningful in visor mode.
    pub hypervisor_pks: Vec<PubKey>,
    /// Empty means no passcode.
    pub skysocks_passcode: String,
}

impl BootParams {
    pub fn new(mode: impl Into<Mode>) -> Self {
        Self {
            mode: mode.into(),
            local_sk: SecKey::null(),
            hypervisor_pks: Vec::new(),
            skysocks_passcode: String::new(),
        }
    }
}
