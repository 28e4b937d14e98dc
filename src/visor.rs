//! Visor config record and its default builder.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    boot::BootParams,
    cipher::{KeyPair, PubKey},
    defaults::{apps, env, visor as d},
    error::AppError,
};

#[derive(Debug, Clone, Serialize)]
pub struct DmsgConfig {
    pub discovery: String,
    pub sessions_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DmsgPtyConfig {
    pub port: u16,
    #[serde(rename = "authorization_file")]
    pub auth_file: String,
    #[serde(rename = "cli_network")]
    pub cli_net: String,
    #[serde(rename = "cli_address")]
    pub cli_addr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StcpConfig {
    /// Static `public key -> address` entries; empty by default.
    pub pk_table: HashMap<PubKey, String>,
    #[serde(rename = "local_address")]
    pub local_addr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogStoreConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportConfig {
    pub discovery: String,
    pub log_store: LogStoreConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutingConfig {
    /// Hex-encoded setup node keys.
    pub setup_nodes: Vec<String>,
    pub route_finder: String,
    pub route_finder_timeout: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UptimeTrackerConfig {
    pub addr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceConfig {
    #[serde(rename = "rpc")]
    pub rpc_addr: String,
}

/// A hypervisor allowed to manage this visor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HypervisorEntry {
    pub public_key: PubKey,
}

/// One bundled application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppEntry {
    pub app: String,
    pub auto_start: bool,
    pub port: u16,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisorConfig {
    pub version: String,
    pub key_pair: KeyPair,
    pub dmsg: DmsgConfig,
    pub dmsg_pty: DmsgPtyConfig,
    pub stcp: StcpConfig,
    pub transport: TransportConfig,
    pub routing: RoutingConfig,
    pub uptime_tracker: UptimeTrackerConfig,
    pub apps: Vec<AppEntry>,
    pub trusted_visors: Vec<PubKey>,
    pub hypervisors: Vec<HypervisorEntry>,
    pub apps_path: String,
    pub local_path: String,
    pub log_level: String,
    pub shutdown_timeout: String,
    pub interfaces: InterfaceConfig,
    pub app_server_addr: String,
    pub restart_check_delay: String,
}

impl DmsgConfig {
    pub fn default_config() -> Self {
        Self {
            discovery: env::DMSG_DISCOVERY_ADDR.into(),
            sessions_count: d::DMSG_SESSIONS_COUNT,
        }
    }
}

impl DmsgPtyConfig {
    pub fn default_config() -> Self {
        Self {
            port: env::DMSG_PTY_PORT,
            auth_file: d::DMSG_PTY_AUTH_FILE.into(),
            cli_net: d::DMSG_PTY_CLI_NET.into(),
            cli_addr: d::DMSG_PTY_CLI_ADDR.into(),
        }
    }
}

impl StcpConfig {
    pub fn default_config() -> Self {
        Self { pk_table: HashMap::new(), local_addr: d::STCP_LOCAL_ADDR.into() }
    }
}

impl TransportConfig {
    pub fn default_config() -> Self {
        Self {
            discovery: env::TRANSPORT_DISCOVERY_ADDR.into(),
            log_store: LogStoreConfig {
                kind: d::TRANSPORT_LOG_STORE_TYPE.into(),
                location: d::TRANSPORT_LOG_STORE_LOCATION.into(),
            },
        }
    }
}

impl RoutingConfig {
    pub fn default_config() -> Self {
        Self {
            setup_nodes: vec![env::SETUP_PK.into()],
            route_finder: env::ROUTE_FINDER_ADDR.into(),
            route_finder_timeout: d::ROUTE_FINDER_TIMEOUT.into(),
        }
    }
}

impl UptimeTrackerConfig {
    pub fn default_config() -> Self {
        Self { addr: env::UPTIME_TRACKER_ADDR.into() }
    }
}

impl InterfaceConfig {
    pub fn default_config() -> Self {
        Self { rpc_addr: d::RPC_ADDR.into() }
    }
}

/// The three apps shipped with every visor image.
pub fn bundled_apps(skysocks_passcode: &str) -> Vec<AppEntry> {
    let skysocks_args = if skysocks_passcode.is_empty() {
        Vec::new()
    } else {
        vec!["-passcode".to_string(), skysocks_passcode.to_string()]
    };

    vec![
        AppEntry {
            app: apps::SKYCHAT_NAME.into(),
            auto_start: true,
            port: apps::SKYCHAT_PORT,
            args: vec!["-addr".into(), apps::SKYCHAT_ADDR.into()],
        },
        AppEntry {
            app: apps::SKYSOCKS_NAME.into(),
            auto_start: true,
            port: apps::SKYSOCKS_PORT,
            args: skysocks_args,
        },
        AppEntry {
            app: apps::SKYSOCKS_CLIENT_NAME.into(),
            auto_start: false,
            port: apps::SKYSOCKS_CLIENT_PORT,
            args: vec!["-addr".into(), apps::SKYSOCKS_CLIENT_ADDR.into()],
        },
    ]
}

/// Build the default visor config for `bp`.
pub fn build(bp: &BootParams) -> Result<VisorConfig, AppError> {
    let key_pair = KeyPair::derive(&bp.local_sk)?;

    Ok(VisorConfig {
        version: d::VERSION.into(),
        key_pair,
        dmsg: DmsgConfig::default_config(),
        dmsg_pty: DmsgPtyConfig::default_config(),
        stcp: StcpConfig::default_config(),
        transport: TransportConfig::default_config(),
        routing: RoutingConfig::default_config(),
        uptime_tracker: UptimeTrackerConfig::default_config(),
        apps: bundled_apps(&bp.skysocks_passcode),
        trusted_visors: Vec::new(),
        hypervisors: bp
            .hypervisor_pks
            .iter()
            .map(|pk| HypervisorEntry { public_key: *pk })
            .collect(),
        apps_path: d::APPS_PATH.into(),
        local_path: d::LOCAL_PATH.into(),
        log_level: d::LOG_LEVEL.into(),
        shutdown_timeout: d::SHUTDOWN_TIMEOUT.into(),
        interfaces: InterfaceConfig::default_config(),
        app_server_addr: d::APP_SERVER_ADDR.into(),
        restart_check_delay: d::RESTART_CHECK_DELAY.into(),
    })
}
