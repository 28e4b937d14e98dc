//! Static defaults for generated node configs.
//!
//! Every literal that ends up in a generated file lives here, grouped by the
//! config it feeds.

/// Shared network environment.
pub mod env {
    /// Dmsg discovery service; both roles find each other through it.
    pub const DMSG_DISCOVERY_ADDR: &str = "http://dmsg.discovery.skywire.skycoin.com";
    /// Transport discovery service used by visors to register transports.
    pub const TRANSPORT_DISCOVERY_ADDR: &str = "http://transport.discovery.skywire.skycoin.com";
    /// Route finder queried when visors set up routes.
    pub const ROUTE_FINDER_ADDR: &str = "http://routefinder.skywire.skycoin.com";
    /// Uptime tracker visors report liveness to.
    pub const UPTIME_TRACKER_ADDR: &str = "http://uptime-tracker.skywire.skycoin.com";
    /// Public key of the production setup node.
    pub const SETUP_PK: &str = "24579f003e6b4048bae2def4365e634d8e0e3054a20fc7af49daf2a179658557";
    /// Dmsg port the hypervisor listens on for visor connections.
    pub const DMSG_HYPERVISOR_PORT: u16 = 46;
    /// Dmsg port of the remote pty service.
    pub const DMSG_PTY_PORT: u16 = 22;
}

/// Visor defaults.
pub mod visor {
    /// Config format version understood by the visor runtime.
    pub const VERSION: &str = "1.0";
    /// One dmsg session is enough for a single-board node.
    pub const DMSG_SESSIONS_COUNT: u32 = 1;

    /// Pty whitelist; kept under /var so it survives image upgrades.
    pub const DMSG_PTY_AUTH_FILE: &str = "/var/skywire-visor/dsmgpty/whitelist.json";
    /// Pty CLI is local-only, so a unix socket rather than TCP.
    pub const DMSG_PTY_CLI_NET: &str = "unix";
    /// Pty CLI socket; /run is cleared on reboot, so stale sockets never linger.
    pub const DMSG_PTY_CLI_ADDR: &str = "/run/skywire-visor/dmsgpty/cli.sock";

    /// STCP listens on all interfaces.
    pub const STCP_LOCAL_ADDR: &str = ":7777";

    /// Transport logs persist to disk so bandwidth accounting survives restarts.
    pub const TRANSPORT_LOG_STORE_TYPE: &str = "file";
    /// Under /var with the rest of the visor state.
    pub const TRANSPORT_LOG_STORE_LOCATION: &str = "/var/skywire-visor/transports";

    /// Upper bound on a route finder query before route setup gives up.
    pub const ROUTE_FINDER_TIMEOUT: &str = "10s";

    /// Quiet enough for SD-card storage, loud enough to diagnose a boot.
    pub const LOG_LEVEL: &str = "info";
    /// Grace period given to apps on shutdown.
    pub const SHUTDOWN_TIMEOUT: &str = "10s";
    /// Delay before the restart checker confirms a restarted visor is healthy.
    pub const RESTART_CHECK_DELAY: &str = "1s";

    /// Visor RPC; loopback only.
    pub const RPC_ADDR: &str = "localhost:3435";
    /// Address apps use to reach the visor's app server.
    pub const APP_SERVER_ADDR: &str = "localhost:5505";

    /// App binaries ship with the image.
    pub const APPS_PATH: &str = "/usr/bin/apps";
    /// Per-app writable state.
    pub const LOCAL_PATH: &str = "/var/skywire-visor/apps";
}

/// Bundled visor applications.
///
/// Names must match the binaries under [`visor::APPS_PATH`](super::visor::APPS_PATH);
/// ports are the well-known overlay ports other nodes dial.
pub mod apps {
    /// Chat app binary name.
    pub const SKYCHAT_NAME: &str = "skychat";
    /// Well-known overlay port for chat.
    pub const SKYCHAT_PORT: u16 = 1;
    /// Local web UI for chat.
    pub const SKYCHAT_ADDR: &str = ":8001";

    /// Proxy server binary name; started by default so the node can serve as an exit.
    pub const SKYSOCKS_NAME: &str = "skysocks";
    /// Well-known overlay port proxy clients dial.
    pub const SKYSOCKS_PORT: u16 = 3;

    /// Proxy client binary name; off by default, it needs a chosen server.
    pub const SKYSOCKS_CLIENT_NAME: &str = "skysocks-client";
    /// Overlay port of the proxy client.
    pub const SKYSOCKS_CLIENT_PORT: u16 = 13;
    /// Standard SOCKS5 port exposed to local programs.
    pub const SKYSOCKS_CLIENT_ADDR: &str = ":1080";
}

/// Hypervisor defaults.
pub mod hypervisor {
    /// User database; under /var so credentials persist across upgrades.
    pub const DB_PATH: &str = "/var/skywire-hypervisor/users.db";
    /// The web UI is reachable from the LAN, so auth is always on.
    pub const ENABLE_AUTH: bool = true;
    /// Web UI on all interfaces so it is reachable from the LAN.
    pub const HTTP_ADDR: &str = ":8000";
    /// Credentials cross the LAN, so TLS is on; a self-signed pair is generated.
    pub const ENABLE_TLS: bool = true;

    /// AES-256 cookie encryption key length.
    pub const COOKIE_BLOCK_KEY_LEN: usize = 32;
    /// HMAC-SHA512 cookie signing key length.
    pub const COOKIE_HASH_KEY_LEN: usize = 64;
    /// 12 hours, in nanoseconds.
    pub const COOKIE_EXPIRES_DURATION_NS: u64 = 12 * 60 * 60 * 1_000_000_000;
    /// Session valid for the whole UI.
    pub const COOKIE_PATH: &str = "/";
    /// TLS is always on, so cookies never need to travel in clear.
    pub const COOKIE_SECURE: bool = true;
    /// UI scripts never read the session cookie.
    pub const COOKIE_HTTP_ONLY: bool = true;
    /// `SameSite` default mode.
    pub const COOKIE_SAME_SITE: u8 = 1;
}

/// Default output locations on the node image.
///
/// Configs live in /etc next to the service units that read them; TLS material
/// sits in the hypervisor's own directory.
pub mod paths {
    /// Read by the visor service.
    pub const VISOR_CONF: &str = "/etc/skywire-visor.json";
    /// Read by the hypervisor service.
    pub const HYPERVISOR_CONF: &str = "/etc/skywire-hypervisor.json";
    /// Self-signed certificate for the hypervisor web UI.
    pub const TLS_CERT: &str = "/etc/skywire-hypervisor/cert.pem";
    /// Private key for [`TLS_CERT`].
    pub const TLS_KEY: &str = "/etc/skywire-hypervisor/key.pem";
}
