// ── Server domain types ──

wire_enum! {
    /// Hypervisor power state of a server.
    pub enum ServerState {
        NoState => "NOSTATE",
        Running => "RUNNING",
        Blocked => "BLOCKED",
        Paused => "PAUSED",
        Shutdown => "SHUTDOWN",
        Shutoff => "SHUTOFF",
        Crashed => "CRASHED",
        Suspended => "PMSUSPENDED",
    }
}

impl ServerState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

wire_enum! {
    /// CPU architecture of a server.
    pub enum Architecture {
        Amd64 => "AMD64",
        Arm64 => "ARM64",
    }
}

wire_enum! {
    /// Storage optimization the hypervisor asks for.
    pub enum StorageOptimization {
        No => "NO",
        Compat => "COMPAT",
    }
}

impl StorageOptimization {
    /// Anything other than `NO` means an optimization is recommended.
    pub fn is_recommended(&self) -> bool {
        !matches!(self, Self::No)
    }
}

/// One entry of the server listing.
#[derive(Debug, Clone, Default)]
pub struct ServerListEntry {
    /// Missing ids cannot be looked up and are skipped by the collector.
    pub id: Option<i64>,
    pub name: String,
    pub nickname: String,
}

/// Full server detail.
#[derive(Debug, Clone, Default)]
pub struct Server {
    pub id: Option<i64>,
    pub name: String,
    pub nickname: String,
    pub architecture: Option<Architecture>,
    pub site_city: String,
    pub disabled: bool,
    pub max_cpu_count: Option<u32>,
    pub snapshot_allowed: bool,
    pub snapshot_count: Option<u32>,
    pub disks_available_space_mib: Option<u64>,
    pub rescue_system_active: bool,
    pub ipv4_addresses: Vec<String>,
    pub ipv6_network_prefixes: Vec<String>,
    pub live: Option<ServerLiveInfo>,
}

/// Live hypervisor state of a server.
#[derive(Debug, Clone, Default)]
pub struct ServerLiveInfo {
    pub state: Option<ServerState>,
    pub cpu_count: Option<u32>,
    pub memory_mib: Option<u64>,
    pub max_memory_mib: Option<u64>,
    pub uptime_seconds: Option<u64>,
    pub autostart: bool,
    pub uefi: bool,
    pub latest_qemu: bool,
    pub config_changed: bool,
    pub required_storage_optimization: Option<StorageOptimization>,
    pub interfaces: Vec<Interface>,
    pub disks: Vec<Disk>,
}

/// Network interface of a server.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    /// Not exposed by the REST API; always empty there.
    pub id: String,
    pub mac: String,
    pub driver: String,
    pub speed_mbits: Option<u64>,
    pub rx_monthly_mib: Option<u64>,
    pub tx_monthly_mib: Option<u64>,
    pub throttled: bool,
    pub throttle_message: String,
    pub ipv4_addresses: Vec<String>,
    pub ipv6_link_local_addresses: Vec<String>,
    pub ipv6_network_prefixes: Vec<String>,
}

/// Virtual disk of a server.
#[derive(Debug, Clone, Default)]
pub struct Disk {
    pub name: String,
    pub driver: String,
    pub capacity_mib: Option<u64>,
    pub allocation_mib: Option<u64>,
}
