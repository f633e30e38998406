// REST API wire types
//
// JSON shapes returned under `/api/v1/`. Every field is optional on the wire;
// enumerations stay raw strings here and are classified in `scp-core`.
// Fields whose JSON name does not follow plain camelCase (`...InMiB`,
// `...InMBits`) carry an explicit rename.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ── Maintenance ──────────────────────────────────────────────────────

/// Response from `GET /api/v1/maintenance`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceInfo {
    pub start_at: Option<DateTime<Utc>>,
    pub finish_at: Option<DateTime<Utc>>,
}

// ── Servers ──────────────────────────────────────────────────────────

/// Entry from `GET /api/v1/servers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerListMinimal {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub disabled: Option<bool>,
}

/// Response from `GET /api/v1/servers/{id}?loadServerLiveInfo=true`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub hostname: Option<String>,
    pub disabled: Option<bool>,
    /// `AMD64` or `ARM64`.
    pub architecture: Option<String>,
    pub site: Option<Site>,
    pub max_cpu_count: Option<u32>,
    #[serde(rename = "disksAvailableSpaceInMiB")]
    pub disks_available_space_in_mib: Option<u64>,
    pub snapshot_count: Option<u32>,
    pub snapshot_allowed: Option<bool>,
    pub rescue_system_active: Option<bool>,
    pub ipv4_addresses: Option<Vec<Ipv4Address>>,
    pub ipv6_addresses: Option<Vec<Ipv6Address>>,
    pub server_live_info: Option<ServerLiveInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: Option<i64>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipv4Address {
    pub id: Option<i64>,
    pub ip: Option<String>,
    pub netmask: Option<String>,
    pub gateway: Option<String>,
    pub broadcast: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipv6Address {
    pub id: Option<i64>,
    pub network_prefix: Option<String>,
    pub network_prefix_length: Option<u8>,
    pub gateway: Option<String>,
}

/// Hypervisor-side state, only present when live info was requested.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerLiveInfo {
    /// Power state: `RUNNING`, `SHUTOFF`, `PAUSED`, ...
    pub state: Option<String>,
    pub autostart: Option<bool>,
    pub uefi: Option<bool>,
    pub latest_qemu: Option<bool>,
    pub config_changed: Option<bool>,
    pub uptime_in_seconds: Option<u64>,
    /// `NO`, `COMPAT`, `ADVANCED`, ...
    pub required_storage_optimization: Option<String>,
    pub cpu_count: Option<u32>,
    #[serde(rename = "currentServerMemoryInMiB")]
    pub current_server_memory_in_mib: Option<u64>,
    #[serde(rename = "maxServerMemoryInMiB")]
    pub max_server_memory_in_mib: Option<u64>,
    pub interfaces: Option<Vec<ServerInterface>>,
    pub disks: Option<Vec<ServerDisk>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInterface {
    pub mac: Option<String>,
    pub driver: Option<String>,
    pub mtu: Option<u32>,
    #[serde(rename = "speedInMBits")]
    pub speed_in_mbits: Option<u64>,
    #[serde(rename = "rxMonthlyInMiB")]
    pub rx_monthly_in_mib: Option<u64>,
    #[serde(rename = "txMonthlyInMiB")]
    pub tx_monthly_in_mib: Option<u64>,
    pub ipv4_addresses: Option<Vec<String>>,
    pub ipv6_link_local_addresses: Option<Vec<String>>,
    pub ipv6_network_prefixes: Option<Vec<String>>,
    pub traffic_throttled: Option<bool>,
    pub vlan_interface: Option<bool>,
    pub vlan_id: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDisk {
    pub dev: Option<String>,
    pub driver: Option<String>,
    #[serde(rename = "capacityInMiB")]
    pub capacity_in_mib: Option<u64>,
    #[serde(rename = "allocationInMiB")]
    pub allocation_in_mib: Option<u64>,
}

// ── Tasks ────────────────────────────────────────────────────────────

/// Entry from `GET /api/v1/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub uuid: Option<String>,
    pub name: Option<String>,
    /// `PENDING`, `RUNNING`, `FINISHED`, `ERROR`, `CANCELED`.
    pub state: Option<String>,
    pub message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}
