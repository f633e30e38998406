// Legacy SOAP wire types
//
// Shapes of the `<return>` payloads of the `WSEndUser` web service.
// Element names are matched on their local part; namespace prefixes on
// the wire are ignored by the deserializer.

use serde::Deserialize;

/// `<return>` of `getVServerInformation`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VServerInformation {
    #[serde(rename = "vServerName")]
    pub vserver_name: Option<String>,
    #[serde(rename = "vServerNickname")]
    pub vserver_nickname: Option<String>,
    /// `online`, `offline`, ...
    pub status: Option<String>,
    /// Free text such as `"3 days 4 hours 5 minutes"`.
    pub uptime: Option<String>,
    pub cpu_cores: Option<u32>,
    /// MiB.
    pub memory: Option<u64>,
    pub current_month: Option<MonthlyTraffic>,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub server_interfaces: Vec<ServerInterface>,
    #[serde(default)]
    pub server_disks: Vec<ServerDisk>,
    pub rescue_enabled: Option<bool>,
    pub rescue_enabled_message: Option<String>,
    pub reboot_recommended: Option<bool>,
    pub reboot_recommended_message: Option<String>,
}

/// Traffic counters for the running month, in MiB.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyTraffic {
    pub month: Option<u32>,
    pub year: Option<i32>,
    #[serde(rename = "in")]
    pub traffic_in: Option<u64>,
    #[serde(rename = "out")]
    pub traffic_out: Option<u64>,
    #[serde(rename = "total")]
    pub traffic_total: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInterface {
    pub id: Option<String>,
    pub mac: Option<String>,
    pub driver: Option<String>,
    #[serde(rename = "ipv4IP", default)]
    pub ipv4_ips: Vec<String>,
    #[serde(rename = "ipv6IP", default)]
    pub ipv6_ips: Vec<String>,
    pub traffic_throttled: Option<bool>,
    pub traffic_throttled_message: Option<String>,
}

/// Capacity and usage are reported in GiB.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDisk {
    pub name: Option<String>,
    pub driver: Option<String>,
    pub capacity: Option<u64>,
    pub used: Option<u64>,
    pub optimization_recommended: Option<bool>,
    pub optimization_recommended_message: Option<String>,
}
