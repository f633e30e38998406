// ── Legacy (SOAP) domain types ──
//
// The SOAP service reports a coarser, differently shaped view: textual
// uptime, discrete monthly counters and disk sizes in GiB.

/// One vserver as reported by `getVServerInformation`.
#[derive(Debug, Clone, Default)]
pub struct VServer {
    pub name: String,
    pub nickname: String,
    pub status: String,
    pub uptime: Option<String>,
    pub cpu_cores: Option<u32>,
    pub memory_mib: Option<u64>,
    pub traffic: Option<MonthlyTraffic>,
    pub ips: Vec<String>,
    pub interfaces: Vec<LegacyInterface>,
    pub disks: Vec<LegacyDisk>,
    pub rescue_enabled: bool,
    pub rescue_message: String,
    pub reboot_recommended: bool,
    pub reboot_message: String,
}

impl VServer {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

/// Traffic counters for one calendar month, in MiB.
#[derive(Debug, Clone, Default)]
pub struct MonthlyTraffic {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub in_mib: Option<u64>,
    pub out_mib: Option<u64>,
    pub total_mib: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct LegacyInterface {
    pub id: String,
    pub mac: String,
    pub driver: String,
    pub ipv4_addresses: Vec<String>,
    pub ipv6_addresses: Vec<String>,
    pub throttled: bool,
    pub throttle_message: String,
}

#[derive(Debug, Clone, Default)]
pub struct LegacyDisk {
    pub name: String,
    pub driver: String,
    pub capacity_gib: Option<u64>,
    pub used_gib: Option<u64>,
    pub optimization_recommended: bool,
    pub optimization_message: String,
}
