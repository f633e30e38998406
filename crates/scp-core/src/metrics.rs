// ── Metric descriptors and samples ──
//
// Descriptors are static tables; collectors emit `Sample`s against them and
// the registry turns those into gauge families at exposition time.

/// Name, help text and label names of one gauge family.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

/// One observation: label values in descriptor order plus the gauge value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub desc: &'static MetricDesc,
    pub labels: Vec<String>,
    pub value: f64,
}

impl Sample {
    pub fn new(desc: &'static MetricDesc, labels: &[&str], value: f64) -> Self {
        debug_assert_eq!(
            labels.len(),
            desc.labels.len(),
            "label count mismatch for {}",
            desc.name
        );
        Self {
            desc,
            labels: labels.iter().map(|l| (*l).to_owned()).collect(),
            value,
        }
    }

    /// Label value by label name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }
}

// ── Numeric helpers ────────────────────────────────────────────────

const MIB: f64 = 1_048_576.0;
const GIB: f64 = 1_073_741_824.0;

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub(crate) fn gauge(value: u64) -> f64 {
    value as f64
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub(crate) fn timestamp(secs: i64) -> f64 {
    secs as f64
}

pub(crate) fn mib_to_bytes(mib: u64) -> f64 {
    gauge(mib) * MIB
}

pub(crate) fn gib_to_bytes(gib: u64) -> f64 {
    gauge(gib) * GIB
}

pub(crate) fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

// ── Descriptors shared by both collectors ──────────────────────────

pub static CPU_CORES: MetricDesc = MetricDesc {
    name: "scp_cpu_cores",
    help: "Number of CPU cores",
    labels: &["vserver"],
};

pub static MEMORY_BYTES: MetricDesc = MetricDesc {
    name: "scp_memory_bytes",
    help: "Amount of Memory in Bytes",
    labels: &["vserver"],
};

pub static MONTHLY_TRAFFIC_IN: MetricDesc = MetricDesc {
    name: "scp_monthlytraffic_in_bytes",
    help: "Monthly traffic incoming in Bytes (only gigabyte-level resolution)",
    labels: &["vserver", "month", "year"],
};

pub static MONTHLY_TRAFFIC_OUT: MetricDesc = MetricDesc {
    name: "scp_monthlytraffic_out_bytes",
    help: "Monthly traffic outgoing in Bytes (only gigabyte-level resolution)",
    labels: &["vserver", "month", "year"],
};

pub static MONTHLY_TRAFFIC_TOTAL: MetricDesc = MetricDesc {
    name: "scp_monthlytraffic_total_bytes",
    help: "Total monthly traffic in Bytes (only gigabyte-level resolution)",
    labels: &["vserver", "month", "year"],
};

pub static SERVER_START_TIME: MetricDesc = MetricDesc {
    name: "scp_server_start_time_seconds",
    help: "Start time of the vserver in seconds (only minute-level resolution)",
    labels: &["vserver"],
};

pub static IP_INFO: MetricDesc = MetricDesc {
    name: "scp_ip_info",
    help: "IPs assigned to this server",
    labels: &["vserver", "ip"],
};

pub static INTERFACE_THROTTLED: MetricDesc = MetricDesc {
    name: "scp_interface_throttled",
    help: "Interface's traffic is throttled (1) or not (0)",
    labels: &[
        "vserver",
        "driver",
        "id",
        "ip",
        "ip_type",
        "mac",
        "throttle_message",
    ],
};

pub static RESCUE_ACTIVE: MetricDesc = MetricDesc {
    name: "scp_rescue_active",
    help: "Rescue system active (1) / inactive (0)",
    labels: &["vserver", "message"],
};

pub static DISK_CAPACITY: MetricDesc = MetricDesc {
    name: "scp_disk_capacity_bytes",
    help: "Available storage space in Bytes",
    labels: &["vserver", "driver", "name"],
};

pub static DISK_USED: MetricDesc = MetricDesc {
    name: "scp_disk_used_bytes",
    help: "Used storage space in Bytes",
    labels: &["vserver", "driver", "name"],
};

pub static DISK_OPTIMIZATION: MetricDesc = MetricDesc {
    name: "scp_disk_optimization",
    help: "Optimization recommended (1) / not recommended (0)",
    labels: &["vserver", "driver", "name", "message"],
};

// ── REST-only descriptors ──────────────────────────────────────────

pub static SERVER_STATUS: MetricDesc = MetricDesc {
    name: "scp_server_status",
    help: "Online (1) / Offline (0) status",
    labels: &["vserver", "status", "nickname", "architecture", "site_city"],
};

pub static SNAPSHOT_COUNT: MetricDesc = MetricDesc {
    name: "scp_snapshot_count",
    help: "Total number of snapshots",
    labels: &["vserver"],
};

pub static CONFIG_CHANGED: MetricDesc = MetricDesc {
    name: "scp_config_changed",
    help: "Pending configuration changes (1) / none (0)",
    labels: &["vserver"],
};

pub static INTERFACE_SPEED: MetricDesc = MetricDesc {
    name: "scp_interface_speed_mbits",
    help: "Interface link speed in Mbits/s",
    labels: &["vserver", "mac", "driver"],
};

pub static CPU_MAX_COUNT: MetricDesc = MetricDesc {
    name: "scp_cpu_max_count",
    help: "Maximum number of CPU cores",
    labels: &["vserver"],
};

pub static MEMORY_MAX_BYTES: MetricDesc = MetricDesc {
    name: "scp_memory_max_bytes",
    help: "Maximum amount of Memory in Bytes",
    labels: &["vserver"],
};

pub static DISKS_AVAILABLE_SPACE: MetricDesc = MetricDesc {
    name: "scp_disks_available_space_bytes",
    help: "Available space for new disks in Bytes",
    labels: &["vserver"],
};

pub static AUTOSTART_ENABLED: MetricDesc = MetricDesc {
    name: "scp_autostart_enabled",
    help: "Autostart enabled (1) / disabled (0)",
    labels: &["vserver"],
};

pub static UEFI_ENABLED: MetricDesc = MetricDesc {
    name: "scp_uefi_enabled",
    help: "UEFI enabled (1) / disabled (0)",
    labels: &["vserver"],
};

pub static LATEST_QEMU: MetricDesc = MetricDesc {
    name: "scp_latest_qemu",
    help: "Server is running latest QEMU version (1) / older (0)",
    labels: &["vserver"],
};

pub static DISABLED: MetricDesc = MetricDesc {
    name: "scp_disabled",
    help: "Server is disabled (1) / enabled (0)",
    labels: &["vserver"],
};

pub static SNAPSHOT_ALLOWED: MetricDesc = MetricDesc {
    name: "scp_snapshot_allowed",
    help: "Snapshot creation allowed (1) / disallowed (0)",
    labels: &["vserver"],
};

pub static MAINTENANCE_START: MetricDesc = MetricDesc {
    name: "scp_maintenance_start_time_seconds",
    help: "Next maintenance window start time",
    labels: &[],
};

pub static MAINTENANCE_FINISH: MetricDesc = MetricDesc {
    name: "scp_maintenance_finish_time_seconds",
    help: "Next maintenance window finish time",
    labels: &[],
};

pub static TASK_INFO: MetricDesc = MetricDesc {
    name: "scp_task_info",
    help: "Current task information",
    labels: &["uuid", "name", "state"],
};

pub static TASKS_PENDING: MetricDesc = MetricDesc {
    name: "scp_tasks_pending_count",
    help: "Number of pending or running tasks",
    labels: &[],
};

pub static API_UP: MetricDesc = MetricDesc {
    name: "scp_api_up",
    help: "API is reachable (1) / unreachable (0)",
    labels: &[],
};

// ── Legacy-only descriptors ────────────────────────────────────────

pub static LEGACY_SERVER_STATUS: MetricDesc = MetricDesc {
    name: "scp_server_status",
    help: "Online (1) / Offline (0) status",
    labels: &["vserver", "status", "nickname"],
};

pub static REBOOT_RECOMMENDED: MetricDesc = MetricDesc {
    name: "scp_reboot_recommended",
    help: "Reboot recommended (1) / not recommended (0)",
    labels: &["vserver", "message"],
};

// ── Descriptor sets ────────────────────────────────────────────────

/// Everything the REST collector can emit.
pub static REST_METRICS: &[&MetricDesc] = &[
    &CPU_CORES,
    &MEMORY_BYTES,
    &MONTHLY_TRAFFIC_IN,
    &MONTHLY_TRAFFIC_OUT,
    &MONTHLY_TRAFFIC_TOTAL,
    &SERVER_START_TIME,
    &IP_INFO,
    &INTERFACE_THROTTLED,
    &SERVER_STATUS,
    &RESCUE_ACTIVE,
    &DISK_CAPACITY,
    &DISK_USED,
    &DISK_OPTIMIZATION,
    &SNAPSHOT_COUNT,
    &CONFIG_CHANGED,
    &INTERFACE_SPEED,
    &CPU_MAX_COUNT,
    &MEMORY_MAX_BYTES,
    &DISKS_AVAILABLE_SPACE,
    &AUTOSTART_ENABLED,
    &UEFI_ENABLED,
    &LATEST_QEMU,
    &DISABLED,
    &SNAPSHOT_ALLOWED,
    &MAINTENANCE_START,
    &MAINTENANCE_FINISH,
    &TASK_INFO,
    &TASKS_PENDING,
    &API_UP,
];

/// Everything the legacy collector can emit.
pub static LEGACY_METRICS: &[&MetricDesc] = &[
    &CPU_CORES,
    &MEMORY_BYTES,
    &MONTHLY_TRAFFIC_IN,
    &MONTHLY_TRAFFIC_OUT,
    &MONTHLY_TRAFFIC_TOTAL,
    &SERVER_START_TIME,
    &IP_INFO,
    &INTERFACE_THROTTLED,
    &LEGACY_SERVER_STATUS,
    &RESCUE_ACTIVE,
    &REBOOT_RECOMMENDED,
    &DISK_CAPACITY,
    &DISK_USED,
    &DISK_OPTIMIZATION,
];
