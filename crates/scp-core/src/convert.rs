// ── API-to-domain type conversions ──
//
// Bridges raw `scp_api` response types into `scp_core::model` types.
// Absent flags become `false`, absent label text becomes `""`, absent
// numbers stay `None` so the collectors can omit the sample.

use scp_api::rest::types as rest;
use scp_api::soap::types as soap;

use crate::model::{
    Architecture, Disk, Interface, LegacyDisk, LegacyInterface, MaintenanceWindow,
    MonthlyTraffic, Server, ServerListEntry, ServerLiveInfo, ServerState, StorageOptimization,
    Task, TaskState, VServer,
};

// ── REST ───────────────────────────────────────────────────────────

impl From<rest::ServerListMinimal> for ServerListEntry {
    fn from(s: rest::ServerListMinimal) -> Self {
        Self {
            id: s.id,
            name: s.name.unwrap_or_default(),
            nickname: s.nickname.unwrap_or_default(),
        }
    }
}

impl From<rest::Server> for Server {
    fn from(s: rest::Server) -> Self {
        let ipv4_addresses = s
            .ipv4_addresses
            .unwrap_or_default()
            .into_iter()
            .filter_map(|addr| addr.ip)
            .collect();
        let ipv6_network_prefixes = s
            .ipv6_addresses
            .unwrap_or_default()
            .into_iter()
            .filter_map(|addr| addr.network_prefix)
            .collect();

        Self {
            id: s.id,
            name: s.name.unwrap_or_default(),
            nickname: s.nickname.unwrap_or_default(),
            architecture: s.architecture.as_deref().map(Architecture::from),
            site_city: s.site.and_then(|site| site.city).unwrap_or_default(),
            disabled: s.disabled.unwrap_or(false),
            max_cpu_count: s.max_cpu_count,
            snapshot_allowed: s.snapshot_allowed.unwrap_or(false),
            snapshot_count: s.snapshot_count,
            disks_available_space_mib: s.disks_available_space_in_mib,
            rescue_system_active: s.rescue_system_active.unwrap_or(false),
            ipv4_addresses,
            ipv6_network_prefixes,
            live: s.server_live_info.map(ServerLiveInfo::from),
        }
    }
}

impl From<rest::ServerLiveInfo> for ServerLiveInfo {
    fn from(l: rest::ServerLiveInfo) -> Self {
        Self {
            state: l.state.as_deref().map(ServerState::from),
            cpu_count: l.cpu_count,
            memory_mib: l.current_server_memory_in_mib,
            max_memory_mib: l.max_server_memory_in_mib,
            uptime_seconds: l.uptime_in_seconds,
            autostart: l.autostart.unwrap_or(false),
            uefi: l.uefi.unwrap_or(false),
            latest_qemu: l.latest_qemu.unwrap_or(false),
            config_changed: l.config_changed.unwrap_or(false),
            required_storage_optimization: l
                .required_storage_optimization
                .as_deref()
                .map(StorageOptimization::from),
            interfaces: l
                .interfaces
                .unwrap_or_default()
                .into_iter()
                .map(Interface::from)
                .collect(),
            disks: l
                .disks
                .unwrap_or_default()
                .into_iter()
                .map(Disk::from)
                .collect(),
        }
    }
}

impl From<rest::ServerInterface> for Interface {
    fn from(i: rest::ServerInterface) -> Self {
        Self {
            id: String::new(),
            mac: i.mac.unwrap_or_default(),
            driver: i.driver.unwrap_or_default(),
            speed_mbits: i.speed_in_mbits,
            rx_monthly_mib: i.rx_monthly_in_mib,
            tx_monthly_mib: i.tx_monthly_in_mib,
            throttled: i.traffic_throttled.unwrap_or(false),
            throttle_message: String::new(),
            ipv4_addresses: i.ipv4_addresses.unwrap_or_default(),
            ipv6_link_local_addresses: i.ipv6_link_local_addresses.unwrap_or_default(),
            ipv6_network_prefixes: i.ipv6_network_prefixes.unwrap_or_default(),
        }
    }
}

impl From<rest::ServerDisk> for Disk {
    fn from(d: rest::ServerDisk) -> Self {
        Self {
            name: d.dev.unwrap_or_default(),
            driver: d.driver.unwrap_or_default(),
            capacity_mib: d.capacity_in_mib,
            allocation_mib: d.allocation_in_mib,
        }
    }
}

impl From<rest::TaskInfo> for Task {
    fn from(t: rest::TaskInfo) -> Self {
        Self {
            uuid: t.uuid.unwrap_or_default(),
            name: t.name.unwrap_or_default(),
            state: t.state.as_deref().map(TaskState::from),
        }
    }
}

impl From<rest::MaintenanceInfo> for MaintenanceWindow {
    fn from(m: rest::MaintenanceInfo) -> Self {
        Self {
            start: m.start_at,
            finish: m.finish_at,
        }
    }
}

// ── SOAP ───────────────────────────────────────────────────────────

impl From<soap::VServerInformation> for VServer {
    fn from(v: soap::VServerInformation) -> Self {
        Self {
            name: v.vserver_name.unwrap_or_default(),
            nickname: v.vserver_nickname.unwrap_or_default(),
            status: v.status.unwrap_or_default(),
            uptime: v.uptime,
            cpu_cores: v.cpu_cores,
            memory_mib: v.memory,
            traffic: v.current_month.map(|m| MonthlyTraffic {
                month: m.month,
                year: m.year,
                in_mib: m.traffic_in,
                out_mib: m.traffic_out,
                total_mib: m.traffic_total,
            }),
            ips: v.ips,
            interfaces: v
                .server_interfaces
                .into_iter()
                .map(LegacyInterface::from)
                .collect(),
            disks: v.server_disks.into_iter().map(LegacyDisk::from).collect(),
            rescue_enabled: v.rescue_enabled.unwrap_or(false),
            rescue_message: v.rescue_enabled_message.unwrap_or_default(),
            reboot_recommended: v.reboot_recommended.unwrap_or(false),
            reboot_message: v.reboot_recommended_message.unwrap_or_default(),
        }
    }
}

impl From<soap::ServerInterface> for LegacyInterface {
    fn from(i: soap::ServerInterface) -> Self {
        Self {
            id: i.id.unwrap_or_default(),
            mac: i.mac.unwrap_or_default(),
            driver: i.driver.unwrap_or_default(),
            ipv4_addresses: i.ipv4_ips,
            ipv6_addresses: i.ipv6_ips,
            throttled: i.traffic_throttled.unwrap_or(false),
            throttle_message: i.traffic_throttled_message.unwrap_or_default(),
        }
    }
}

impl From<soap::ServerDisk> for LegacyDisk {
    fn from(d: soap::ServerDisk) -> Self {
        Self {
            name: d.name.unwrap_or_default(),
            driver: d.driver.unwrap_or_default(),
            capacity_gib: d.capacity,
            used_gib: d.used,
            optimization_recommended: d.optimization_recommended.unwrap_or(false),
            optimization_message: d.optimization_recommended_message.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_flags_default_to_false() {
        let server = Server::from(rest::Server {
            server_live_info: Some(rest::ServerLiveInfo::default()),
            ..rest::Server::default()
        });

        assert!(!server.disabled);
        assert!(!server.snapshot_allowed);
        assert!(!server.rescue_system_active);
        let live = server.live.as_ref().map(|l| (l.autostart, l.uefi, l.latest_qemu));
        assert_eq!(live, Some((false, false, false)));
    }

    #[test]
    fn server_addresses_skip_missing_values() {
        let server = Server::from(rest::Server {
            ipv4_addresses: Some(vec![
                rest::Ipv4Address {
                    ip: Some("203.0.113.7".into()),
                    ..Default::default()
                },
                rest::Ipv4Address::default(),
            ]),
            ipv6_addresses: Some(vec![rest::Ipv6Address {
                network_prefix: Some("2001:db8::".into()),
                ..Default::default()
            }]),
            ..rest::Server::default()
        });

        assert_eq!(server.ipv4_addresses, vec!["203.0.113.7".to_string()]);
        assert_eq!(server.ipv6_network_prefixes, vec!["2001:db8::".to_string()]);
    }

    #[test]
    fn site_city_and_architecture() {
        let server = Server::from(rest::Server {
            architecture: Some("ARM64".into()),
            site: Some(rest::Site {
                id: Some(1),
                city: Some("Vienna".into()),
            }),
            ..rest::Server::default()
        });

        assert_eq!(server.architecture, Some(Architecture::Arm64));
        assert_eq!(server.site_city, "Vienna");
    }
}
