// REST collector: liveness, maintenance, tasks and per-server detail.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{debug, error, warn};

use super::{Collector, ServerControlApi};
use crate::metrics::{
    self, API_UP, AUTOSTART_ENABLED, CONFIG_CHANGED, CPU_CORES, CPU_MAX_COUNT, DISABLED,
    DISK_CAPACITY, DISK_OPTIMIZATION, DISK_USED, DISKS_AVAILABLE_SPACE, INTERFACE_SPEED,
    INTERFACE_THROTTLED, IP_INFO, LATEST_QEMU, MAINTENANCE_FINISH, MAINTENANCE_START,
    MEMORY_BYTES, MEMORY_MAX_BYTES, MONTHLY_TRAFFIC_IN, MONTHLY_TRAFFIC_OUT,
    MONTHLY_TRAFFIC_TOTAL, MetricDesc, RESCUE_ACTIVE, REST_METRICS, SERVER_START_TIME,
    SERVER_STATUS, SNAPSHOT_ALLOWED, SNAPSHOT_COUNT, Sample, TASK_INFO, TASKS_PENDING,
    UEFI_ENABLED,
};
use crate::model::{MaintenanceWindow, Server, ServerListEntry, ServerLiveInfo, Task};

/// Collector over the OAuth2-authenticated REST API.
pub struct ScpCollector<A> {
    api: A,
}

impl<A: ServerControlApi> ScpCollector<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Run one scrape, stamping time-derived values with `now`.
    pub async fn scrape_at(&self, now: DateTime<Utc>) -> Vec<Sample> {
        let mut samples = Vec::new();

        let up = match self.api.ping().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "API ping failed");
                false
            }
        };
        samples.push(Sample::new(&API_UP, &[], metrics::flag(up)));

        match self.api.maintenance().await {
            Ok(window) => samples.extend(maintenance_samples(&window)),
            Err(e) => error!(
                error = %e,
                status = ?e.status(),
                "unable to get maintenance information"
            ),
        }

        let servers = match self.api.list_servers().await {
            Ok(servers) => servers,
            Err(e) => {
                error!(
                    error = %e,
                    status = ?e.status(),
                    auth_failure = e.is_auth_failure(),
                    answered = e.is_missing_payload(),
                    "unable to get servers"
                );
                return samples;
            }
        };

        match self.api.list_tasks().await {
            Ok(tasks) => samples.extend(task_samples(&tasks)),
            Err(e) => error!(error = %e, status = ?e.status(), "unable to get tasks"),
        }

        for entry in &servers {
            let Some(id) = entry.id else {
                warn!(vserver = %entry.name, "server listed without id, skipping");
                continue;
            };
            match self.api.get_server(id).await {
                Ok(server) => samples.extend(server_samples(entry, &server, now)),
                Err(e) => {
                    error!(
                        vserver = %entry.name,
                        error = %e,
                        status = ?e.status(),
                        "unable to get server information"
                    );
                }
            }
        }

        samples
    }
}

impl<A: ServerControlApi> Collector for ScpCollector<A> {
    fn describe(&self) -> &'static [&'static MetricDesc] {
        REST_METRICS
    }

    fn collect(&self) -> BoxFuture<'_, Vec<Sample>> {
        self.scrape_at(Utc::now()).boxed()
    }
}

// ── Mapping ────────────────────────────────────────────────────────

fn maintenance_samples(window: &MaintenanceWindow) -> Vec<Sample> {
    let mut out = Vec::new();
    if let Some(start) = window.start {
        out.push(Sample::new(
            &MAINTENANCE_START,
            &[],
            metrics::timestamp(start.timestamp()),
        ));
    }
    if let Some(finish) = window.finish {
        out.push(Sample::new(
            &MAINTENANCE_FINISH,
            &[],
            metrics::timestamp(finish.timestamp()),
        ));
    }
    out
}

fn task_samples(tasks: &[Task]) -> Vec<Sample> {
    let mut out: Vec<Sample> = tasks
        .iter()
        .map(|task| {
            let state = task.state.as_ref().map_or("", |s| s.as_str());
            Sample::new(&TASK_INFO, &[task.uuid.as_str(), task.name.as_str(), state], 1.0)
        })
        .collect();

    let pending = tasks.iter().filter(|t| t.is_active()).count();
    out.push(Sample::new(
        &TASKS_PENDING,
        &[],
        metrics::gauge(u64::try_from(pending).unwrap_or(u64::MAX)),
    ));
    out
}

/// Map one server's detail into samples.
///
/// `entry` comes from the listing and provides the `vserver` and
/// `nickname` labels.
pub(crate) fn server_samples(
    entry: &ServerListEntry,
    server: &Server,
    now: DateTime<Utc>,
) -> Vec<Sample> {
    let vserver = entry.name.as_str();
    let mut out = Vec::new();

    out.push(Sample::new(&DISABLED, &[vserver], metrics::flag(server.disabled)));

    if let Some(max) = server.max_cpu_count {
        out.push(Sample::new(&CPU_MAX_COUNT, &[vserver], f64::from(max)));
    }
    if let Some(mib) = server.disks_available_space_mib {
        out.push(Sample::new(
            &DISKS_AVAILABLE_SPACE,
            &[vserver],
            metrics::mib_to_bytes(mib),
        ));
    }

    out.push(Sample::new(
        &SNAPSHOT_ALLOWED,
        &[vserver],
        metrics::flag(server.snapshot_allowed),
    ));

    if let Some(count) = server.snapshot_count {
        out.push(Sample::new(&SNAPSHOT_COUNT, &[vserver], f64::from(count)));
    }

    if let Some(ref live) = server.live {
        live_samples(&mut out, entry, server, live, now);
    }

    out.push(Sample::new(
        &RESCUE_ACTIVE,
        &[vserver, ""],
        metrics::flag(server.rescue_system_active),
    ));

    let mut seen = HashSet::new();
    for ip in server
        .ipv4_addresses
        .iter()
        .chain(&server.ipv6_network_prefixes)
    {
        if seen.insert(ip.as_str()) {
            out.push(Sample::new(&IP_INFO, &[vserver, ip.as_str()], 1.0));
        }
    }

    out
}

fn live_samples(
    out: &mut Vec<Sample>,
    entry: &ServerListEntry,
    server: &Server,
    live: &ServerLiveInfo,
    now: DateTime<Utc>,
) {
    let vserver = entry.name.as_str();

    if let Some(cpus) = live.cpu_count {
        out.push(Sample::new(&CPU_CORES, &[vserver], f64::from(cpus)));
    }
    if let Some(mib) = live.memory_mib {
        out.push(Sample::new(&MEMORY_BYTES, &[vserver], metrics::mib_to_bytes(mib)));
    }
    if let Some(mib) = live.max_memory_mib {
        out.push(Sample::new(
            &MEMORY_MAX_BYTES,
            &[vserver],
            metrics::mib_to_bytes(mib),
        ));
    }

    for (desc, value) in [
        (&AUTOSTART_ENABLED, live.autostart),
        (&UEFI_ENABLED, live.uefi),
        (&LATEST_QEMU, live.latest_qemu),
        (&CONFIG_CHANGED, live.config_changed),
    ] {
        out.push(Sample::new(desc, &[vserver], metrics::flag(value)));
    }

    // Monthly traffic, summed over all interfaces.
    let month = now.month().to_string();
    let year = now.year().to_string();
    let traffic_in: f64 = live
        .interfaces
        .iter()
        .filter_map(|i| i.rx_monthly_mib)
        .map(metrics::mib_to_bytes)
        .sum();
    let traffic_out: f64 = live
        .interfaces
        .iter()
        .filter_map(|i| i.tx_monthly_mib)
        .map(metrics::mib_to_bytes)
        .sum();
    let period = [vserver, month.as_str(), year.as_str()];
    out.push(Sample::new(&MONTHLY_TRAFFIC_IN, &period, traffic_in));
    out.push(Sample::new(&MONTHLY_TRAFFIC_OUT, &period, traffic_out));
    out.push(Sample::new(
        &MONTHLY_TRAFFIC_TOTAL,
        &period,
        traffic_in + traffic_out,
    ));

    let status = live.state.as_ref().map_or("", |s| s.as_str());
    let running = live.state.as_ref().is_some_and(|s| s.is_running());
    let architecture = server.architecture.as_ref().map_or("", |a| a.as_str());
    out.push(Sample::new(
        &SERVER_STATUS,
        &[
            vserver,
            status,
            entry.nickname.as_str(),
            architecture,
            server.site_city.as_str(),
        ],
        metrics::flag(running),
    ));

    if let Some(uptime) = live.uptime_seconds {
        let uptime = i64::try_from(uptime).unwrap_or(i64::MAX);
        out.push(Sample::new(
            &SERVER_START_TIME,
            &[vserver],
            metrics::timestamp(now.timestamp().saturating_sub(uptime)),
        ));
    }

    for iface in &live.interfaces {
        let (mac, driver) = (iface.mac.as_str(), iface.driver.as_str());

        if let Some(speed) = iface.speed_mbits {
            out.push(Sample::new(
                &INTERFACE_SPEED,
                &[vserver, mac, driver],
                metrics::gauge(speed),
            ));
        }

        let throttled = metrics::flag(iface.throttled);
        let addresses = iface
            .ipv4_addresses
            .iter()
            .map(|ip| (ip, "ipv4"))
            .chain(iface.ipv6_link_local_addresses.iter().map(|ip| (ip, "ipv6")))
            .chain(iface.ipv6_network_prefixes.iter().map(|ip| (ip, "ipv6")));

        let mut seen = HashSet::new();
        for (ip, ip_type) in addresses {
            if !seen.insert((ip.as_str(), ip_type)) {
                continue;
            }
            out.push(Sample::new(
                &INTERFACE_THROTTLED,
                &[
                    vserver,
                    driver,
                    iface.id.as_str(),
                    ip.as_str(),
                    ip_type,
                    mac,
                    iface.throttle_message.as_str(),
                ],
                throttled,
            ));
        }
    }

    // The optimization hint is server-wide; every disk carries it.
    let (optimize, message) = match live.required_storage_optimization {
        Some(ref opt) if opt.is_recommended() => (1.0, opt.as_str()),
        _ => (0.0, ""),
    };

    for disk in &live.disks {
        let (driver, name) = (disk.driver.as_str(), disk.name.as_str());
        if let Some(mib) = disk.capacity_mib {
            out.push(Sample::new(
                &DISK_CAPACITY,
                &[vserver, driver, name],
                metrics::mib_to_bytes(mib),
            ));
        }
        if let Some(mib) = disk.allocation_mib {
            out.push(Sample::new(
                &DISK_USED,
                &[vserver, driver, name],
                metrics::mib_to_bytes(mib),
            ));
        }
        out.push(Sample::new(
            &DISK_OPTIMIZATION,
            &[vserver, driver, name, message],
            optimize,
        ));
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{
        Architecture, Disk, Interface, ServerState, StorageOptimization, TaskState,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn entry() -> ServerListEntry {
        ServerListEntry {
            id: Some(1),
            name: "v2202401".into(),
            nickname: "web".into(),
        }
    }

    fn find<'a>(samples: &'a [Sample], name: &str) -> Vec<&'a Sample> {
        samples.iter().filter(|s| s.desc.name == name).collect()
    }

    #[test]
    fn server_without_live_info_emits_static_flags_only() {
        let samples = server_samples(&entry(), &Server::default(), now());

        let names: Vec<_> = samples.iter().map(|s| s.desc.name).collect();
        assert_eq!(
            names,
            vec!["scp_disabled", "scp_snapshot_allowed", "scp_rescue_active"]
        );
        assert!(samples.iter().all(|s| s.value == 0.0));
    }

    #[test]
    fn live_flags_default_to_zero() {
        let server = Server {
            live: Some(ServerLiveInfo::default()),
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());

        for name in [
            "scp_autostart_enabled",
            "scp_uefi_enabled",
            "scp_latest_qemu",
            "scp_config_changed",
        ] {
            let found = find(&samples, name);
            assert_eq!(found.len(), 1, "{name}");
            assert_eq!(found[0].value, 0.0, "{name}");
        }
        assert!(find(&samples, "scp_cpu_cores").is_empty());
        assert!(find(&samples, "scp_server_start_time_seconds").is_empty());
    }

    #[test]
    fn status_labels_and_running_state() {
        let server = Server {
            architecture: Some(Architecture::Amd64),
            site_city: "Nuremberg".into(),
            live: Some(ServerLiveInfo {
                state: Some(ServerState::Running),
                ..ServerLiveInfo::default()
            }),
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());
        let status = find(&samples, "scp_server_status");

        assert_eq!(status.len(), 1);
        assert_eq!(
            status[0].labels,
            vec!["v2202401", "RUNNING", "web", "AMD64", "Nuremberg"]
        );
        assert_eq!(status[0].value, 1.0);
    }

    #[test]
    fn unknown_state_is_offline_with_verbatim_label() {
        let server = Server {
            live: Some(ServerLiveInfo {
                state: Some(ServerState::from("SHUTOFF")),
                ..ServerLiveInfo::default()
            }),
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());
        let status = find(&samples, "scp_server_status");
        assert_eq!(status[0].label("status"), Some("SHUTOFF"));
        assert_eq!(status[0].value, 0.0);
    }

    #[test]
    fn traffic_sums_interfaces_with_scrape_month() {
        let server = Server {
            live: Some(ServerLiveInfo {
                interfaces: vec![
                    Interface {
                        rx_monthly_mib: Some(1),
                        tx_monthly_mib: Some(2),
                        ..Interface::default()
                    },
                    Interface {
                        rx_monthly_mib: Some(3),
                        ..Interface::default()
                    },
                ],
                ..ServerLiveInfo::default()
            }),
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());

        let inbound = find(&samples, "scp_monthlytraffic_in_bytes");
        let outbound = find(&samples, "scp_monthlytraffic_out_bytes");
        let total = find(&samples, "scp_monthlytraffic_total_bytes");
        assert_eq!(inbound[0].labels, vec!["v2202401", "3", "2026"]);
        assert_eq!(inbound[0].value, 4.0 * 1_048_576.0);
        assert_eq!(outbound[0].value, 2.0 * 1_048_576.0);
        assert_eq!(total[0].value, inbound[0].value + outbound[0].value);
    }

    #[test]
    fn start_time_is_now_minus_uptime() {
        let server = Server {
            live: Some(ServerLiveInfo {
                uptime_seconds: Some(3_600),
                ..ServerLiveInfo::default()
            }),
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());
        let start = find(&samples, "scp_server_start_time_seconds");
        assert_eq!(start[0].value, metrics::timestamp(now().timestamp() - 3_600));
    }

    #[test]
    fn duplicate_interface_addresses_emit_once() {
        let server = Server {
            live: Some(ServerLiveInfo {
                interfaces: vec![Interface {
                    mac: "00:11:22:33:44:55".into(),
                    driver: "virtio".into(),
                    throttled: true,
                    ipv4_addresses: vec!["203.0.113.7".into(), "203.0.113.7".into()],
                    ipv6_link_local_addresses: vec!["fe80::1".into()],
                    ipv6_network_prefixes: vec!["fe80::1".into(), "2001:db8::".into()],
                    ..Interface::default()
                }],
                ..ServerLiveInfo::default()
            }),
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());
        let throttled = find(&samples, "scp_interface_throttled");

        let keys: Vec<_> = throttled
            .iter()
            .map(|s| (s.label("ip"), s.label("ip_type")))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Some("203.0.113.7"), Some("ipv4")),
                (Some("fe80::1"), Some("ipv6")),
                (Some("2001:db8::"), Some("ipv6")),
            ]
        );
        assert!(throttled.iter().all(|s| s.value == 1.0));
        assert!(throttled.iter().all(|s| s.label("id") == Some("")));
    }

    #[test]
    fn disk_optimization_fans_out_to_every_disk() {
        let disks = vec![
            Disk {
                name: "vda".into(),
                driver: "virtio".into(),
                capacity_mib: Some(10),
                allocation_mib: None,
            },
            Disk {
                name: "vdb".into(),
                driver: "virtio".into(),
                capacity_mib: None,
                allocation_mib: Some(5),
            },
        ];
        let server = Server {
            live: Some(ServerLiveInfo {
                required_storage_optimization: Some(StorageOptimization::Compat),
                disks,
                ..ServerLiveInfo::default()
            }),
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());

        let optimization = find(&samples, "scp_disk_optimization");
        assert_eq!(optimization.len(), 2);
        assert!(
            optimization
                .iter()
                .all(|s| s.value == 1.0 && s.label("message") == Some("COMPAT"))
        );
        assert_eq!(find(&samples, "scp_disk_capacity_bytes").len(), 1);
        assert_eq!(find(&samples, "scp_disk_used_bytes").len(), 1);
    }

    #[test]
    fn disk_optimization_no_means_zero_and_empty_message() {
        let server = Server {
            live: Some(ServerLiveInfo {
                required_storage_optimization: Some(StorageOptimization::No),
                disks: vec![Disk::default()],
                ..ServerLiveInfo::default()
            }),
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());
        let optimization = find(&samples, "scp_disk_optimization");
        assert_eq!(optimization[0].value, 0.0);
        assert_eq!(optimization[0].label("message"), Some(""));
    }

    #[test]
    fn server_ips_are_deduplicated() {
        let server = Server {
            ipv4_addresses: vec!["203.0.113.7".into(), "203.0.113.7".into()],
            ipv6_network_prefixes: vec!["2001:db8::".into()],
            ..Server::default()
        };
        let samples = server_samples(&entry(), &server, now());
        assert_eq!(find(&samples, "scp_ip_info").len(), 2);
    }

    #[test]
    fn pending_count_includes_running_tasks() {
        let tasks = vec![
            Task {
                uuid: "a".into(),
                name: "Start".into(),
                state: Some(TaskState::Pending),
            },
            Task {
                uuid: "b".into(),
                name: "Stop".into(),
                state: Some(TaskState::Running),
            },
            Task {
                uuid: "c".into(),
                name: String::new(),
                state: Some(TaskState::Finished),
            },
            Task::default(),
        ];
        let samples = task_samples(&tasks);

        assert_eq!(find(&samples, "scp_task_info").len(), 4);
        assert_eq!(find(&samples, "scp_tasks_pending_count")[0].value, 2.0);
        assert_eq!(samples[3].labels, vec!["", "", ""]);
    }
}
