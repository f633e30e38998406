// Legacy collector over the SOAP web service.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{error, warn};

use super::{Collector, LegacyServerControlApi};
use crate::metrics::{
    self, CPU_CORES, DISK_CAPACITY, DISK_OPTIMIZATION, DISK_USED, INTERFACE_THROTTLED, IP_INFO,
    LEGACY_METRICS, LEGACY_SERVER_STATUS, MEMORY_BYTES, MONTHLY_TRAFFIC_IN, MONTHLY_TRAFFIC_OUT,
    MONTHLY_TRAFFIC_TOTAL, MetricDesc, REBOOT_RECOMMENDED, RESCUE_ACTIVE, SERVER_START_TIME,
    Sample,
};
use crate::model::VServer;
use crate::uptime::parse_uptime;

/// Collector over the login/password SOAP API.
pub struct LegacyCollector<A> {
    api: A,
}

impl<A: LegacyServerControlApi> LegacyCollector<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn scrape_at(&self, now: DateTime<Utc>) -> Vec<Sample> {
        let names = match self.api.get_vservers().await {
            Ok(names) => names,
            Err(e) => {
                error!(
                    error = %e,
                    auth_failure = e.is_auth_failure(),
                    answered = e.is_missing_payload(),
                    "unable to get servers"
                );
                return Vec::new();
            }
        };

        let mut samples = Vec::new();
        for name in &names {
            match self.api.get_vserver_information(name).await {
                Ok(vserver) => samples.extend(vserver_samples(name, &vserver, now)),
                Err(e) => error!(vserver = %name, error = %e, "unable to get server information"),
            }
        }
        samples
    }
}

impl<A: LegacyServerControlApi> Collector for LegacyCollector<A> {
    fn describe(&self) -> &'static [&'static MetricDesc] {
        LEGACY_METRICS
    }

    fn collect(&self) -> BoxFuture<'_, Vec<Sample>> {
        self.scrape_at(Utc::now()).boxed()
    }
}

/// Map one vserver into samples. `name` is the listing name used as the
/// `vserver` label.
pub(crate) fn vserver_samples(name: &str, vs: &VServer, now: DateTime<Utc>) -> Vec<Sample> {
    let mut out = Vec::new();

    if let Some(cores) = vs.cpu_cores {
        out.push(Sample::new(&CPU_CORES, &[name], f64::from(cores)));
    }
    if let Some(mib) = vs.memory_mib {
        out.push(Sample::new(&MEMORY_BYTES, &[name], metrics::mib_to_bytes(mib)));
    }

    if let Some(ref traffic) = vs.traffic {
        let month = traffic.month.map(|m| m.to_string()).unwrap_or_default();
        let year = traffic.year.map(|y| y.to_string()).unwrap_or_default();
        let period = [name, month.as_str(), year.as_str()];
        for (desc, mib) in [
            (&MONTHLY_TRAFFIC_IN, traffic.in_mib),
            (&MONTHLY_TRAFFIC_OUT, traffic.out_mib),
            (&MONTHLY_TRAFFIC_TOTAL, traffic.total_mib),
        ] {
            if let Some(mib) = mib {
                out.push(Sample::new(desc, &period, metrics::mib_to_bytes(mib)));
            }
        }
    }

    out.push(Sample::new(
        &LEGACY_SERVER_STATUS,
        &[name, vs.status.as_str(), vs.nickname.as_str()],
        metrics::flag(vs.is_online()),
    ));
    out.push(Sample::new(
        &RESCUE_ACTIVE,
        &[name, vs.rescue_message.as_str()],
        metrics::flag(vs.rescue_enabled),
    ));
    out.push(Sample::new(
        &REBOOT_RECOMMENDED,
        &[name, vs.reboot_message.as_str()],
        metrics::flag(vs.reboot_recommended),
    ));

    let mut seen_ips = HashSet::new();
    for ip in &vs.ips {
        if seen_ips.insert(ip.as_str()) {
            out.push(Sample::new(&IP_INFO, &[name, ip.as_str()], 1.0));
        }
    }

    for iface in &vs.interfaces {
        let throttled = metrics::flag(iface.throttled);
        // One seen-set across both families per interface.
        let mut seen = HashSet::new();
        let addresses = iface
            .ipv4_addresses
            .iter()
            .map(|ip| (ip, "ipv4"))
            .chain(iface.ipv6_addresses.iter().map(|ip| (ip, "ipv6")));
        for (ip, ip_type) in addresses {
            if !seen.insert(ip.as_str()) {
                continue;
            }
            out.push(Sample::new(
                &INTERFACE_THROTTLED,
                &[
                    name,
                    iface.driver.as_str(),
                    iface.id.as_str(),
                    ip.as_str(),
                    ip_type,
                    iface.mac.as_str(),
                    iface.throttle_message.as_str(),
                ],
                throttled,
            ));
        }
    }

    for disk in &vs.disks {
        let labels = [name, disk.driver.as_str(), disk.name.as_str()];
        if let Some(gib) = disk.capacity_gib {
            out.push(Sample::new(&DISK_CAPACITY, &labels, metrics::gib_to_bytes(gib)));
        }
        if let Some(gib) = disk.used_gib {
            out.push(Sample::new(&DISK_USED, &labels, metrics::gib_to_bytes(gib)));
        }
        out.push(Sample::new(
            &DISK_OPTIMIZATION,
            &[
                name,
                disk.driver.as_str(),
                disk.name.as_str(),
                disk.optimization_message.as_str(),
            ],
            metrics::flag(disk.optimization_recommended),
        ));
    }

    if let Some(ref text) = vs.uptime {
        match parse_uptime(text) {
            Ok(uptime) => {
                let secs = i64::try_from(uptime.as_secs()).unwrap_or(i64::MAX);
                out.push(Sample::new(
                    &SERVER_START_TIME,
                    &[name],
                    metrics::timestamp(now.timestamp().saturating_sub(secs)),
                ));
            }
            Err(e) => warn!(vserver = %name, error = %e, "unable to parse uptime"),
        }
    }

    out
}
