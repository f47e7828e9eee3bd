//! Static refresh job and group tables
//!
//! Jobs and groups are configuration-time constants with process lifetime.
//! A group is triggered whenever the wall-clock minute lands in its bucket
//! set; bucket sets are staggered across the hour so the expensive joins
//! never land on the same tick as the cheap per-minute checks. Bucket sets
//! must not overlap between groups — that is a convention, not an enforced
//! rule.

use crate::catalog::queries;
use std::time::Duration;

/// TTL for the trend-catalog KPI keys
pub const KPI_TTL_SECS: u64 = 3600;

/// Where a job's statement comes from
#[derive(Debug, Clone, Copy)]
pub enum JobSource {
    /// Resolve the job name against the trend catalog
    Trend,
    /// Resolve against the latest catalog; the cache key gains the
    /// `kpidashboard-` prefix
    Latest,
    /// Fixed statement
    Fixed(&'static str),
    /// Expand over the configured server addresses, one key per address
    EachServer,
}

/// One named refresh job
#[derive(Debug, Clone, Copy)]
pub struct JobSpec {
    /// Unique name; doubles as the cache key (possibly prefixed or suffixed)
    pub name: &'static str,
    pub source: JobSource,
    /// Seconds until the published key expires on its own; None = no expiry
    pub ttl_secs: Option<u64>,
    /// Secondary key republished with the identical payload
    pub alias: Option<&'static str>,
}

impl JobSpec {
    /// Deterministic cache key for this job (readers compute it the same way)
    pub fn cache_key(&self) -> String {
        match self.source {
            JobSource::Latest => format!("kpidashboard-{}", self.name),
            _ => self.name.to_string(),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

const fn fixed(name: &'static str, sql: &'static str) -> JobSpec {
    JobSpec {
        name,
        source: JobSource::Fixed(sql),
        ttl_secs: None,
        alias: None,
    }
}

const fn trend(name: &'static str) -> JobSpec {
    JobSpec {
        name,
        source: JobSource::Trend,
        ttl_secs: Some(KPI_TTL_SECS),
        alias: None,
    }
}

const fn latest(name: &'static str) -> JobSpec {
    JobSpec {
        name,
        source: JobSource::Latest,
        ttl_secs: None,
        alias: None,
    }
}

/// A set of jobs triggered together on the same schedule buckets
#[derive(Debug)]
pub struct RefreshGroup {
    pub name: &'static str,
    /// Minute-of-hour values that trigger this group
    pub buckets: &'static [u32],
    /// Jobs spawned concurrently; a join point waits for all of them
    pub parallel: &'static [JobSpec],
    /// Jobs awaited strictly in sequence (later jobs read earlier output)
    pub ordered: &'static [JobSpec],
}

impl RefreshGroup {
    pub fn is_due(&self, minute: u32) -> bool {
        self.buckets.contains(&minute)
    }

    /// All jobs in the group, parallel first
    pub fn jobs(&self) -> impl Iterator<Item = &'static JobSpec> {
        self.parallel.iter().chain(self.ordered.iter())
    }
}

static KPI_PARALLEL: &[JobSpec] = &[
    fixed("snr_map", queries::SNR_MAP),
    fixed("mesh_addresses", queries::MESH_ADDRESSES),
    fixed("pmp_locations", queries::PMP_LOCATIONS),
    fixed("mesh_gps_recent", queries::MESH_GPS_RECENT),
    trend("latency"),
    trend("signal_quality"),
    trend("signal_snr"),
    trend("packet_flow"),
    trend("sensor_temp"),
    trend("wireless_config"),
    trend("operability"),
    trend("snr_latest"),
    latest("latency"),
    // The latest signal-quality snapshot is also what the SNR widget reads.
    JobSpec {
        name: "signal_quality",
        source: JobSource::Latest,
        ttl_secs: None,
        alias: Some("kpidashboard-snr_latest"),
    },
    latest("sensor_temp"),
    latest("operability"),
    fixed("operability_monthly", queries::OPERABILITY_MONTHLY),
    fixed("operability_daily", queries::OPERABILITY_DAILY),
];

// The derived day series must observe the freshest traffic rows, so this
// tail runs after-one-another instead of racing the pool.
static KPI_ORDERED: &[JobSpec] = &[
    fixed("wireless_day", queries::WIRELESS_DAY),
    fixed("wired_day", queries::WIRED_DAY),
    fixed("sensor_history", queries::SENSOR_HISTORY),
];

static STATUS_PARALLEL: &[JobSpec] = &[
    fixed("database_status", queries::DATABASE_STATUS),
    fixed("mesh_last_minute", queries::MESH_LAST_MINUTE),
    fixed("haul_truck_last_seen", queries::HAUL_TRUCK_LAST_SEEN),
    fixed("haul_truck_downtime", queries::HAUL_TRUCK_DOWNTIME),
    fixed("cost_wireless_day", queries::COST_WIRELESS_DAY),
    fixed("cost_wired_day", queries::COST_WIRED_DAY),
    fixed("haul_trucks_active", queries::HAUL_TRUCKS_ACTIVE),
    fixed("cost_wired_peers", queries::COST_WIRED_PEERS),
    fixed("cost_wireless_peers", queries::COST_WIRELESS_PEERS),
    JobSpec {
        name: "server_health",
        source: JobSource::EachServer,
        ttl_secs: None,
        alias: None,
    },
];

static TOPOLOGY_PARALLEL: &[JobSpec] = &[
    fixed("topology_status", queries::TOPOLOGY_STATUS),
    fixed("predicted_rx", queries::PREDICTED_RX),
];

/// Every refresh group with its minute buckets
pub static GROUPS: &[RefreshGroup] = &[
    RefreshGroup {
        name: "kpi",
        buckets: &[1, 16, 31, 46],
        parallel: KPI_PARALLEL,
        ordered: KPI_ORDERED,
    },
    RefreshGroup {
        name: "status",
        buckets: &[8, 23, 38, 53],
        parallel: STATUS_PARALLEL,
        ordered: &[],
    },
    RefreshGroup {
        name: "topology",
        buckets: &[5, 20, 35, 50],
        parallel: TOPOLOGY_PARALLEL,
        ordered: &[],
    },
];

/// Groups due at a given wall-clock minute
pub fn due_groups(minute: u32) -> impl Iterator<Item = &'static RefreshGroup> {
    GROUPS.iter().filter(move |g| g.is_due(minute % 60))
}

/// Look up a group by name (for the one-shot CLI path)
pub fn group_by_name(name: &str) -> Option<&'static RefreshGroup> {
    GROUPS.iter().find(|g| g.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_kpi_group_triggers_four_times_per_hour() {
        let triggers = (0..60)
            .filter(|m| group_by_name("kpi").unwrap().is_due(*m))
            .count();
        assert_eq!(triggers, 4);
    }

    #[test]
    fn test_every_group_triggers_only_on_its_buckets() {
        for group in GROUPS {
            for minute in 0..60 {
                assert_eq!(
                    group.is_due(minute),
                    group.buckets.contains(&minute),
                    "group {} minute {}",
                    group.name,
                    minute
                );
            }
        }
    }

    #[test]
    fn test_buckets_do_not_overlap_across_groups() {
        let mut seen = HashSet::new();
        for group in GROUPS {
            for bucket in group.buckets {
                assert!(seen.insert(*bucket), "bucket {} used twice", bucket);
            }
        }
    }

    #[test]
    fn test_due_groups_wraps_minute() {
        let names: Vec<_> = due_groups(61).map(|g| g.name).collect();
        assert_eq!(names, vec!["kpi"]);
        assert_eq!(due_groups(0).count(), 0);
    }

    #[test]
    fn test_cache_keys_are_unique() {
        let mut keys = HashSet::new();
        for group in GROUPS {
            for job in group.jobs() {
                assert!(
                    keys.insert(job.cache_key()),
                    "duplicate cache key {}",
                    job.cache_key()
                );
            }
        }
    }

    #[test]
    fn test_latest_jobs_get_dashboard_prefix() {
        let job = latest("latency");
        assert_eq!(job.cache_key(), "kpidashboard-latency");
        assert_eq!(trend("latency").cache_key(), "latency");
    }

    #[test]
    fn test_trend_jobs_carry_ttl() {
        assert_eq!(trend("latency").ttl(), Some(Duration::from_secs(3600)));
        assert_eq!(latest("latency").ttl(), None);
    }

    #[test]
    fn test_group_lookup() {
        assert!(group_by_name("status").is_some());
        assert!(group_by_name("nope").is_none());
    }
}
