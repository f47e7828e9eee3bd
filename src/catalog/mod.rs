//! The query catalog
//!
//! Static mapping from refresh-job names to aggregation query text. Two named
//! catalogs exist: the trend catalog (windowed series for charts) and the
//! latest catalog (most-recent-sample snapshots for the KPI dashboard).
//! Unknown names fall back to an unfiltered inventory select instead of
//! failing, so a bad job name degrades to broad data rather than crashing a
//! refresh pass. Callers resolving dynamic names should check [`contains`]
//! first.

pub(crate) mod queries;

/// Which catalog a job name resolves against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// Windowed trend series
    Trend,
    /// Most-recent-sample snapshots for the KPI dashboard
    Latest,
}

/// Safety-net query used for names absent from a catalog
pub const FALLBACK_QUERY: &str = "SELECT * FROM inventory";

/// Job names in the trend catalog
pub const TREND_JOBS: &[&str] = &[
    "latency",
    "signal_quality",
    "signal_snr",
    "packet_flow",
    "sensor_temp",
    "wireless_config",
    "operability",
    "snr_latest",
];

/// Job names in the latest catalog
pub const LATEST_JOBS: &[&str] = &[
    "latency",
    "signal_quality",
    "sensor_temp",
    "operability",
];

/// Resolve a job name to its query text, falling back for unknown names
pub fn query_for(kind: CatalogKind, name: &str) -> &'static str {
    match kind {
        CatalogKind::Trend => match name {
            "latency" => queries::TREND_LATENCY,
            "signal_quality" => queries::TREND_SIGNAL_QUALITY,
            "signal_snr" => queries::TREND_SIGNAL_SNR,
            "packet_flow" => queries::TREND_PACKET_FLOW,
            "sensor_temp" => queries::TREND_SENSOR_TEMP,
            "wireless_config" => queries::TREND_WIRELESS_CONFIG,
            "operability" => queries::TREND_OPERABILITY,
            "snr_latest" => queries::TREND_SNR_LATEST,
            _ => FALLBACK_QUERY,
        },
        CatalogKind::Latest => match name {
            "latency" => queries::LATEST_LATENCY,
            "signal_quality" => queries::LATEST_SIGNAL_QUALITY,
            "sensor_temp" => queries::LATEST_SENSOR_TEMP,
            "operability" => queries::LATEST_OPERABILITY,
            _ => FALLBACK_QUERY,
        },
    }
}

/// Whether a name is actually present in a catalog (the fallback hides misses)
pub fn contains(kind: CatalogKind, name: &str) -> bool {
    match kind {
        CatalogKind::Trend => TREND_JOBS.contains(&name),
        CatalogKind::Latest => LATEST_JOBS.contains(&name),
    }
}

/// Per-device server health query.
///
/// The address is substituted directly into the statement; job parameters
/// come from configuration, never from HTTP input.
pub fn server_health_query(addr: &str) -> String {
    format!(
        "SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, vm_name, cpu_used, cpu_total, mem_used, mem_total, disk_used, disk_total \
FROM server_health a \
WHERE a.ip = '{}' AND a.recorded_at >= NOW() - INTERVAL 15 MINUTE",
        addr
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_resolve() {
        for name in TREND_JOBS {
            assert_ne!(query_for(CatalogKind::Trend, name), FALLBACK_QUERY);
        }
        for name in LATEST_JOBS {
            assert_ne!(query_for(CatalogKind::Latest, name), FALLBACK_QUERY);
        }
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(query_for(CatalogKind::Trend, "no_such_job"), FALLBACK_QUERY);
        assert_eq!(query_for(CatalogKind::Latest, "no_such_job"), FALLBACK_QUERY);
        // signal_snr only exists in the trend catalog
        assert_eq!(query_for(CatalogKind::Latest, "signal_snr"), FALLBACK_QUERY);
    }

    #[test]
    fn test_contains() {
        assert!(contains(CatalogKind::Trend, "operability"));
        assert!(contains(CatalogKind::Latest, "operability"));
        assert!(!contains(CatalogKind::Latest, "signal_snr"));
        assert!(!contains(CatalogKind::Trend, "no_such_job"));
    }

    #[test]
    fn test_server_health_query_binds_address() {
        let sql = server_health_query("192.168.2.60");
        assert!(sql.contains("a.ip = '192.168.2.60'"));
        assert!(sql.contains("INTERVAL 15 MINUTE"));
    }

    #[test]
    fn test_operability_variants_differ() {
        // The trend/latest catalogs carry the inclusive down range; the
        // monthly/daily fixed jobs keep the historical contradictory one.
        assert!(queries::TREND_OPERABILITY.contains(">= 500 OR a.latency_ms < 0"));
        assert!(queries::OPERABILITY_MONTHLY.contains(">= 500 AND a.latency_ms < 0"));
    }
}
