//! Aggregation query text for the refresh catalog.
//!
//! All queries are read-only aggregations over the telemetry schema
//! (`inventory`, `latency`, `signal_quality`, `mesh_traffic`,
//! `sensor_readings`, `gps_position`, `server_health`, `predictions`).
//! Time windows, LIMITs and ordering are part of the dashboard contract and
//! must not be tightened or reordered.

// --- Trend catalog: windowed series for the KPI charts ---

pub(crate) const TREND_LATENCY: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, b.tag AS name, b.role AS subtype, a.latency_ms, b.kind \
FROM inventory b INNER JOIN latency a ON b.ip = a.ip \
WHERE (a.latency_ms > 300 OR a.latency_ms < 0) AND a.recorded_at > NOW() - INTERVAL 1 DAY \
ORDER BY recorded_at DESC \
LIMIT 20";

pub(crate) const TREND_SIGNAL_QUALITY: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.snr, a.link_radio, a.avg_power AS avgpower, a.ip, b.tag AS name, b.kind \
FROM inventory b INNER JOIN signal_quality a ON a.ip = b.ip \
WHERE a.recorded_at > NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC \
LIMIT 23";

pub(crate) const TREND_SIGNAL_SNR: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.snr, a.link_radio, a.avg_power AS avgpower, a.ip, b.tag AS name, b.kind \
FROM inventory b INNER JOIN signal_quality a ON a.ip = b.ip \
WHERE a.recorded_at > NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC \
LIMIT 50";

pub(crate) const TREND_PACKET_FLOW: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, b.tag AS name, b.kind, a.mesh_packets \
FROM inventory b INNER JOIN mesh_traffic a ON a.ip = b.ip \
WHERE a.recorded_at > NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC \
LIMIT 20";

pub(crate) const TREND_SENSOR_TEMP: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, b.tag AS name, b.kind, a.readings \
FROM inventory b INNER JOIN sensor_readings a ON a.ip = b.ip \
WHERE a.recorded_at > NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC \
LIMIT 20";

pub(crate) const TREND_WIRELESS_CONFIG: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, b.tag AS name, b.kind, a.config, a.wireless \
FROM inventory b INNER JOIN mesh_traffic a ON a.ip = b.ip \
WHERE a.recorded_at > NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC \
LIMIT 30";

pub(crate) const TREND_OPERABILITY: &str = "\
SELECT a.ip, c.tag AS name, c.kind, c.role AS subtype, \
SUM(CASE WHEN a.latency_ms >= 0 AND a.latency_ms < 100 THEN 1 ELSE 0 END) AS ok, \
SUM(CASE WHEN a.latency_ms >= 100 AND a.latency_ms < 200 THEN 1 ELSE 0 END) AS alert, \
SUM(CASE WHEN a.latency_ms >= 200 AND a.latency_ms < 500 THEN 1 ELSE 0 END) AS alarm, \
SUM(CASE WHEN a.latency_ms >= 500 OR a.latency_ms < 0 THEN 1 ELSE 0 END) AS down \
FROM latency a INNER JOIN inventory c ON a.ip = c.ip \
WHERE a.recorded_at > NOW() - INTERVAL 30 DAY \
GROUP BY 1,2 \
ORDER BY ok DESC";

pub(crate) const TREND_SNR_LATEST: &str = "\
SELECT DISTINCT(a.ip), MAX(DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00')) AS recorded_at, a.snr, b.tag AS name, b.kind \
FROM inventory b INNER JOIN signal_quality a ON a.ip = b.ip \
WHERE a.recorded_at > NOW() - INTERVAL 1 HOUR \
GROUP BY a.ip";

// --- Latest catalog: most recent sample snapshot for the KPI dashboard ---

pub(crate) const LATEST_LATENCY: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, b.tag AS name, b.kind, b.role AS subtype, a.latency_ms, b.kind \
FROM inventory b INNER JOIN latency a ON b.ip = a.ip \
WHERE a.recorded_at = (SELECT MAX(recorded_at) FROM latency) \
ORDER BY a.latency_ms DESC";

pub(crate) const LATEST_SIGNAL_QUALITY: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.snr, a.link_radio, a.avg_power AS avgpower, a.ip, b.tag AS name, b.kind, b.role AS subtype \
FROM inventory b INNER JOIN signal_quality a ON a.ip = b.ip \
WHERE a.recorded_at = (SELECT MAX(recorded_at) FROM signal_quality) \
ORDER BY a.recorded_at DESC";

pub(crate) const LATEST_SENSOR_TEMP: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, b.tag AS name, b.kind, b.role AS subtype, a.readings \
FROM inventory b INNER JOIN sensor_readings a ON a.ip = b.ip \
WHERE a.recorded_at = (SELECT MAX(c.recorded_at) FROM sensor_readings c) \
GROUP BY 1,2,3,4,5";

pub(crate) const LATEST_OPERABILITY: &str = "\
SELECT a.ip, c.tag AS name, c.kind, c.role AS subtype, \
SUM(CASE WHEN a.latency_ms >= 0 AND a.latency_ms < 100 THEN 1 ELSE 0 END) AS ok, \
SUM(CASE WHEN a.latency_ms >= 100 AND a.latency_ms < 200 THEN 1 ELSE 0 END) AS alert, \
SUM(CASE WHEN a.latency_ms >= 200 AND a.latency_ms < 500 THEN 1 ELSE 0 END) AS alarm, \
SUM(CASE WHEN a.latency_ms >= 500 OR a.latency_ms < 0 THEN 1 ELSE 0 END) AS down \
FROM latency a INNER JOIN inventory c ON a.ip = c.ip \
WHERE a.recorded_at > NOW() - INTERVAL 30 DAY \
GROUP BY 1,2 \
ORDER BY ok DESC";

// --- Fixed jobs ---

pub(crate) const MESH_GPS_RECENT: &str = "\
SELECT a.ip, b.tag AS name, b.kind, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.latitude, a.longitude \
FROM gps_position a INNER JOIN inventory b ON a.ip = b.ip \
WHERE a.recorded_at > NOW() - INTERVAL 15 MINUTE \
ORDER BY a.recorded_at DESC";

pub(crate) const PMP_LOCATIONS: &str = "\
SELECT b.ip, b.tag AS name, b.kind, 0 AS latitude, 0 AS longitude \
FROM inventory b \
WHERE UPPER(b.kind) = 'PMP'";

pub(crate) const TOPOLOGY_STATUS: &str = "\
SELECT a.ip, a.tag AS name, a.vendor, a.kind, a.role AS subtype, \
CASE \
WHEN b.latency_ms >= 0 AND b.latency_ms < 100 AND b.recorded_at >= NOW() - INTERVAL 15 MINUTE THEN 'ok' \
WHEN b.latency_ms >= 100 AND b.latency_ms < 200 AND b.recorded_at >= NOW() - INTERVAL 15 MINUTE THEN 'alert' \
WHEN b.latency_ms >= 200 AND b.latency_ms < 500 AND b.recorded_at >= NOW() - INTERVAL 15 MINUTE THEN 'alarm' \
ELSE 'down' \
END AS status \
FROM latency b INNER JOIN inventory a ON a.ip = b.ip \
GROUP BY 1,2,3,4,5,6";

pub(crate) const PREDICTED_RX: &str = "\
SELECT a.ip, b.tag AS name, b.vendor, b.kind, b.role AS subtype, 'predict' AS status \
FROM predictions a INNER JOIN inventory b ON a.ip = b.ip \
WHERE a.prediction_kind LIKE '%RX%' \
GROUP BY 1,2,3,4,5,6";

pub(crate) const SNR_MAP: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, c.latitude, c.longitude, a.snr_sample AS snr, b.tag AS name, b.kind \
FROM signal_quality a \
INNER JOIN inventory b ON a.ip = b.ip \
INNER JOIN gps_position c ON a.ip = c.ip \
WHERE a.recorded_at >= NOW() - INTERVAL 180 MINUTE AND DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') = DATE_FORMAT(c.recorded_at, '%Y-%m-%d %H:%i:00')";

pub(crate) const MESH_LAST_MINUTE: &str = "\
SELECT a.ip, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.wireless, a.wired, b.tag AS name, b.kind, c.readings \
FROM mesh_traffic a \
INNER JOIN inventory b ON a.ip = b.ip \
INNER JOIN sensor_readings c ON a.ip = c.ip \
WHERE a.recorded_at >= NOW() - INTERVAL 15 MINUTE AND DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') = DATE_FORMAT(c.recorded_at, '%Y-%m-%d %H:%i:00') \
ORDER BY a.recorded_at DESC, a.ip DESC";

pub(crate) const WIRELESS_DAY: &str = "\
SELECT a.ip, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.wireless, b.tag AS name, b.kind \
FROM mesh_traffic a INNER JOIN inventory b ON a.ip = b.ip \
WHERE a.recorded_at >= NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC, a.ip DESC";

pub(crate) const WIRED_DAY: &str = "\
SELECT a.ip, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.wired, b.tag AS name, b.kind \
FROM mesh_traffic a INNER JOIN inventory b ON a.ip = b.ip \
WHERE a.recorded_at >= NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC, a.ip DESC";

pub(crate) const SENSOR_HISTORY: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.ip, a.readings \
FROM sensor_readings a \
WHERE a.recorded_at >= NOW() - INTERVAL 360 MINUTE \
ORDER BY a.recorded_at DESC";

pub(crate) const COST_WIRED_DAY: &str = "\
SELECT a.ip, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.wired, b.tag AS name, b.kind \
FROM mesh_traffic a INNER JOIN inventory b ON a.ip = b.ip \
WHERE a.recorded_at >= NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC, a.ip DESC";

pub(crate) const COST_WIRELESS_DAY: &str = "\
SELECT a.ip, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.wireless, b.tag AS name, b.kind \
FROM mesh_traffic a INNER JOIN inventory b ON a.ip = b.ip \
WHERE a.recorded_at >= NOW() - INTERVAL 1 DAY \
ORDER BY a.recorded_at DESC, a.ip DESC";

// Both peer-cost jobs read the wireless column; the wired variant has never
// carried wired figures and the dashboards compensate downstream.
pub(crate) const COST_WIRED_PEERS: &str = "\
SELECT a.ip, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.wireless, b.tag AS name, b.kind, a.config \
FROM mesh_traffic a INNER JOIN inventory b ON a.ip = b.ip \
WHERE a.recorded_at >= NOW() - INTERVAL 15 MINUTE \
ORDER BY a.recorded_at DESC, a.ip DESC";

pub(crate) const COST_WIRELESS_PEERS: &str = "\
SELECT a.ip, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, a.wireless, b.tag AS name, b.kind, a.config \
FROM mesh_traffic a INNER JOIN inventory b ON a.ip = b.ip \
WHERE a.recorded_at >= NOW() - INTERVAL 15 MINUTE \
ORDER BY a.recorded_at DESC, a.ip DESC";

// The `recorded_at = null` comparison never matches, so each subquery yields
// 1 while fresh rows exist and NULL otherwise; the dashboards key off that.
pub(crate) const DATABASE_STATUS: &str = "\
SELECT \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM signal_quality WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS signal_quality, \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM events WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS events, \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM latency WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS latency, \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM lte_metrics WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS lte_metrics, \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM predictions WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS predictions, \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM mesh_traffic WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS mesh_traffic, \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM sensor_readings WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS sensor_readings, \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM server_health WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS server_health, \
(SELECT CASE WHEN recorded_at = null THEN 0 ELSE 1 END AS fresh FROM gps_position WHERE recorded_at >= NOW() - INTERVAL 15 MINUTE ORDER BY recorded_at DESC LIMIT 1) AS gps_position \
FROM inventory LIMIT 1";

// TODO: the 'down' bucket below (>= 500 AND < 0) is contradictory and always
// counts zero; confirm the intended OR range against the stored dashboard
// history before changing it, since the monthly series would jump.
pub(crate) const OPERABILITY_MONTHLY: &str = "\
SELECT DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS recorded_at, c.role AS subtype, \
SUM(CASE WHEN a.latency_ms >= 0 AND a.latency_ms < 100 THEN 1 ELSE 0 END) AS ok, \
SUM(CASE WHEN a.latency_ms >= 100 AND a.latency_ms < 200 THEN 1 ELSE 0 END) AS alert, \
SUM(CASE WHEN a.latency_ms >= 200 AND a.latency_ms < 500 THEN 1 ELSE 0 END) AS alarm, \
SUM(CASE WHEN a.latency_ms >= 500 AND a.latency_ms < 0 THEN 1 ELSE 0 END) AS down \
FROM latency a INNER JOIN inventory c ON a.ip = c.ip \
WHERE a.recorded_at > NOW() - INTERVAL 30 DAY \
GROUP BY 1,2 \
ORDER BY a.recorded_at DESC";

pub(crate) const OPERABILITY_DAILY: &str = "\
SELECT a.ip, \
SUM(CASE WHEN a.latency_ms >= 0 AND a.latency_ms < 100 THEN 1 ELSE 0 END) AS ok, \
SUM(CASE WHEN a.latency_ms >= 100 AND a.latency_ms < 200 THEN 1 ELSE 0 END) AS alert, \
SUM(CASE WHEN a.latency_ms >= 200 AND a.latency_ms < 500 THEN 1 ELSE 0 END) AS alarm, \
SUM(CASE WHEN a.latency_ms >= 500 AND a.latency_ms < 0 THEN 1 ELSE 0 END) AS down \
FROM latency a INNER JOIN inventory c ON a.ip = c.ip \
WHERE (a.recorded_at >= NOW() - INTERVAL 1 DAY) \
GROUP BY 1 \
ORDER BY a.recorded_at DESC";

pub(crate) const MESH_ADDRESSES: &str = "SELECT DISTINCT ip FROM mesh_traffic";

pub(crate) const HAUL_TRUCKS_ACTIVE: &str = "\
SELECT DISTINCT a.ip, b.tag AS name \
FROM mesh_traffic a INNER JOIN inventory b ON a.ip = b.ip \
WHERE b.kind = 'Haultruck' AND a.recorded_at >= NOW() - INTERVAL 12 HOUR \
ORDER BY b.tag ASC";

pub(crate) const HAUL_TRUCK_LAST_SEEN: &str = "\
SELECT b.tag AS name, a.ip, DATE_FORMAT(a.recorded_at, '%Y-%m-%d %H:%i:00') AS connection \
FROM latency a INNER JOIN inventory b ON a.ip = b.ip \
WHERE b.kind = 'Haultruck' AND a.recorded_at >= NOW() - INTERVAL 1 DAY \
GROUP BY 1,2,3 \
ORDER BY 1 ASC, 3 ASC";

pub(crate) const HAUL_TRUCK_DOWNTIME: &str = "\
SELECT b.tag AS name, a.ip, \
SUM(CASE WHEN a.latency_ms >= 500 AND a.latency_ms < 0 THEN 1 ELSE 0 END) AS down \
FROM latency a INNER JOIN inventory b ON a.ip = b.ip \
WHERE b.kind = 'Haultruck' AND a.recorded_at >= NOW() - INTERVAL 1 DAY \
GROUP BY 1,2 \
ORDER BY 1 ASC";
