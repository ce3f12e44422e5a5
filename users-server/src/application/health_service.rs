//! Liveness, readiness and the full diagnostic report behind `/api/health`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::data::store_probe::StoreProbe;
use crate::domain::error::DomainError;
use crate::infrastructure::config::RuntimeMode;

/// Upper bound on one store ping, well below the pool's acquire timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Down,
}

impl ProbeStatus {
    pub fn is_up(self) -> bool {
        self == ProbeStatus::Up
    }
}

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub status: ProbeStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub status: ProbeStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReadinessReport {
    pub status: ProbeStatus,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseCheck,
}

#[derive(Debug, Serialize)]
pub struct MemoryUsage {
    pub resident: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: ProbeStatus,
    pub environment: RuntimeMode,
    pub timestamp: DateTime<Utc>,
    pub uptime: String,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryUsage>,
    pub database: DatabaseCheck,
}

#[derive(Clone)]
pub struct HealthService {
    probe: Arc<dyn StoreProbe>,
    mode: RuntimeMode,
    started: Instant,
}

impl HealthService {
    pub fn new(probe: Arc<dyn StoreProbe>, mode: RuntimeMode) -> Self {
        Self {
            probe,
            mode,
            started: Instant::now(),
        }
    }

    /// Answers as long as the process can serve a request at all.
    pub fn liveness(&self) -> ProbeReport {
        ProbeReport {
            status: ProbeStatus::Up,
            timestamp: Utc::now(),
        }
    }

    pub async fn readiness(&self) -> ReadinessReport {
        let database = self.check_database().await;
        ReadinessReport {
            status: database.status,
            timestamp: Utc::now(),
            database,
        }
    }

    pub async fn report(&self) -> HealthReport {
        let database = self.check_database().await;
        let uptime = self.started.elapsed();
        HealthReport {
            status: database.status,
            environment: self.mode,
            timestamp: Utc::now(),
            uptime: format_uptime(uptime),
            uptime_seconds: uptime.as_secs(),
            memory: memory_usage(),
            database,
        }
    }

    async fn check_database(&self) -> DatabaseCheck {
        let start = Instant::now();
        let outcome = tokio::time::timeout(PROBE_TIMEOUT, self.probe.ping())
            .await
            .unwrap_or_else(|_| {
                Err(DomainError::storage(format!(
                    "no answer within {}s",
                    PROBE_TIMEOUT.as_secs()
                )))
            });
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(()) => DatabaseCheck {
                status: ProbeStatus::Up,
                latency_ms,
                error: None,
            },
            Err(err) => {
                warn!(error = %err, "database health check failed");
                DatabaseCheck {
                    status: ProbeStatus::Down,
                    latency_ms,
                    error: self.mode.exposes_details().then(|| err.to_string()),
                }
            }
        }
    }
}

fn memory_usage() -> Option<MemoryUsage> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let resident = status_kib(&status, "VmRSS")?;
    Some(MemoryUsage {
        resident: format_bytes(resident * 1024),
        peak: status_kib(&status, "VmHWM").map(|kib| format_bytes(kib * 1024)),
    })
}

/// Reads a `Key:   1234 kB` line from `/proc/<pid>/status`.
fn status_kib(status: &str, key: &str) -> Option<u64> {
    status.lines().find_map(|line| {
        let rest = line.strip_prefix(key)?.strip_prefix(':')?;
        rest.split_whitespace().next()?.parse().ok()
    })
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        (total % 86_400) / 3_600,
        (total % 3_600) / 60,
        total % 60,
    );

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));
    parts.join(" ")
}
