//! Logging, timing and metrics for riskmap tools
//!
//! - Structured logging with tracing (compact text or JSON lines)
//! - Optional non-blocking log file output
//! - A per-process session id for correlating log lines
//! - Timers and counters collected into a process-wide registry

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Logging setup for one process
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// JSON lines instead of compact text
    pub json: bool,
    /// Write to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            log_file: None,
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. When logging to a
/// file, keep the returned guard alive until exit so buffered lines reach it.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", config.log_level, e))?,
    };

    let (writer, guard) = match &config.log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;
            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
            (fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        None => (fmt::writer::BoxMakeWriter::new(std::io::stderr), None),
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_ansi(config.log_file.is_none());

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer.compact()).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(guard)
}

/// Identifier shared by every log line of this process
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Process-wide registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Named counters and operation timings
pub struct MetricsRegistry {
    counters: Mutex<BTreeMap<String, u64>>,
    timings: Mutex<BTreeMap<String, TimingSummary>>,
    started: Instant,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: Mutex::new(BTreeMap::new()),
            timings: Mutex::new(BTreeMap::new()),
            started: Instant::now(),
        }
    }

    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    pub fn increment_by(&self, name: &str, value: u64) {
        *lock(&self.counters).entry(name.to_string()).or_insert(0) += value;
    }

    /// Current value, zero for a counter never incremented
    pub fn counter(&self, name: &str) -> u64 {
        lock(&self.counters).get(name).copied().unwrap_or(0)
    }

    pub fn record_duration(&self, name: &str, duration: Duration) {
        lock(&self.timings)
            .entry(name.to_string())
            .or_default()
            .add(duration.as_secs_f64() * 1000.0);
    }

    /// Copy of everything collected so far
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            session_id: session_id().to_string(),
            uptime: self.started.elapsed(),
            counters: lock(&self.counters).clone(),
            timings: lock(&self.timings).clone(),
        }
    }
}

/// Aggregate of every recorded duration for one operation, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimingSummary {
    pub count: u64,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl TimingSummary {
    fn add(&mut self, ms: f64) {
        self.count += 1;
        self.total_ms += ms;
        self.max_ms = self.max_ms.max(ms);
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn mean_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

/// Point-in-time view of the registry
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub session_id: String,
    pub uptime: Duration,
    pub counters: BTreeMap<String, u64>,
    pub timings: BTreeMap<String, TimingSummary>,
}

/// Measures one operation; records on `stop` or when dropped
pub struct Timer {
    name: String,
    start: Instant,
    finished: bool,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            finished: false,
        }
    }

    pub fn stop(mut self) -> Duration {
        self.finish()
    }

    fn finish(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        self.finished = true;
        metrics().record_duration(&self.name, elapsed);
        tracing::debug!(operation = %self.name, elapsed_ms = elapsed.as_millis(), "Timed operation finished");
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.finished {
            self.finish();
        }
    }
}

/// A notable domain occurrence, counted and logged at info level
#[derive(Debug, Serialize)]
pub struct Event {
    pub kind: String,
    pub at: DateTime<Utc>,
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            at: Utc::now(),
            data,
        }
    }

    pub fn log(&self) {
        metrics().increment(&format!("event.{}", self.kind));
        tracing::info!(session_id = %session_id(), kind = %self.kind, data = %self.data, "Event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let registry = MetricsRegistry::new();
        registry.increment("resolutions");
        registry.increment("resolutions");
        registry.increment_by("resolutions", 38);

        assert_eq!(registry.counter("resolutions"), 40);
        assert_eq!(registry.counter("never_touched"), 0);
    }

    #[test]
    fn test_timing_summary() {
        let registry = MetricsRegistry::new();
        for secs in [4, 1, 7] {
            registry.record_duration("resolve.batch", Duration::from_secs(secs));
        }

        let snapshot = registry.snapshot();
        let timing = snapshot.timings["resolve.batch"];
        assert_eq!(timing.count, 3);
        assert_eq!(timing.max_ms, 7000.0);
        assert_eq!(timing.mean_ms(), 4000.0);
        assert_eq!(TimingSummary::default().mean_ms(), 0.0);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let registry = MetricsRegistry::new();
        registry.increment("dataset.loads");
        let before = registry.snapshot();
        registry.increment("dataset.loads");

        assert_eq!(before.counters["dataset.loads"], 1);
        assert_eq!(registry.snapshot().counters["dataset.loads"], 2);
        assert_eq!(before.session_id, session_id());
    }

    #[test]
    fn test_timer_stop_and_drop_record_once_each() {
        let name = "test_timer_stop_and_drop";
        let elapsed = {
            let timer = Timer::start(name);
            std::thread::sleep(Duration::from_millis(5));
            timer.stop()
        };
        assert!(elapsed >= Duration::from_millis(5));
        drop(Timer::start(name));

        assert_eq!(metrics().snapshot().timings[name].count, 2);
    }

    #[test]
    fn test_event_counts() {
        Event::new("test_event_counts", serde_json::json!({"center_id": 1})).log();
        assert_eq!(metrics().counter("event.test_event_counts"), 1);
    }

    #[test]
    fn test_init_writes_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("riskmap.log");

        let guard = init_with_config(TelemetryConfig {
            log_level: "info".to_string(),
            log_file: Some(path.clone()),
            ..TelemetryConfig::default()
        })
        .unwrap();
        assert!(guard.is_some());

        tracing::error!(shop_id = 1, "Resolved nearest center");
        drop(guard);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Resolved nearest center"));
    }

    #[test]
    fn test_session_id_is_uuid() {
        assert!(Uuid::parse_str(session_id()).is_ok());
    }
}
