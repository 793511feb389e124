use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use parking_lot::Mutex;

/// Per-channel write metrics
#[derive(Debug)]
pub struct MetricsCollector {
    /// Number of events written
    entries_written: AtomicUsize,
    /// Number of failed writes
    failures: AtomicUsize,
    /// Total bytes written
    bytes_written: AtomicUsize,
    /// Number of chunk files or documents created
    files_created: AtomicUsize,
    /// Total write duration in nanoseconds
    write_duration_ns: AtomicU64,
    /// Message of the most recent failure
    last_error: Mutex<Option<String>>,
    /// Start time of the metrics collector
    start_time: Instant,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            entries_written: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            bytes_written: AtomicUsize::new(0),
            files_created: AtomicUsize::new(0),
            write_duration_ns: AtomicU64::new(0),
            last_error: Mutex::new(None),
            start_time: Instant::now(),
        }
    }

    /// Record a successful write
    pub fn record_write(&self, bytes: usize, duration: Duration) {
        self.entries_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.write_duration_ns.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Record a failed write
    pub fn record_failure(&self, error: &impl fmt::Display) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        *self.last_error.lock() = Some(error.to_string());
    }

    /// Record a newly created chunk file or document
    pub fn increment_files_created(&self) {
        self.files_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            entries_written: self.entries_written.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            files_created: self.files_created.load(Ordering::Relaxed),
            write_duration: Duration::from_nanos(self.write_duration_ns.load(Ordering::Relaxed)),
            last_error: self.last_error.lock().clone(),
            uptime: self.start_time.elapsed(),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.entries_written.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.files_created.store(0, Ordering::Relaxed);
        self.write_duration_ns.store(0, Ordering::Relaxed);
        *self.last_error.lock() = None;
    }
}

/// Point-in-time copy of a channel's metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    /// Number of events written
    pub entries_written: usize,
    /// Number of failed writes
    pub failures: usize,
    /// Total bytes written
    pub bytes_written: usize,
    /// Number of chunk files or documents created
    pub files_created: usize,
    /// Total time spent writing
    pub write_duration: Duration,
    /// Message of the most recent failure
    pub last_error: Option<String>,
    /// Time since the collector was created
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Average duration of a successful write
    pub fn avg_write_duration(&self) -> Duration {
        if self.entries_written == 0 {
            return Duration::ZERO;
        }
        self.write_duration.div_f64(self.entries_written as f64)
    }

    /// Generate a human-readable report
    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Channel Metrics ===\n\n");
        report.push_str(&format!("Uptime: {:.2} seconds\n", self.uptime.as_secs_f64()));
        report.push_str(&format!("Entries written: {}\n", self.entries_written));
        report.push_str(&format!("Failures: {}\n", self.failures));
        report.push_str(&format!("Bytes written: {}\n", self.bytes_written));
        report.push_str(&format!("Files created: {}\n", self.files_created));
        report.push_str(&format!(
            "Avg write time: {:.2} ms\n",
            self.avg_write_duration().as_secs_f64() * 1000.0
        ));
        if let Some(ref error) = self.last_error {
            report.push_str(&format!("Last error: {}\n", error));
        }

        report
    }
}
