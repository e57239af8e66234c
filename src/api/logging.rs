//! Structured logging with correlation tracking for metadata refreshes
//!
//! Each refresh gets a correlation id so the start, fetch and completion
//! lines of one refresh can be grepped together out of the log file.

use crate::error::MetadataError;
use crate::metadata::{Fingerprint, ODataVersion};
use log::{error, info, warn};
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Monitoring configuration for refresh logging
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    pub request_logging: bool,
    pub performance_metrics: bool,
    /// Refreshes slower than this log a warning
    pub slow_threshold: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            request_logging: true,
            performance_metrics: true,
            slow_threshold: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RefreshLogger {
    config: MonitoringConfig,
}

/// One refresh in flight
#[derive(Debug, Clone)]
pub struct RefreshContext {
    pub correlation_id: String,
    /// `fetch`, `rederive` or `noop`
    pub action: String,
    /// Metadata URL or other identification of the service
    pub target: Option<String>,
    pub start_time: Instant,
}

impl RefreshContext {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl RefreshLogger {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    pub fn start_refresh(&self, action: &str, target: Option<&str>) -> RefreshContext {
        self.start_refresh_with_id(action, target, &Uuid::new_v4().to_string())
    }

    pub fn start_refresh_with_id(
        &self,
        action: &str,
        target: Option<&str>,
        correlation_id: &str,
    ) -> RefreshContext {
        let context = RefreshContext {
            correlation_id: correlation_id.to_string(),
            action: action.to_string(),
            target: target.map(str::to_string),
            start_time: Instant::now(),
        };

        if self.config.request_logging {
            let log_data = json!({
                "event": "refresh_started",
                "correlation_id": context.correlation_id,
                "action": context.action,
                "url": context.target,
                "timestamp": chrono::Utc::now().to_rfc3339()
            });
            info!("Metadata Refresh Started: {}", log_data);
        }

        context
    }

    pub fn completion_record(
        &self,
        context: &RefreshContext,
        version: Option<ODataVersion>,
        fingerprint: Option<&Fingerprint>,
        changed: bool,
    ) -> Value {
        json!({
            "event": "refresh_completed",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "url": context.target,
            "duration_ms": context.elapsed().as_millis(),
            "version": version.map(|v| v.as_str()),
            "fingerprint": fingerprint.map(|f| f.to_hex()),
            "changed": changed,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })
    }

    pub fn failure_record(&self, context: &RefreshContext, err: &MetadataError) -> Value {
        json!({
            "event": "refresh_failed",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "url": context.target,
            "duration_ms": context.elapsed().as_millis(),
            "error_kind": err.kind(),
            "status_code": err.status(),
            "error_message": err.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })
    }

    pub fn complete_refresh(
        &self,
        context: &RefreshContext,
        version: Option<ODataVersion>,
        fingerprint: Option<&Fingerprint>,
        changed: bool,
    ) {
        if self.config.performance_metrics {
            let log_data = self.completion_record(context, version, fingerprint, changed);
            info!("Metadata Refresh Completed: {}", log_data);
        }
        self.log_performance_warning(context);
    }

    pub fn fail_refresh(&self, context: &RefreshContext, err: &MetadataError) {
        let log_data = self.failure_record(context, err);
        error!("Metadata Refresh Failed: {}", log_data);
        self.log_performance_warning(context);
    }

    pub fn is_slow(&self, duration: Duration) -> bool {
        duration > self.config.slow_threshold
    }

    fn log_performance_warning(&self, context: &RefreshContext) {
        let duration = context.elapsed();
        if !self.config.performance_metrics || !self.is_slow(duration) {
            return;
        }

        let log_data = json!({
            "event": "slow_refresh",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "url": context.target,
            "duration_ms": duration.as_millis(),
            "threshold_ms": self.config.slow_threshold.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        warn!("Slow Metadata Refresh Detected: {}", log_data);
    }
}
