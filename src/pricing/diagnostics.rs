//! Structured pricing diagnostics.
//!
//! The engine reports pricing failures through a [`DiagnosticSink`] instead of
//! writing anywhere itself. The service logs them with `tracing` and keeps
//! the most recent ones in memory for the diagnostics endpoint.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};

/// Service name attached to every diagnostic emitted by the engine.
pub const PRICING_SERVICE: &str = "trailer_calculator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Expected gap in catalog data
    Warning,
    /// Missing item or corrupt data
    Error,
}

/// One pricing failure report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingDiagnostic {
    pub service: String,
    pub error_type: String,
    pub severity: Severity,
    pub message: String,
    pub details: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl PricingDiagnostic {
    pub fn new(
        error_type: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            service: PRICING_SERVICE.to_string(),
            error_type: error_type.into(),
            severity,
            message: message.into(),
            details,
            recorded_at: Utc::now(),
        }
    }
}

/// Destination for pricing diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn record_pricing_diagnostic(&self, diagnostic: &PricingDiagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &T {
    fn record_pricing_diagnostic(&self, diagnostic: &PricingDiagnostic) {
        (**self).record_pricing_diagnostic(diagnostic)
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn record_pricing_diagnostic(&self, diagnostic: &PricingDiagnostic) {
        (**self).record_pricing_diagnostic(diagnostic)
    }
}

/// Fan out to both sinks
impl<A: DiagnosticSink, B: DiagnosticSink> DiagnosticSink for (A, B) {
    fn record_pricing_diagnostic(&self, diagnostic: &PricingDiagnostic) {
        self.0.record_pricing_diagnostic(diagnostic);
        self.1.record_pricing_diagnostic(diagnostic);
    }
}

/// Writes diagnostics as structured log events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn record_pricing_diagnostic(&self, diagnostic: &PricingDiagnostic) {
        match diagnostic.severity {
            Severity::Warning => warn!(
                service = %diagnostic.service,
                error_type = %diagnostic.error_type,
                details = %diagnostic.details,
                "{}",
                diagnostic.message
            ),
            Severity::Error => error!(
                service = %diagnostic.service,
                error_type = %diagnostic.error_type,
                details = %diagnostic.details,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Keeps the most recent diagnostics in memory
#[derive(Debug)]
pub struct MemoryDiagnosticSink {
    capacity: usize,
    entries: Mutex<VecDeque<PricingDiagnostic>>,
}

impl MemoryDiagnosticSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<PricingDiagnostic>> {
        // A panic while holding the lock cannot leave the deque inconsistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Oldest first
    pub fn entries(&self) -> Vec<PricingDiagnostic> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for MemoryDiagnosticSink {
    fn default() -> Self {
        Self::new(100)
    }
}

impl DiagnosticSink for MemoryDiagnosticSink {
    fn record_pricing_diagnostic(&self, diagnostic: &PricingDiagnostic) {
        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(diagnostic.clone());
    }
}
