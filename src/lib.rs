pub mod catalog;
pub mod certificate;
pub mod client;
pub mod controller;
pub mod logbook;
pub mod verification;

// Re-export the main orchestration types for convenience
pub use certificate::{Certificate, CertificateBuilder, CertificateExport};
pub use client::{EraseReceipt, EraseService, HttpEraseClient};
pub use controller::{
    OperationController, OperationOutcome, OperationPhase, OperationState, WipeConsole,
};
pub use logbook::{LogBook, LogEntry, DELETED_FILE_TAG};
pub use verification::{CheckItem, CheckStatus, Checklist, Pacing};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Install the global tracing subscriber for the console's diagnostic channel.
///
/// Filter level comes from `RUST_LOG`. Safe to call more than once; only the
/// first call wins.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

// Error taxonomy for the orchestration core. Validation and concurrency
// violations are recovered locally (one log line, no transition); network
// failures settle the operation; clipboard failures only reach the
// diagnostic channel.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("No device selected for wipe operation")]
    NoDeviceSelected,

    #[error("Wipe already in progress on {0}")]
    OperationInProgress(String),

    #[error("Erase service request failed: {0}")]
    Network(String),

    #[error("Malformed response from erase service: {0}")]
    MalformedResponse(String),

    #[error("Clipboard copy failed: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConsoleError::MalformedResponse(err.to_string())
        } else {
            ConsoleError::Network(err.to_string())
        }
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Which wipe flow the operator requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WipeKind {
    Demo,
    Full,
}

impl WipeKind {
    /// Short name used in default log messages ("demo wipe completed ...").
    pub fn as_str(&self) -> &'static str {
        match self {
            WipeKind::Demo => "demo",
            WipeKind::Full => "full",
        }
    }

    /// Path segment of the erase endpoint for this kind.
    pub fn route(&self) -> &'static str {
        match self {
            WipeKind::Demo => "safe",
            WipeKind::Full => "full",
        }
    }

    /// Operator-facing label used in the operation-start log line.
    pub fn display_label(&self) -> &'static str {
        match self {
            WipeKind::Demo => "Safe",
            WipeKind::Full => "Full Destructive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Drive,
    Mobile,
    Removable,
    Host,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Ready,
    Warning,
    Error,
}

/// A candidate device supplied by the device catalog. The core only reads
/// these; enumeration and refresh live behind the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub category: DeviceCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Tuning knobs for the bounded progress simulation.
///
/// The cap keeps the simulator from signalling completion before the real
/// erase result arrives; only reconciliation may push progress to 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationConfig {
    /// Progress added per simulator tick.
    pub progress_step: u8,
    /// Period between simulator ticks.
    pub tick_period: Duration,
    /// Ceiling for simulated progress until the erase call resolves.
    pub progress_cap: u8,
    /// Delay between settlement and the return to idle.
    pub cooldown: Duration,
}

impl Default for OperationConfig {
    fn default() -> Self {
        Self {
            progress_step: 10,
            tick_period: Duration::from_millis(300),
            progress_cap: 90,
            cooldown: Duration::from_millis(1000),
        }
    }
}

impl OperationConfig {
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_progress_step(mut self, step: u8) -> Self {
        self.progress_step = step;
        self
    }
}

#[cfg(test)]
mod lib_tests;
