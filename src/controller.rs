//! Operation lifecycle controller.
//!
//! Owns the single [`OperationState`] for the process and drives one wipe
//! operation at a time: validate the request, kick off the real erase call,
//! run the bounded progress simulator beside it, then reconcile whichever
//! result the network produced. All state transitions go through the
//! reducer-style methods on [`OperationController`]; the async plumbing in
//! [`WipeConsole`] only decides *when* to call them.
//!
//! Lifecycle, explicitly:
//!
//! ```text
//! idle --start(valid device)--> running
//! running --external success--> settling --cooldown--> idle
//! running --external failure--> settling --cooldown--> idle
//! idle --start(no device)--> idle        (logged, no transition)
//! running --start(any)--> running        (rejected, logged, no transition)
//! ```

use crate::certificate::{Certificate, CertificateBuilder};
use crate::client::{EraseReceipt, EraseService};
use crate::logbook::{LogBook, DELETED_FILE_TAG};
use crate::verification::Checklist;
use crate::{ConsoleError, ConsoleResult, Device, OperationConfig, WipeKind};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationPhase {
    Idle,
    Running,
    Settling,
}

/// The one operation-state value for the process. Threaded explicitly
/// through the controller; never an ambient global.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationState {
    pub phase: OperationPhase,
    pub kind: WipeKind,
    pub target_device_id: String,
    pub simulated_progress: u8,
}

impl Default for OperationState {
    fn default() -> Self {
        Self {
            phase: OperationPhase::Idle,
            kind: WipeKind::Demo,
            target_device_id: String::new(),
            simulated_progress: 0,
        }
    }
}

/// Repeating simulator timer, one per operation. Dropping it is the only
/// cancellation path, which keeps cancel-before-settlement trivial to
/// enforce in [`WipeConsole::run_wipe`].
pub struct ProgressTimer {
    interval: tokio::time::Interval,
}

impl ProgressTimer {
    pub fn start(period: Duration) -> Self {
        let first = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(first, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// How the most recent operation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationOutcome {
    Completed,
    Failed,
}

/// State machine for a single wipe operation.
pub struct OperationController {
    state: OperationState,
    checklist: Checklist,
    logbook: LogBook,
    config: OperationConfig,
    last_outcome: Option<OperationOutcome>,
}

impl Default for OperationController {
    fn default() -> Self {
        Self::new(OperationConfig::default())
    }
}

impl OperationController {
    pub fn new(config: OperationConfig) -> Self {
        Self {
            state: OperationState::default(),
            checklist: Checklist::standard(),
            logbook: LogBook::new(),
            config,
            last_outcome: None,
        }
    }

    /// How the previous operation settled, if any has settled yet.
    pub fn last_outcome(&self) -> Option<OperationOutcome> {
        self.last_outcome
    }

    pub fn state(&self) -> &OperationState {
        &self.state
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn logbook(&self) -> &LogBook {
        &self.logbook
    }

    pub fn config(&self) -> &OperationConfig {
        &self.config
    }

    /// Operator-visible log line from outside the lifecycle (presentation
    /// glue shares the same audit trail).
    pub fn log(&mut self, text: impl Into<String>) {
        self.logbook.append(text);
    }

    /// Begin an operation. A rejected request appends exactly one
    /// explanatory log entry and leaves all state untouched.
    pub fn start(&mut self, kind: WipeKind, device_id: &str) -> ConsoleResult<()> {
        if device_id.is_empty() {
            let error = ConsoleError::NoDeviceSelected;
            self.logbook.append(error.to_string());
            return Err(error);
        }
        if self.state.phase != OperationPhase::Idle {
            let error = ConsoleError::OperationInProgress(self.state.target_device_id.clone());
            self.logbook.append(error.to_string());
            return Err(error);
        }

        self.state = OperationState {
            phase: OperationPhase::Running,
            kind,
            target_device_id: device_id.to_string(),
            simulated_progress: 0,
        };
        self.last_outcome = None;
        self.checklist.begin();
        self.logbook.append(format!(
            "Starting {} wipe on {}",
            kind.display_label(),
            device_id
        ));
        tracing::info!(kind = kind.as_str(), device = device_id, "wipe operation started");
        Ok(())
    }

    /// One simulator tick: advance the shared progress by the configured
    /// step, capped below 100 so the simulator can never fake completion,
    /// and pace the checklist against the new value.
    pub fn tick(&mut self) {
        if self.state.phase != OperationPhase::Running {
            return;
        }
        let next = self
            .state
            .simulated_progress
            .saturating_add(self.config.progress_step)
            .min(self.config.progress_cap);
        self.state.simulated_progress = next;
        self.checklist.advance(next);
    }

    /// Reconcile a confirmed external success: snap progress to 100, force
    /// the whole checklist passed, log the completion message and any
    /// file-deletion notices, and settle.
    pub fn settle_success(&mut self, receipt: &EraseReceipt) {
        if self.state.phase != OperationPhase::Running {
            return;
        }
        self.state.simulated_progress = 100;
        self.checklist.force_pass_all();

        let message = receipt.message.clone().unwrap_or_else(|| {
            format!("{} wipe completed successfully", self.state.kind.as_str())
        });
        self.logbook.append(message);
        for file in &receipt.deleted_files {
            self.logbook.append_tagged(DELETED_FILE_TAG, file);
        }

        self.last_outcome = Some(OperationOutcome::Completed);
        self.state.phase = OperationPhase::Settling;
    }

    /// Reconcile an external failure. Terminal for this invocation; no
    /// retry is attempted.
    pub fn settle_failure(&mut self, error: &ConsoleError) {
        if self.state.phase != OperationPhase::Running {
            return;
        }
        tracing::warn!(error = %error, device = %self.state.target_device_id, "erase request failed");
        self.logbook
            .append(format!("Error during {} wipe", self.state.kind.as_str()));
        self.last_outcome = Some(OperationOutcome::Failed);
        self.state.phase = OperationPhase::Settling;
    }

    /// Cool-down elapsed: back to idle. A failed operation also resets the
    /// simulated progress; a completed one keeps it at 100 for display.
    pub fn finish_cooldown(&mut self) {
        if self.state.phase != OperationPhase::Settling {
            return;
        }
        self.state.phase = OperationPhase::Idle;
        if self.last_outcome == Some(OperationOutcome::Failed) {
            self.state.simulated_progress = 0;
        }
    }
}

/// Shared handle over the controller, cloned by every callback site.
///
/// Tokio gives us interleaved callbacks rather than parallel mutation, but
/// each handler still locks for the duration of one event so the
/// reject-concurrent-start guard holds even if a second task races a
/// `run_wipe` call.
#[derive(Clone)]
pub struct WipeConsole {
    controller: Arc<Mutex<OperationController>>,
}

impl Default for WipeConsole {
    fn default() -> Self {
        Self::new(OperationConfig::default())
    }
}

impl WipeConsole {
    pub fn new(config: OperationConfig) -> Self {
        Self::with_controller(OperationController::new(config))
    }

    pub fn with_controller(controller: OperationController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    fn guard(&self) -> MutexGuard<'_, OperationController> {
        self.controller.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> OperationState {
        self.guard().state().clone()
    }

    pub fn checklist(&self) -> Checklist {
        self.guard().checklist().clone()
    }

    pub fn logbook(&self) -> LogBook {
        self.guard().logbook().clone()
    }

    pub fn last_outcome(&self) -> Option<OperationOutcome> {
        self.guard().last_outcome()
    }

    pub fn log(&self, text: impl Into<String>) {
        self.guard().log(text);
    }

    /// Run one complete wipe operation: start, simulate progress alongside
    /// the erase call, reconcile, cool down, return to idle.
    ///
    /// A rejected start surfaces as the error (already logged); a network
    /// failure settles the operation and still resolves `Ok(())` because
    /// the lifecycle recovered.
    pub async fn run_wipe(
        &self,
        service: &dyn EraseService,
        kind: WipeKind,
        device_id: &str,
    ) -> ConsoleResult<()> {
        let (tick_period, cooldown) = {
            let mut controller = self.guard();
            controller.start(kind, device_id)?;
            (controller.config().tick_period, controller.config().cooldown)
        };

        let mut timer = ProgressTimer::start(tick_period);
        let mut erase = service.erase(kind, device_id);

        let outcome = loop {
            tokio::select! {
                _ = timer.tick() => self.guard().tick(),
                outcome = &mut erase => break outcome,
            }
        };

        // The timer must be gone before settlement touches the checklist:
        // the simulator and the network result never both mutate it after
        // this point.
        drop(timer);

        match outcome {
            Ok(receipt) => self.guard().settle_success(&receipt),
            Err(error) => self.guard().settle_failure(&error),
        }

        tokio::time::sleep(cooldown).await;
        self.guard().finish_cooldown();
        Ok(())
    }

    /// Snapshot the current verification and log state into a certificate.
    pub fn build_certificate(
        &self,
        builder: &CertificateBuilder,
        devices: &[Device],
    ) -> anyhow::Result<Certificate> {
        let controller = self.guard();
        let target = &controller.state().target_device_id;
        let target = (!target.is_empty()).then_some(target.as_str());
        builder.build(devices, controller.checklist(), controller.logbook(), target)
    }
}
