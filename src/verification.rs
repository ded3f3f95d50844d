//! Post-hoc verification checklist driven by the simulated progress value.
//!
//! Four fixed checklist items advance through a staggered pipeline: shallow
//! checks resolve at lower progress thresholds than deep ones. Each item
//! carries its own [`Pacing`] policy so the thresholds can be tuned without
//! touching the control flow. Only the operation controller may force the
//! checklist to completion, and only on a confirmed external success.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pending,
    Running,
    Passed,
    Failed,
}

impl CheckStatus {
    /// Uppercase token used in certificate summaries.
    pub fn summary_token(&self) -> &'static str {
        match self {
            CheckStatus::Pending => "PENDING",
            CheckStatus::Running => "RUNNING",
            CheckStatus::Passed => "PASSED",
            CheckStatus::Failed => "FAILED",
        }
    }
}

/// How a checklist item advances relative to the shared simulated progress
/// `p` (0..=90 while an operation is in flight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Mirrors `p` directly; stays running until forced.
    Track,
    /// Runs with progress `p`, then passes outright once `p` reaches the
    /// threshold.
    PassAt { threshold: u8 },
    /// Runs with `min(factor * p, 100)`, then passes once `p` reaches the
    /// threshold. The factor gives shallow checks their dramatic pacing.
    ScaledPassAt { factor: u8, threshold: u8 },
    /// Never advances on ticks; resolved only by force-completion.
    Deferred,
}

impl Pacing {
    /// Status and progress this policy dictates at simulated progress `p`,
    /// or `None` when the policy leaves the item untouched.
    pub fn apply(&self, p: u8) -> Option<(CheckStatus, u8)> {
        match *self {
            Pacing::Track => Some((CheckStatus::Running, p)),
            Pacing::PassAt { threshold } => {
                if p < threshold {
                    Some((CheckStatus::Running, p))
                } else {
                    Some((CheckStatus::Passed, 100))
                }
            }
            Pacing::ScaledPassAt { factor, threshold } => {
                if p < threshold {
                    Some((CheckStatus::Running, p.saturating_mul(factor).min(100)))
                } else {
                    Some((CheckStatus::Passed, 100))
                }
            }
            Pacing::Deferred => None,
        }
    }
}

/// One checklist entry asserting a specific erasure guarantee.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckItem {
    pub id: String,
    pub label: String,
    pub status: CheckStatus,
    pub detail: String,
    pub progress: u8,
    pacing: Pacing,
}

impl CheckItem {
    pub fn new(id: &str, label: &str, detail: &str, pacing: Pacing) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            status: CheckStatus::Pending,
            detail: detail.to_string(),
            progress: 0,
            pacing,
        }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }
}

/// The verification checklist for one operation run.
///
/// Re-initialized (never appended to) at the start of every operation;
/// item progress is monotonically non-decreasing within a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Checklist {
    items: Vec<CheckItem>,
}

impl Default for Checklist {
    fn default() -> Self {
        Self::standard()
    }
}

impl Checklist {
    /// The four standard erasure checks, shallowest thresholds first.
    pub fn standard() -> Self {
        Self::new(vec![
            CheckItem::new(
                "1",
                "Surface Scan",
                "No recoverable data detected on surface",
                Pacing::Track,
            ),
            CheckItem::new(
                "2",
                "Deep Sector Analysis",
                "All sectors properly overwritten",
                Pacing::PassAt { threshold: 70 },
            ),
            CheckItem::new(
                "3",
                "Challenge-Write Test",
                "Writing test patterns",
                Pacing::ScaledPassAt {
                    factor: 2,
                    threshold: 50,
                },
            ),
            CheckItem::new(
                "4",
                "Magnetic Residue Check",
                "Awaiting completion",
                Pacing::Deferred,
            ),
        ])
    }

    pub fn new(items: Vec<CheckItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CheckItem] {
        &self.items
    }

    /// Reset every item to running at zero progress for a fresh run.
    pub fn begin(&mut self) {
        for item in &mut self.items {
            item.status = CheckStatus::Running;
            item.progress = 0;
        }
    }

    /// Advance the checklist against simulated progress `p`.
    ///
    /// Progress never decreases and a passed item never reopens, so a late
    /// or out-of-order tick cannot roll an item back.
    pub fn advance(&mut self, p: u8) {
        let p = p.min(100);
        for item in &mut self.items {
            if item.status == CheckStatus::Passed {
                continue;
            }
            if let Some((status, progress)) = item.pacing.apply(p) {
                item.status = status;
                item.progress = item.progress.max(progress);
            }
        }
    }

    /// Force every item to passed at full progress. Invoked only by the
    /// controller on confirmed external success, never by timeout.
    pub fn force_pass_all(&mut self) {
        for item in &mut self.items {
            item.status = CheckStatus::Passed;
            item.progress = 100;
        }
    }

    pub fn all_passed(&self) -> bool {
        self.items
            .iter()
            .all(|item| item.status == CheckStatus::Passed)
    }
}
