// Shared test doubles for the integration suite.

use futures::future::BoxFuture;
use securewipe_core::client::EraseReceipt;
use securewipe_core::{ConsoleError, ConsoleResult, EraseService, WipeKind};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct ScriptState {
    outcomes: VecDeque<ConsoleResult<EraseReceipt>>,
    calls: Vec<(WipeKind, String)>,
}

/// Erase service double with scripted outcomes and a configurable response
/// delay, so tests can pin down how much simulated progress elapses before
/// the call resolves.
#[derive(Clone)]
pub struct ScriptedEraseService {
    state: Arc<Mutex<ScriptState>>,
    delay: Duration,
}

impl ScriptedEraseService {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState::default())),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a successful outcome for the next erase call.
    pub fn succeed_with(self, receipt: EraseReceipt) -> Self {
        self.state
            .lock()
            .unwrap()
            .outcomes
            .push_back(Ok(receipt));
        self
    }

    /// Queue a failure for the next erase call.
    pub fn fail_with(self, error: ConsoleError) -> Self {
        self.state.lock().unwrap().outcomes.push_back(Err(error));
        self
    }

    /// Every (kind, device id) pair the controller dispatched, in order.
    pub fn calls(&self) -> Vec<(WipeKind, String)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }
}

impl EraseService for ScriptedEraseService {
    fn erase(&self, kind: WipeKind, device_id: &str) -> BoxFuture<'static, ConsoleResult<EraseReceipt>> {
        let state = Arc::clone(&self.state);
        let delay = self.delay;
        let device_id = device_id.to_string();
        Box::pin(async move {
            state.lock().unwrap().calls.push((kind, device_id));
            tokio::time::sleep(delay).await;
            state
                .lock()
                .unwrap()
                .outcomes
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ConsoleError::Network("no scripted outcome".to_string()))
                })
        })
    }
}

/// Receipt with a completion message and a small deleted-file manifest.
pub fn receipt_with_files() -> EraseReceipt {
    EraseReceipt {
        message: Some("Safe wipe completed successfully".to_string()),
        deleted_files: vec![
            "Documents/report.docx".to_string(),
            "Downloads/setup.exe".to_string(),
        ],
    }
}
