//! In-memory collaborators for driving the monitor in tests

use async_trait::async_trait;
use sentinel_core::{MetadataProvider, Notifier, Result, SentinelError, Terminator};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted metadata server.
///
/// Fixed values answer every call; scripted keys pop one response per call
/// and fall back to the fixed value once drained. Unknown keys return 404.
#[derive(Default)]
pub struct FakeMetadata {
    fixed: HashMap<String, String>,
    scripts: Mutex<HashMap<String, VecDeque<Result<String>>>>,
    hanging: Vec<String>,
    latency: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.fixed.insert(key.to_string(), value.to_string());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.fixed.remove(key);
        self
    }

    pub fn with_script(self, key: &str, responses: Vec<Result<String>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(key.to_string(), responses.into_iter().collect());
        self
    }

    /// Calls for `key` never complete
    pub fn hanging(mut self, key: &str) -> Self {
        self.hanging.push(key.to_string());
        self
    }

    /// Every call takes `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self, key: &str) -> usize {
        self.calls.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn get(&self, key: &str) -> Result<String> {
        *self.calls.lock().unwrap().entry(key.to_string()).or_default() += 1;

        if self.hanging.iter().any(|k| k == key) {
            std::future::pending::<()>().await;
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(key)
            .and_then(|queue| queue.pop_front());
        if let Some(response) = scripted {
            return response;
        }

        self.fixed
            .get(key)
            .cloned()
            .ok_or_else(|| SentinelError::MetadataNotOk {
                key: key.to_string(),
                status: 404,
            })
    }
}

/// Records every message it is asked to deliver
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Counts delete requests and answers with a fixed outcome
#[derive(Default)]
pub struct CountingTerminator {
    calls: AtomicUsize,
    fail: bool,
    targets: Mutex<Vec<(String, String, String)>>,
}

impl CountingTerminator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn targets(&self) -> Vec<(String, String, String)> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl Terminator for CountingTerminator {
    async fn terminate(&self, project_id: &str, zone: &str, instance_name: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().unwrap().push((
            project_id.to_string(),
            zone.to_string(),
            instance_name.to_string(),
        ));

        if self.fail {
            Err(SentinelError::termination("403 Forbidden"))
        } else {
            Ok(())
        }
    }
}
