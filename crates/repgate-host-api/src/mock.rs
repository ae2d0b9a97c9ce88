//! Mock blocking adapter for testing

use async_trait::async_trait;
use repgate_api::Resolution;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

use crate::{BlockError, BlockResult, BlockingAdapter, BlockingCapabilities, check_supported};

/// Mock blocking adapter that records every applied resolution
pub struct MockBlocker {
    capabilities: BlockingCapabilities,
    applied: Arc<Mutex<Vec<Resolution>>>,
    latest_tx: watch::Sender<Option<Resolution>>,

    /// Configure apply to fail
    pub fail_apply: Arc<Mutex<bool>>,
}

impl MockBlocker {
    pub fn new() -> Self {
        let (latest_tx, _) = watch::channel(None);

        Self {
            capabilities: BlockingCapabilities::full("mock"),
            applied: Arc::new(Mutex::new(Vec::new())),
            latest_tx,
            fail_apply: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_capabilities(mut self, caps: BlockingCapabilities) -> Self {
        self.capabilities = caps;
        self
    }

    /// Every resolution applied so far, oldest first
    pub fn applied(&self) -> Vec<Resolution> {
        self.applied.lock().unwrap().clone()
    }

    /// The most recently applied resolution
    pub fn latest(&self) -> Option<Resolution> {
        self.latest_tx.borrow().clone()
    }

    /// Watch for newly applied resolutions
    pub fn subscribe(&self) -> watch::Receiver<Option<Resolution>> {
        self.latest_tx.subscribe()
    }
}

impl Default for MockBlocker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockingAdapter for MockBlocker {
    fn capabilities(&self) -> &BlockingCapabilities {
        &self.capabilities
    }

    async fn apply(&self, resolution: &Resolution) -> BlockResult<()> {
        if *self.fail_apply.lock().unwrap() {
            return Err(BlockError::ApplyFailed("Mock failure".into()));
        }
        check_supported(&self.capabilities, resolution)?;

        debug!(
            blocked = resolution.blocked.len(),
            accessible = resolution.accessible.len(),
            "Mock resolution applied"
        );

        self.applied.lock().unwrap().push(resolution.clone());
        self.latest_tx.send_replace(Some(resolution.clone()));
        Ok(())
    }
}
