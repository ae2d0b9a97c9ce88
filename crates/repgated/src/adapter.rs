//! Blocking adapter that only reports what it would enforce

use async_trait::async_trait;
use repgate_api::Resolution;
use repgate_host_api::{BlockResult, BlockingAdapter, BlockingCapabilities};
use tracing::info;

pub struct LogBlocker {
    capabilities: BlockingCapabilities,
}

impl LogBlocker {
    pub fn new() -> Self {
        Self {
            capabilities: BlockingCapabilities {
                platform: "log".into(),
                can_block_per_target: true,
                can_interrupt_running: false,
                can_observe_foreground: false,
            },
        }
    }
}

impl Default for LogBlocker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockingAdapter for LogBlocker {
    fn capabilities(&self) -> &BlockingCapabilities {
        &self.capabilities
    }

    async fn apply(&self, resolution: &Resolution) -> BlockResult<()> {
        let blocked: Vec<&str> = resolution.blocked.iter().map(|t| t.id.as_str()).collect();
        let accessible: Vec<&str> = resolution
            .accessible
            .iter()
            .map(|t| t.id.as_str())
            .collect();

        info!(?blocked, ?accessible, "Applying target resolution");
        Ok(())
    }
}
