//! Blocking adapter traits

use async_trait::async_trait;
use repgate_api::Resolution;
use thiserror::Error;

use crate::BlockingCapabilities;

/// Errors from blocking adapter operations
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("Apply failed: {0}")]
    ApplyFailed(String),

    #[error("Unsupported by this adapter: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BlockResult<T> = Result<T, BlockError>;

/// Blocking adapter trait - implemented by platform-specific adapters
///
/// The daemon calls [`apply`](BlockingAdapter::apply) with the full resolution
/// whenever it changes. Adapters must enforce the blocked list as given and
/// must not widen access beyond the accessible list.
#[async_trait]
pub trait BlockingAdapter: Send + Sync {
    /// Get the capabilities of this adapter
    fn capabilities(&self) -> &BlockingCapabilities;

    /// Enforce a resolution
    async fn apply(&self, resolution: &Resolution) -> BlockResult<()>;

    /// Optional: check if the adapter is healthy
    fn is_healthy(&self) -> bool {
        true
    }
}

/// Refuse resolutions the adapter cannot express
pub fn check_supported(caps: &BlockingCapabilities, resolution: &Resolution) -> BlockResult<()> {
    let mixed = !resolution.blocked.is_empty() && !resolution.accessible.is_empty();
    if mixed && !caps.can_block_per_target {
        return Err(BlockError::Unsupported(format!(
            "{} cannot block {} of {} targets individually",
            caps.platform,
            resolution.blocked.len(),
            resolution.len()
        )));
    }
    Ok(())
}
