//! Tiered persistence for the demo dataset.
//!
//! This module defines the `StateTier` trait that abstracts snapshot
//! storage for the demo document. Implementations provide different
//! backends (SQLite, JSON file, in-memory) and are composed into an
//! ordered fallback chain by [`TierChain`]; a tier failure never
//! reaches the repository.

mod chain;
mod file;
mod memory;
mod sqlite;

pub use chain::TierChain;
pub use file::FileTier;
pub use memory::MemoryTier;
pub use sqlite::SqliteTier;

use async_trait::async_trait;
use tracing::warn;

use crate::demo::state::DemoState;
use crate::error::TierError;

/// One storage backend participating in the fallback chain.
///
/// `read` hands back an owned, freshly deserialized document (or `None`
/// when the backend holds nothing usable); `write` replaces the stored
/// document wholesale. Implementations never hand out references into
/// their own storage, so the repository can never alias persisted state.
#[async_trait]
pub trait StateTier: Send + Sync {
    /// Short name for log lines.
    fn name(&self) -> &'static str;

    async fn read(&self) -> Result<Option<DemoState>, TierError>;

    async fn write(&self, state: &DemoState) -> Result<(), TierError>;
}

/// Decode a raw stored document. A document that no longer parses is
/// indistinguishable from an absent one; the caller reseeds.
fn decode_state(tier: &'static str, raw: &str) -> Option<DemoState> {
    match serde_json::from_str(raw) {
        Ok(state) => Some(state),
        Err(error) => {
            warn!(tier, %error, "discarding undecodable demo document");
            None
        }
    }
}
