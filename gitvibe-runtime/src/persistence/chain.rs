//! Ordered fallback composition of storage tiers.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, warn};

use super::{FileTier, MemoryTier, SqliteTier, StateTier};
use crate::demo::state::DemoState;

/// An ordered list of tiers behind the single read/write contract.
///
/// The first tier that answers wins; a tier failure is logged and the
/// next tier consulted. Callers never see a tier error — the chain ends
/// in an infallible in-memory tier, so the runtime keeps working even
/// with every durable backend broken.
pub struct TierChain {
    tiers: Vec<Arc<dyn StateTier>>,
}

impl TierChain {
    pub fn new(tiers: Vec<Arc<dyn StateTier>>) -> Self {
        Self { tiers }
    }

    /// The standard stack: SQLite, then JSON file, then memory. A SQLite
    /// database that cannot even be opened is dropped from the chain up
    /// front rather than failing every call.
    pub fn standard(state_dir: &Path, namespace: &str) -> Self {
        let mut tiers: Vec<Arc<dyn StateTier>> = Vec::with_capacity(3);

        match SqliteTier::new(state_dir.join(format!("{namespace}.db"))) {
            Ok(tier) => tiers.push(Arc::new(tier)),
            Err(error) => {
                warn!(%error, "sqlite tier unavailable, falling back to file storage");
            }
        }
        tiers.push(Arc::new(FileTier::new(state_dir, namespace)));
        tiers.push(Arc::new(MemoryTier::new()));

        Self::new(tiers)
    }

    /// Read the persisted document from the first healthy tier.
    ///
    /// A tier that answers `None` ends the search: an empty store is an
    /// answer, not a failure.
    pub async fn read(&self) -> Option<DemoState> {
        for tier in &self.tiers {
            match tier.read().await {
                Ok(result) => return result,
                Err(error) => {
                    warn!(tier = tier.name(), %error, "tier read failed, trying fallback");
                }
            }
        }
        None
    }

    /// Persist the document to the first tier that acknowledges.
    pub async fn write(&self, state: &DemoState) {
        for tier in &self.tiers {
            match tier.write(state).await {
                Ok(()) => return,
                Err(error) => {
                    warn!(tier = tier.name(), %error, "tier write failed, trying fallback");
                }
            }
        }
        error!("no persistence tier accepted the demo document");
    }
}
