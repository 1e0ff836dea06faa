//! In-memory implementation of `StateTier`.
//!
//! The terminal tier of the chain: always available, never fails, and
//! loses everything on restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StateTier;
use crate::demo::state::DemoState;
use crate::error::TierError;

pub struct MemoryTier {
    state: RwLock<Option<DemoState>>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateTier for MemoryTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self) -> Result<Option<DemoState>, TierError> {
        Ok(self.state.read().await.clone())
    }

    async fn write(&self, state: &DemoState) -> Result<(), TierError> {
        *self.state.write().await = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::seed::seeded_state;

    #[tokio::test]
    async fn test_read_returns_none_when_empty() {
        let tier = MemoryTier::new();
        assert!(tier.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_yields_equal_document() {
        let tier = MemoryTier::new();
        let state = seeded_state();

        tier.write(&state).await.unwrap();
        let loaded = tier.read().await.unwrap().expect("document present");
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_write_replaces_whole_document() {
        let tier = MemoryTier::new();
        let mut state = seeded_state();
        tier.write(&state).await.unwrap();

        state.repos.clear();
        tier.write(&state).await.unwrap();

        let loaded = tier.read().await.unwrap().expect("document present");
        assert!(loaded.repos.is_empty());
    }
}
