//! JSON-file implementation of `StateTier`.
//!
//! The simple key-value analog in the chain: one document per namespace
//! at `{state_dir}/{namespace}.json`. Writes go through a temp file and
//! rename so a crash mid-write cannot leave a torn document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{decode_state, StateTier};
use crate::demo::state::DemoState;
use crate::error::TierError;

pub struct FileTier {
    path: PathBuf,
}

impl FileTier {
    pub fn new(state_dir: &Path, namespace: &str) -> Self {
        Self {
            path: state_dir.join(format!("{namespace}.json")),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl StateTier for FileTier {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read(&self) -> Result<Option<DemoState>, TierError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(TierError::storage("read state file", error.to_string())),
        };
        Ok(decode_state(self.name(), &raw))
    }

    async fn write(&self, state: &DemoState) -> Result<(), TierError> {
        let raw = serde_json::to_string(state)
            .map_err(|error| TierError::storage("encode state file", error.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|error| {
                    TierError::storage("create state directory", error.to_string())
                })?;
            }
        }

        let temp = self.temp_path();
        fs::write(&temp, raw)
            .await
            .map_err(|error| TierError::storage("write state file", error.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|error| TierError::storage("replace state file", error.to_string()))?;
        Ok(())
    }
}
