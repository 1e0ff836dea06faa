//! GitVibe runtime composition layer.
//!
//! One entry point, [`Runtime::create`], assembles either a live runtime
//! (HTTP pass-through to a real backend) or a demo runtime (a fully
//! process-resident simulation: tiered persistence, an in-process
//! dataset repository, a mock REST router, and simulated review jobs).
//! The presentation layer only ever consumes the resulting `get`/`post`
//! and auth-status capabilities.

pub mod auth;
pub mod config;
pub mod demo;
pub mod error;
pub mod http;
pub mod persistence;
pub mod router;
pub mod runtime;

pub use auth::{AuthProvider, AuthStatus, MockAuthProvider, RealAuthProvider};
pub use config::{AppMode, RuntimeConfig, DEFAULT_DEMO_NAMESPACE};
pub use demo::repository::DemoRepository;
pub use error::{RuntimeError, TierError};
pub use http::HttpApiClient;
pub use persistence::{FileTier, MemoryTier, SqliteTier, StateTier, TierChain};
pub use router::MockApiClient;
pub use runtime::{ApiClient, Runtime};
