//! The process-resident demo backend: dataset, repository, and
//! deterministic review simulation.

pub mod repository;
pub mod review;
pub mod seed;
pub mod state;
