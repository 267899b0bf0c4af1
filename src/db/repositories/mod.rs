//! Repository implementations module.
//!
//! This module contains implementations of the repository traits:
//! - `local`: in-memory implementation for unit testing and local development
//!
//! A persistent backend would slot in at the trait seam in `repository/`.
pub mod local;

pub use local::LocalRepository;
