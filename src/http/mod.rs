//! HTTP server module for the Study Map backend.
//!
//! This module provides an axum-based HTTP server that exposes the
//! backend as a REST API. It reuses the service layer, repository
//! pattern, and DTOs from the core library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db::services)                             │
//! │  - Status derivation, aggregation                         │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - Data persistence (LocalRepository)                     │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;

pub mod error;

pub mod handlers;

pub mod router;

pub mod state;

pub use router::create_router;

pub use state::AppState;
