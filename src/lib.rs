//! # Study Map Rust Backend
//!
//! Campus room-occupancy tracking service.
//!
//! This crate provides the backend for the Study Map system: it tracks the
//! state of campus rooms (free / occupied / booked, capacity, timetable),
//! simulates live occupancy updates, and answers aggregation queries for
//! the dashboards. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Seeding**: deterministic sample CSV data for rooms and timetables
//! - **Populate**: CSV loading into the data store at startup
//! - **Simulation**: a periodic task emulating live occupancy sensor feeds
//! - **Analytics**: heatmap and summary aggregations over occupancy history
//! - **HTTP API**: RESTful endpoints for the dashboard front-ends
//! - **Ops**: a health monitor probing the API and computing uptime metrics
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: shared domain types and API response DTOs
//! - [`db`]: repository pattern and persistence layer
//! - [`seed`]: sample data generation and CSV populate step
//! - [`services`]: business logic, including the occupancy simulator
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`ops`]: health monitor probe and metrics

pub mod api;
pub mod config;
pub mod db;
pub mod seed;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(feature = "ops-monitor")]
pub mod ops;
