//! Sample data seeding: deterministic CSV generation and the populate
//! step that loads the CSVs into the repository.

pub mod generator;
pub mod populate;

pub use generator::{write_sample_data, RoomRecord, TimetableRecord};
pub use populate::populate_from_csv;
