pub mod log;
pub mod migrate;
pub mod queries;
pub mod store;

pub use store::EventStore;

/// Current name of the care event table.
pub const EVENTS_TABLE: &str = "drug_log";
