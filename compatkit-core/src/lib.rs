//! Compatkit library exports

pub mod browsers;
pub mod config;
pub mod ingest;
pub mod query;
pub mod record;
pub mod store;
