// Post Repository Query Layer and Metrics Aggregator.
// Read-only: posts are written by the scrape routines, never by this service.

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod metrics;
pub mod query;
pub mod repository;
