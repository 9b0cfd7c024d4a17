// Credential Store: per-platform, per-purpose scraper keys with an active flag.
// Keys are only ever deactivated, never deleted.

pub mod bulk;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod store;
