//! Read-only HTTP layer
//!
//! Dashboard handlers never compute: every route fetches exactly one cache
//! key and returns the last-published payload verbatim. An absent key means
//! "not yet warmed" and is served as JSON `null`, not an error.

mod server;

pub use server::ApiServer;
