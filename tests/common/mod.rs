//! Shared helpers for the end-to-end tests: artifact fixtures on disk, a
//! stub catalog API and a server spawned on an ephemeral port.

pub mod fixtures;
pub mod server;

pub use server::TestServer;
