//! Resource library API client.

pub mod client;
pub mod types;

pub use client::LibraryApi;
pub use types::{Resource, ResourceKind};
