//! Domain logic shared by the Mediaforge crates.
//!
//! Nothing in here talks to the network directly. Provider calls are
//! abstracted behind [`polling::QueueBackend`] so the poll loop can be
//! exercised without a live provider.

pub mod chunking;
pub mod error;
pub mod links;
pub mod markdown;
pub mod media;
pub mod polling;
pub mod registry;
pub mod types;
