//! REST client for the hospital backend.
//!
//! Only idempotent reads live here. Writes (booking, bed assignment,
//! profile changes) belong to other front ends.

pub mod client;
pub mod endpoint;
pub mod types;

pub use client::QueueApiClient;
pub use endpoint::Endpoint;
