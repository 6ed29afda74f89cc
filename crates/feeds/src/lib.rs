//! FleetGlass Feeds
//!
//! Bounded recent-history views and the per-vehicle detail cache.
//!
//! - [`BoundedFeed`]: newest-first, fixed-capacity collection with tail eviction
//! - [`ViewStore`]: one independent [`BoundedFeed`] per [`Classification`]
//! - [`DetailCache`]: last-write-wins map from vehicle id to its latest record
//!
//! The containers are generic over the row and record types so the stream
//! crate owns the telemetry schema.
//!
//! [`Classification`]: fleetglass_core::Classification

#![warn(missing_docs)]

pub mod bounded;
pub mod detail;
pub mod store;

pub use bounded::BoundedFeed;
pub use detail::DetailCache;
pub use store::{ViewCounts, ViewStore};
