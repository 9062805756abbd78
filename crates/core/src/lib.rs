//! Pure domain logic for the nestling tracking backend.
//!
//! This crate has no internal dependencies and no knowledge of the database
//! or HTTP layers. It holds the shared id/timestamp types, the domain enums
//! (tag kinds, time-of-day, event discriminators), the tag-resolution
//! engine, the timeline ordering rules, the injected clock, and the generic
//! per-request batch loader.

pub mod clock;
pub mod error;
pub mod loader;
pub mod tags;
pub mod timeline;
pub mod types;
