//! Nestling API server library.
//!
//! Exposes the building blocks (config, state, error handling, loaders,
//! routes) so integration tests and the binary entrypoint can both access
//! them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod loaders;
pub mod render;
pub mod router;
pub mod routes;
pub mod state;
