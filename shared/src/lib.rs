//! Shared types and pure logic for the Weather Dashboard
//!
//! This crate contains the domain models, the forecast aggregator, the unit
//! and format helpers and the advisory classifier. It is used by the backend
//! and compiled to WebAssembly for the browser client.

pub mod advisory;
pub mod format;
pub mod forecast;
pub mod models;
pub mod types;
pub mod validation;

pub use advisory::*;
pub use forecast::*;
pub use models::*;
pub use types::*;
pub use validation::*;
