//! Domain logic for the book-generation control plane.
//!
//! Everything in this crate is pure: no I/O, no clocks other than the
//! ones callers pass in, no engine types. The HTTP gateway (`fable-api`)
//! and the engine boundary (`fable-engine`) build on top of it.

pub mod backoff;
pub mod command;
pub mod error;
pub mod quality;
pub mod theme;
pub mod types;

pub use error::CoreError;
