//! Client boundary for the external durable-execution engine.
//!
//! The engine owns workflow identity, history, and update atomicity;
//! this crate only addresses it. Everything goes through the
//! [`EngineClient`] trait so the gateway and its tests can substitute
//! any compliant engine — the HTTP client for production, the
//! in-memory engine for tests and local development.

pub mod client;
pub mod http;
pub mod memory;
pub mod retry;

pub use client::{EngineClient, EngineError, WorkflowHandle};
pub use http::HttpEngineClient;
pub use memory::InMemoryEngine;
