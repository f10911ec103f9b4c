//! HTTP gateway for driving and observing book-generation workflows.
//!
//! Exposes a command endpoint that validates and forwards typed
//! updates into the durable-execution engine, and a server-sent-events
//! progress endpoint that streams genuine workflow state changes to
//! clients. See `gateway` for the two core components.

pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
