//! The two control-plane components of the gateway.
//!
//! [`dispatcher`] validates typed update commands and forwards them to
//! the engine; [`streamer`] owns one long-lived progress stream per
//! client connection.

pub mod dispatcher;
pub mod streamer;

pub use dispatcher::CommandDispatcher;
pub use streamer::ProgressStreamer;
