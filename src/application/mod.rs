//! Application layer: turning captured payment events into signed
//! deliveries.
//!
//! `Relay` performs one signed POST per event. `Dispatcher` sits behind an
//! explicit `mpsc` channel and spawns an independent tokio task per event, so
//! the producer never waits on network I/O.

pub mod dispatcher;
pub mod environment;
pub mod relay;
