//! Domain types for the payment relay: captured events, environment
//! selection, request signing and the ports the application layer talks to.

pub mod config;
pub mod event;
pub mod ports;
pub mod request;
pub mod signing;
