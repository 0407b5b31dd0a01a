//! Dialer builder
//!
//! Fluent construction of a [`TunnelDialer`](tunneldial_client::TunnelDialer):
//! pick where proxy variables come from, adjust the handshake and socket
//! settings, then [`DialerBuilder::build`].

pub mod core;
pub mod env;
pub mod settings;

pub use core::DialerBuilder;
