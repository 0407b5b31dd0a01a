//! TCP connection utilities
//!
//! Socket setup, connection establishment under a [`DialContext`], and the
//! HTTP CONNECT handshake.
//!
//! [`DialContext`]: crate::connect::DialContext

pub mod basic_connection;
pub mod http_connect;
pub mod response;
pub mod socket_config;

pub use basic_connection::connect_tcp;
pub use http_connect::{build_connect_request, establish_connect_tunnel};
pub use response::{BodyFraming, ResponseHead, ResponseReader};
pub use socket_config::configure_tcp_socket;
