//! Connection establishment
//!
//! Direct TCP dials and HTTP CONNECT tunnels, both bounded by a
//! [`DialContext`].

pub mod context;
pub mod service;
pub mod tcp;
pub mod types;

pub use context::{DialContext, Interrupted};
pub use service::{dynamic_proxy_dialer, target_from_uri, TunnelDialer};
pub use tcp::{build_connect_request, configure_tcp_socket, connect_tcp, establish_connect_tunnel};
pub use types::{BufferedConnection, ConnectionTrait, TunnelConnection};
