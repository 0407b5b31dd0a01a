//! Connection types returned by the dialer

pub mod buffered;
pub mod connection;

pub use buffered::BufferedConnection;
pub use connection::{ConnectionTrait, TunnelConnection};
