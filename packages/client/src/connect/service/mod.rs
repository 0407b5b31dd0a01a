//! Dialer service
//!
//! [`TunnelDialer`] picks the direct or proxied path per dial and also
//! implements `tower::Service<Uri>` for use as a connector.

pub mod core;
pub mod direct;
pub mod interface;
pub mod proxy;

pub use core::{dynamic_proxy_dialer, TunnelDialer};
pub use interface::target_from_uri;
