//! Proxied connection path

use super::core::TunnelDialer;
use crate::connect::context::DialContext;
use crate::connect::tcp::{connect_tcp, establish_connect_tunnel};
use crate::connect::types::TunnelConnection;
use crate::proxy::{ProxyEndpoint, TargetAddr};

impl TunnelDialer {
    /// Connect to `proxy` and ask it for a tunnel to `target`.
    pub(super) async fn connect_via_proxy(
        &self,
        ctx: &DialContext,
        target: &TargetAddr,
        proxy: &ProxyEndpoint,
    ) -> crate::Result<TunnelConnection> {
        let stream = connect_tcp(ctx, &proxy.authority(), &self.config).await?;
        establish_connect_tunnel(ctx, stream, target, proxy, &self.config).await
    }
}
