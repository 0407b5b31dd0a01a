//! Direct connection path

use super::core::TunnelDialer;
use crate::connect::context::DialContext;
use crate::connect::tcp::connect_tcp;
use crate::connect::types::TunnelConnection;
use crate::proxy::TargetAddr;

impl TunnelDialer {
    /// Connect straight to `target`. No bytes are written.
    pub(super) async fn connect_direct(
        &self,
        ctx: &DialContext,
        target: &TargetAddr,
    ) -> crate::Result<TunnelConnection> {
        let stream = connect_tcp(ctx, &target.authority(), &self.config).await?;
        tracing::debug!(target: "tunneldial::connect", %target, "direct connection established");
        Ok(TunnelConnection::Raw(stream))
    }
}
