//! TCP connection establishment
//!
//! Opens the first hop of a dial, either to the target itself or to the
//! proxy, under the caller's [`DialContext`].

use tokio::net::TcpStream;

use super::socket_config::configure_tcp_socket;
use crate::config::DialerConfig;
use crate::connect::context::DialContext;
use crate::error;

/// Connect to `authority` (`host:port`), honoring `ctx` and the configured
/// connect timeout.
///
/// Hostnames are resolved by the runtime and each address is tried in turn.
/// An interrupted connect drops the in-flight socket before returning.
///
/// # Errors
///
/// Returns a dial error when no address accepts the connection, when the
/// context ends first, or when socket options cannot be applied.
pub async fn connect_tcp(
    ctx: &DialContext,
    authority: &str,
    config: &DialerConfig,
) -> crate::Result<TcpStream> {
    let ctx = match config.connect_timeout {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx.clone(),
    };

    let stream = match ctx.run(TcpStream::connect(authority)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            tracing::debug!(
                target: "tunneldial::connect",
                %authority,
                error = %e,
                "tcp connect failed"
            );
            return Err(error::dial(e).with_target(authority));
        }
        Err(interrupted) => {
            tracing::debug!(
                target: "tunneldial::connect",
                %authority,
                reason = ?interrupted,
                "tcp connect interrupted"
            );
            return Err(error::dial(interrupted.into_error()).with_target(authority));
        }
    };

    // Dropping `stream` on this path closes it.
    configure_tcp_socket(&stream, config).map_err(|e| error::dial(e).with_target(authority))?;

    Ok(stream)
}
