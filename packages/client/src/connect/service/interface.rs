//! `tower::Service` implementation for [`TunnelDialer`]
//!
//! Lets the dialer plug into connectors that take a service from `Uri` to an
//! I/O stream, such as hyper-util's legacy client.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use http::Uri;
use hyper_util::rt::TokioIo;

use super::core::TunnelDialer;
use crate::connect::context::DialContext;
use crate::connect::types::TunnelConnection;
use crate::error;
use crate::proxy::TargetAddr;

type DialFuture =
    Pin<Box<dyn Future<Output = crate::Result<TokioIo<TunnelConnection>>> + Send + 'static>>;

/// Dial target for `uri`: its host, and its port or the scheme's default.
///
/// # Errors
///
/// Returns a resolution error when the URI has no host.
pub fn target_from_uri(uri: &Uri) -> crate::Result<TargetAddr> {
    let host = uri
        .host()
        .ok_or_else(|| error::resolution("URI has no host").with_target(uri.to_string()))?;
    let port = uri.port_u16().unwrap_or_else(|| match uri.scheme_str() {
        Some("http") => 80,
        _ => 443,
    });

    // `Uri::host` keeps IPv6 brackets, so this is a valid authority as is.
    TargetAddr::parse(&format!("{host}:{port}"))
        .map_err(|e| error::resolution(e).with_target(uri.to_string()))
}

impl tower::Service<Uri> for TunnelDialer {
    type Response = TokioIo<TunnelConnection>;
    type Error = crate::Error;
    type Future = DialFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, dst: Uri) -> Self::Future {
        let dialer = self.clone();
        Box::pin(async move {
            let target = target_from_uri(&dst)?;
            let conn = dialer.dial_addr(&DialContext::background(), &target).await?;
            Ok(TokioIo::new(conn))
        })
    }
}
