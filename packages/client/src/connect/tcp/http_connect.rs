//! HTTP CONNECT tunnel establishment
//!
//! Asks an HTTP proxy to open a tunnel to the target and hands back the
//! socket once the proxy agrees. The exchange is one request and one
//! response head; the proxy may start relaying tunnel bytes right behind the
//! head, so anything read past it is preserved in the returned connection.

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::response::ResponseReader;
use crate::config::DialerConfig;
use crate::connect::context::DialContext;
use crate::connect::types::TunnelConnection;
use crate::error;
use crate::proxy::{ProxyEndpoint, TargetAddr};

/// Serialize the CONNECT request for `target`.
///
/// `proxy_authorization` is the complete header value, e.g. `Basic dXNlcjpwYXNz`.
#[must_use]
pub fn build_connect_request(
    target: &TargetAddr,
    user_agent: &str,
    proxy_authorization: Option<&str>,
) -> Vec<u8> {
    let authority = target.authority();
    let mut request = format!(
        "CONNECT {authority} HTTP/1.1\r\nHost: {authority}\r\nUser-Agent: {user_agent}\r\n"
    );
    if let Some(auth) = proxy_authorization {
        request.push_str("Proxy-Authorization: ");
        request.push_str(auth);
        request.push_str("\r\n");
    }
    request.push_str("\r\n");
    request.into_bytes()
}

/// Establish HTTP CONNECT tunnel through proxy.
///
/// `stream` must already be connected to `proxy`. It is consumed: on success
/// it comes back inside the [`TunnelConnection`], on failure it is closed
/// before this returns.
///
/// # Errors
///
/// * handshake write error when the request cannot be sent or `ctx` ends
///   during the write
/// * handshake read error when the response head cannot be read or parsed,
///   or `ctx` ends during the read
/// * proxy rejection for any non-2xx status
pub async fn establish_connect_tunnel(
    ctx: &DialContext,
    mut stream: TcpStream,
    target: &TargetAddr,
    proxy: &ProxyEndpoint,
    config: &DialerConfig,
) -> crate::Result<TunnelConnection> {
    let authorization = proxy.basic_auth();
    let request = build_connect_request(target, &config.user_agent, authorization.as_deref());

    tracing::debug!(
        target: "tunneldial::connect",
        %proxy,
        %target,
        authenticated = authorization.is_some(),
        "sending CONNECT"
    );

    match ctx.run(stream.write_all(&request)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(error::handshake_write(e).with_target(target.to_string())),
        Err(interrupted) => {
            return Err(
                error::handshake_write(interrupted.into_error()).with_target(target.to_string())
            )
        }
    }

    let mut reader = ResponseReader::new(stream, config.read_buffer_size);
    let head = match ctx.run(reader.read_head(config.max_response_headers)).await {
        Ok(Ok(head)) => head,
        Ok(Err(e)) => return Err(error::handshake_read(e).with_target(target.to_string())),
        Err(interrupted) => {
            return Err(
                error::handshake_read(interrupted.into_error()).with_target(target.to_string())
            )
        }
    };

    if !head.status.is_success() {
        // The body only feeds the error message, so it gets its own short
        // budget on top of the caller's context.
        let body_ctx = ctx.with_timeout(config.error_body_timeout);
        let dump = match body_ctx
            .run(reader.read_body(head.body_framing(), config.max_error_body))
            .await
        {
            Ok(Ok(body)) => Some(head.dump(&body)),
            Ok(Err(e)) => {
                tracing::warn!(
                    target: "tunneldial::connect",
                    %proxy,
                    error = %e,
                    "could not read rejected CONNECT response body"
                );
                None
            }
            Err(interrupted) => {
                tracing::warn!(
                    target: "tunneldial::connect",
                    %proxy,
                    reason = ?interrupted,
                    "gave up reading rejected CONNECT response body"
                );
                None
            }
        };

        tracing::warn!(
            target: "tunneldial::connect",
            %proxy,
            %target,
            status = head.status.as_u16(),
            "proxy rejected CONNECT"
        );

        drop(reader);
        return Err(
            error::proxy_rejected(head.status, head.reason, dump).with_target(target.to_string())
        );
    }

    let (stream, leftover) = reader.into_parts();
    tracing::debug!(
        target: "tunneldial::connect",
        %proxy,
        %target,
        buffered = leftover.len(),
        "CONNECT tunnel established"
    );

    Ok(TunnelConnection::from_parts(leftover.freeze(), stream))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use super::*;

    fn target(s: &str) -> TargetAddr {
        TargetAddr::parse(s).expect("test target should parse")
    }

    #[test]
    fn request_without_auth() {
        let request = build_connect_request(&target("example.com:443"), "ua/1", None);
        assert_eq!(
            request,
            b"CONNECT example.com:443 HTTP/1.1\r\nHost: example.com:443\r\nUser-Agent: ua/1\r\n\r\n"
        );
    }

    #[test]
    fn request_with_auth_and_ipv6_target() {
        let request = build_connect_request(
            &target("[2001:db8::1]:50051"),
            "ua/1",
            Some("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(
            String::from_utf8(request).expect("ascii"),
            "CONNECT [2001:db8::1]:50051 HTTP/1.1\r\n\
             Host: [2001:db8::1]:50051\r\n\
             User-Agent: ua/1\r\n\
             Proxy-Authorization: Basic dXNlcjpwYXNz\r\n\r\n"
        );
    }

    async fn run_against(reply: &'static [u8]) -> (crate::Result<TunnelConnection>, Vec<u8>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.ends_with(b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read request");
                assert!(n > 0, "client closed before finishing request");
                request.extend_from_slice(&buf[..n]);
            }
            tokio::io::AsyncWriteExt::write_all(&mut socket, reply)
                .await
                .expect("write reply");
            // Wait for the client to close.
            let _ = socket.read(&mut buf).await;
            request
        });

        let stream = TcpStream::connect(addr).await.expect("connect");
        let proxy = ProxyEndpoint::parse(&format!("http://{addr}")).expect("proxy url");
        let config = DialerConfig::default().user_agent("test-agent");
        let result = establish_connect_tunnel(
            &DialContext::background(),
            stream,
            &target("backend.internal:443"),
            &proxy,
            &config,
        )
        .await;

        let request = match &result {
            Ok(_) => Vec::new(),
            Err(_) => server.await.expect("server task"),
        };
        (result, request)
    }

    #[tokio::test]
    async fn success_without_read_ahead_is_raw() {
        let (result, _) = run_against(b"HTTP/1.1 200 Connection established\r\n\r\n").await;
        let conn = result.expect("tunnel");
        assert!(!conn.is_buffered());
    }

    #[tokio::test]
    async fn rejection_carries_status_and_body() {
        let (result, request) = run_against(
            b"HTTP/1.1 403 Forbidden\r\nContent-Length: 6\r\n\r\nnope!!",
        )
        .await;
        let err = result.expect_err("rejected");
        assert!(err.is_proxy_rejected());
        assert_eq!(err.status(), Some(http::StatusCode::FORBIDDEN));
        let dump = err.response_dump().expect("dump");
        assert!(dump.starts_with("HTTP/1.1 403 Forbidden\r\n"));
        assert!(dump.ends_with("\r\n\r\nnope!!"));

        let request = String::from_utf8(request).expect("ascii");
        assert!(request.starts_with("CONNECT backend.internal:443 HTTP/1.1\r\n"));
        assert!(request.contains("User-Agent: test-agent\r\n"));
        assert!(!request.contains("Proxy-Authorization"));
    }

    #[tokio::test]
    async fn deadline_during_read_is_read_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.expect("accept");
            // Never answer.
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let stream = TcpStream::connect(addr).await.expect("connect");
        let proxy = ProxyEndpoint::parse(&format!("http://{addr}")).expect("proxy url");
        let ctx = DialContext::background().with_timeout(Duration::from_millis(50));
        let err = establish_connect_tunnel(
            &ctx,
            stream,
            &target("backend.internal:443"),
            &proxy,
            &DialerConfig::default(),
        )
        .await
        .expect_err("silent proxy");
        assert!(err.is_handshake());
        assert!(matches!(err.kind(), error::Kind::HandshakeRead));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn ended_context_fails_write_and_closes_socket() {
        let stopped = DialContext::background();
        stopped.cancel();
        let expired = DialContext::background().with_deadline(tokio::time::Instant::now());

        for (ctx, canceled) in [(stopped, true), (expired, false)] {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            let addr = listener.local_addr().expect("local addr");
            let peer = tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.expect("accept");
                let mut received = Vec::new();
                tokio::time::timeout(Duration::from_secs(5), socket.read_to_end(&mut received))
                    .await
                    .expect("client should close the socket")
                    .expect("read until eof");
                received
            });

            let stream = TcpStream::connect(addr).await.expect("connect");
            let proxy = ProxyEndpoint::parse(&format!("http://{addr}")).expect("proxy url");
            let err = establish_connect_tunnel(
                &ctx,
                stream,
                &target("backend.internal:443"),
                &proxy,
                &DialerConfig::default(),
            )
            .await
            .expect_err("context already ended");

            assert!(matches!(err.kind(), error::Kind::HandshakeWrite));
            assert_eq!(err.is_canceled(), canceled);
            assert_eq!(err.is_timeout(), !canceled);
            assert_eq!(err.target(), Some("backend.internal:443"));

            let received = peer.await.expect("peer task");
            assert!(received.is_empty(), "nothing should be written");
        }
    }
}
