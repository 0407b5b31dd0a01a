//! Marker errors attached as sources to dial failures.

use thiserror::Error;

/// The dial context's deadline passed before the stage completed.
#[derive(Debug, Error)]
#[error("timed out")]
pub struct TimedOut;

/// The dial context was canceled before the stage completed.
#[derive(Debug, Error)]
#[error("operation canceled")]
pub struct OperationCanceled;

/// The proxy closed the connection before the response header block ended.
#[derive(Debug, Error)]
#[error("incomplete proxy response: connection closed after {read} bytes")]
pub struct IncompleteResponse {
    pub read: usize,
}

/// The proxy's header block did not fit in the handshake read buffer.
#[derive(Debug, Error)]
#[error("proxy response header block exceeds {limit} bytes")]
pub struct ResponseTooLarge {
    pub limit: usize,
}
