//! CONNECT response reading
//!
//! Reads exactly one HTTP/1.x response head from the proxy socket into a
//! bounded buffer. Bytes that arrive after the head stay in the buffer and
//! are handed to the caller as the start of the tunnel stream.

use std::fmt::Write as _;
use std::io;

use bytes::{Buf, BytesMut};
use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, StatusCode};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::error::{IncompleteResponse, ResponseTooLarge};

/// Parsed status line and headers of the proxy's reply.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub version: u8,
    pub status: StatusCode,
    pub reason: Option<String>,
    pub headers: HeaderMap,
}

/// How the body of a rejected response is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    Empty,
    Length(u64),
    Chunked,
    UntilClose,
}

/// Socket plus the bytes read from it but not yet consumed.
#[derive(Debug)]
pub struct ResponseReader {
    stream: TcpStream,
    buf: BytesMut,
    capacity: usize,
}

impl ResponseReader {
    /// Wrap `stream` with a read buffer of `capacity` bytes.
    pub fn new(stream: TcpStream, capacity: usize) -> Self {
        Self {
            stream,
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of buffered, unconsumed bytes.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Give back the socket and whatever is left in the buffer.
    pub fn into_parts(self) -> (TcpStream, BytesMut) {
        (self.stream, self.buf)
    }

    /// Read from the socket into the buffer, at most up to `limit` buffered
    /// bytes. Returns the number of bytes read; 0 means EOF.
    async fn fill(&mut self, limit: usize) -> io::Result<usize> {
        let room = limit.saturating_sub(self.buf.len());
        if room == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                ResponseTooLarge { limit },
            ));
        }
        self.buf.reserve(room);
        (&mut self.stream)
            .take(room as u64)
            .read_buf(&mut self.buf)
            .await
    }

    /// Read and parse one response head, consuming it from the buffer.
    ///
    /// # Errors
    ///
    /// Fails on socket errors, malformed responses, EOF before the end of the
    /// head, or a head that does not fit in the buffer.
    pub async fn read_head(&mut self, max_headers: usize) -> io::Result<ResponseHead> {
        let mut total_read = 0;

        loop {
            if !self.buf.is_empty() {
                if let Some((head, len)) = parse_head(&self.buf, max_headers)? {
                    self.buf.advance(len);
                    return Ok(head);
                }
            }

            let n = self.fill(self.capacity).await?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    IncompleteResponse { read: total_read },
                ));
            }
            total_read += n;
        }
    }

    /// Read a response body delimited by `framing`, keeping at most `max`
    /// bytes. Anything beyond `max` is left unread.
    ///
    /// # Errors
    ///
    /// Fails on socket errors, premature EOF for length-delimited or chunked
    /// bodies, and malformed chunk sizes.
    pub async fn read_body(&mut self, framing: BodyFraming, max: usize) -> io::Result<Vec<u8>> {
        match framing {
            BodyFraming::Empty => Ok(Vec::new()),
            BodyFraming::Length(len) => {
                let want = usize::try_from(len).unwrap_or(usize::MAX).min(max);
                self.read_exact_buffered(want).await?;
                Ok(self.buf.split_to(want).to_vec())
            }
            BodyFraming::UntilClose => {
                let mut body = Vec::new();
                loop {
                    let take = self.buf.len().min(max - body.len());
                    body.extend_from_slice(&self.buf.split_to(take));
                    if body.len() >= max {
                        return Ok(body);
                    }
                    if self.fill(self.capacity).await? == 0 {
                        return Ok(body);
                    }
                }
            }
            BodyFraming::Chunked => self.read_chunked(max).await,
        }
    }

    async fn read_exact_buffered(&mut self, want: usize) -> io::Result<()> {
        while self.buf.len() < want {
            if self.fill(want.max(self.capacity)).await? == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
        }
        Ok(())
    }

    async fn read_line(&mut self) -> io::Result<BytesMut> {
        loop {
            if let Some(pos) = self.buf.windows(2).position(|w| w == b"\r\n") {
                let line = self.buf.split_to(pos);
                self.buf.advance(2);
                return Ok(line);
            }
            if self.fill(self.capacity).await? == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
        }
    }

    async fn read_chunked(&mut self, max: usize) -> io::Result<Vec<u8>> {
        let mut body = Vec::new();

        loop {
            let line = self.read_line().await?;
            let size = parse_chunk_size(&line)?;
            if size == 0 {
                return Ok(body);
            }

            let size = usize::try_from(size).unwrap_or(usize::MAX);
            let keep = size.min(max - body.len());
            self.read_exact_buffered(keep).await?;
            body.extend_from_slice(&self.buf.split_to(keep));
            if body.len() >= max {
                return Ok(body);
            }

            // chunk data is followed by CRLF
            self.read_exact_buffered(2).await?;
            self.buf.advance(2);
        }
    }
}

fn parse_head(buf: &[u8], max_headers: usize) -> io::Result<Option<(ResponseHead, usize)>> {
    let mut headers = vec![httparse::EMPTY_HEADER; max_headers];
    let mut response = httparse::Response::new(&mut headers);

    let len = match response.parse(buf) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) => return Ok(None),
        Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
    };

    let code = response.code.unwrap_or_default();
    let status = StatusCode::from_u16(code)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut map = HeaderMap::with_capacity(response.headers.len());
    for header in response.headers.iter() {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let value = HeaderValue::from_bytes(header.value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        map.append(name, value);
    }

    let head = ResponseHead {
        version: response.version.unwrap_or(1),
        status,
        reason: response
            .reason
            .filter(|reason| !reason.is_empty())
            .map(str::to_string),
        headers: map,
    };

    Ok(Some((head, len)))
}

fn parse_chunk_size(line: &[u8]) -> io::Result<u64> {
    let line = std::str::from_utf8(line)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    // drop chunk extensions
    let digits = line.split(';').next().unwrap_or_default().trim();
    u64::from_str_radix(digits, 16).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

impl ResponseHead {
    /// Body framing per RFC 9112 §6.3 for a response to CONNECT.
    #[must_use]
    pub fn body_framing(&self) -> BodyFraming {
        if self.status.is_success()
            || self.status.is_informational()
            || self.status == StatusCode::NO_CONTENT
            || self.status == StatusCode::NOT_MODIFIED
        {
            return BodyFraming::Empty;
        }

        let chunked = self
            .headers
            .get_all(TRANSFER_ENCODING)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .last()
            .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        if chunked {
            return BodyFraming::Chunked;
        }

        match self
            .headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            Some(0) => BodyFraming::Empty,
            Some(len) => BodyFraming::Length(len),
            None => BodyFraming::UntilClose,
        }
    }

    /// `HTTP/1.1 407 Proxy Authentication Required`
    #[must_use]
    pub fn status_line(&self) -> String {
        let reason = self
            .reason
            .as_deref()
            .or_else(|| self.status.canonical_reason())
            .unwrap_or("");
        format!("HTTP/1.{} {} {}", self.version, self.status.as_u16(), reason)
            .trim_end()
            .to_string()
    }

    /// Render the head and `body` back into HTTP/1.x wire form for diagnostics.
    #[must_use]
    pub fn dump(&self, body: &[u8]) -> String {
        let mut out = self.status_line();
        out.push_str("\r\n");
        for (name, value) in &self.headers {
            let _ = write!(out, "{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes()));
        }
        out.push_str("\r\n");
        out.push_str(&String::from_utf8_lossy(body));
        out
    }
}
