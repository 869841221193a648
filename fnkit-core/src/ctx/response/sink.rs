use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::io::{self, Write};

/// Outbound half of an HTTP exchange, supplied by the host runtime.
///
/// Headers must be in place before `write_head`; `write_body` without a prior
/// head implies 200.
pub trait ResponseSink {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn write_head(&mut self, status: StatusCode) -> io::Result<()>;

    fn write_body(&mut self, body: &[u8]) -> io::Result<()>;
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        (**self).write_head(status)
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        (**self).write_body(body)
    }
}

/// In-memory sink that keeps whatever was written to it.
#[derive(Debug, Default, Clone)]
pub struct RecordedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RecordedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until a head (or body) has been written.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

impl ResponseSink for RecordedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        // First head wins, later ones are ignored.
        self.status.get_or_insert(status);
        Ok(())
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(body);
        Ok(())
    }
}

/// Sink that serializes an HTTP/1.1 response onto any writer.
#[derive(Debug)]
pub struct StreamResponse<W> {
    writer: W,
    headers: HeaderMap,
    head_written: bool,
}

impl<W: Write> StreamResponse<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            headers: HeaderMap::new(),
            head_written: false,
        }
    }

    pub fn head_written(&self) -> bool {
        self.head_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResponseSink for StreamResponse<W> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        if self.head_written {
            tracing::warn!(status = status.as_u16(), "response head already written");
            return Ok(());
        }

        let mut head = Vec::with_capacity(256);
        write!(
            head,
            "HTTP/1.1 {} {}\r\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )?;
        for (name, value) in &self.headers {
            head.extend_from_slice(name.as_str().as_bytes());
            head.extend_from_slice(b": ");
            head.extend_from_slice(value.as_bytes());
            head.extend_from_slice(b"\r\n");
        }
        head.extend_from_slice(b"\r\n");

        self.writer.write_all(&head)?;
        self.head_written = true;
        Ok(())
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        if !self.head_written {
            self.write_head(StatusCode::OK)?;
        }
        self.writer.write_all(body)?;
        self.writer.flush()
    }
}
