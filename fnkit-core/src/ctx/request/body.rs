use crate::ctx::FunctionCtx;
use crate::ctx::request::BodyError;
use http::header::CONTENT_LENGTH;
use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Request Body API
impl<B: Read, W> FunctionCtx<B, W> {
    /// Declared body length, `None` when the request carries no content-length.
    pub fn content_length(&self) -> Result<Option<usize>, BodyError> {
        let Some(value) = self.request.headers().get(CONTENT_LENGTH) else {
            return Ok(None);
        };

        let raw = String::from_utf8_lossy(value.as_bytes());
        raw.trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| BodyError::InvalidContentLength(raw.into_owned()))
    }

    /// Read the whole body.
    ///
    /// With a declared content-length, exactly that many bytes are read and a
    /// stream that ends early is an error. Without one, the body is read to
    /// EOF. Either way the configured size limit applies.
    pub fn read_body(&mut self) -> Result<Vec<u8>, BodyError> {
        let limit = self.max_body_bytes;

        match self.content_length()? {
            Some(size) if size > limit => Err(BodyError::TooLarge { size, limit }),
            Some(size) => {
                let mut buf = vec![0; size];
                fill_buffer(self.request.body_mut(), &mut buf)?;
                Ok(buf)
            }
            None => read_to_limit(self.request.body_mut(), limit),
        }
    }

    /// Read the body and decode it as JSON. The content type is not checked.
    pub fn read_json_body<T: DeserializeOwned>(&mut self) -> Result<T, BodyError> {
        let bytes = self.read_body()?;
        serde_json::from_slice(&bytes).map_err(BodyError::Json)
    }
}

/// Keep reading until `buf` is full; a single `read` may return less than asked.
fn fill_buffer<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<(), BodyError> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(BodyError::Truncated {
                    expected: buf.len(),
                    received: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(BodyError::Read(e)),
        }
    }

    Ok(())
}

fn read_to_limit<R: Read + ?Sized>(reader: &mut R, limit: usize) -> Result<Vec<u8>, BodyError> {
    let mut buf = Vec::new();
    // One byte past the limit is enough to tell "exactly at" from "over".
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(BodyError::Read)?;

    if buf.len() > limit {
        return Err(BodyError::TooLarge {
            size: buf.len(),
            limit,
        });
    }

    Ok(buf)
}
