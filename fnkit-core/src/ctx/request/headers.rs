use crate::ctx::FunctionCtx;
use http::HeaderMap;
use http::header::AsHeaderName;

/// Request Header API
impl<B, W> FunctionCtx<B, W> {
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// Value of the named header, or `""` when absent or not valid UTF-8.
    pub fn header<K: AsHeaderName>(&self, name: K) -> &str {
        self.request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}
