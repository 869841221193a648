use crate::harness::tracing::init_test_tracing;
use fnkit_core::config::ToolkitConfig;
use fnkit_core::ctx::{FunctionCtx, RecordedResponse, ResponseSink};
use fnkit_core::logging::LogMode;
use http::Request;
use http::header::CONTENT_LENGTH;
use std::io::Cursor;

pub type TestCtx<'a> = FunctionCtx<Cursor<Vec<u8>>, &'a mut RecordedResponse>;

/// Builder for the synthetic request handed to a function under test.
#[derive(Debug, Clone)]
pub struct TestRequest {
    method: String,
    uri: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    declared_length: Option<String>,
}

impl TestRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers: Vec::new(),
            body: Vec::new(),
            declared_length: None,
        }
    }

    pub fn header(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.headers.push((k.into(), v.into()));
        self
    }

    /// Body with a matching content-length.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.declared_length = Some(self.body.len().to_string());
        self
    }

    /// Override the declared content-length, e.g. to lie about it.
    pub fn declared_length(mut self, len: impl ToString) -> Self {
        self.declared_length = Some(len.to_string());
        self
    }

    pub fn build(self) -> Request<Cursor<Vec<u8>>> {
        let mut builder = Request::builder()
            .method(self.method.as_str())
            .uri(self.uri.as_str());
        for (k, v) in &self.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        if let Some(len) = &self.declared_length {
            builder = builder.header(CONTENT_LENGTH, len.as_str());
        }
        builder
            .body(Cursor::new(self.body))
            .expect("invalid test request")
    }
}

/// Result of running one function invocation.
pub struct Invocation<T> {
    pub response: RecordedResponse,
    pub correlation_id: String,
    pub outcome: T,
}

/// Run `handler` against `request` with an in-memory response recorder,
/// the way a host runtime would for one inbound call.
pub fn invoke<F, T>(request: TestRequest, handler: F) -> Invocation<T>
where
    F: FnOnce(&mut TestCtx<'_>) -> T,
{
    let mut response = RecordedResponse::new();
    let (correlation_id, outcome) = invoke_with_sink(request, &mut response, handler);

    Invocation {
        response,
        correlation_id,
        outcome,
    }
}

/// Same as [`invoke`] but with a caller-supplied sink.
pub fn invoke_with_sink<W, F, T>(request: TestRequest, sink: W, handler: F) -> (String, T)
where
    W: ResponseSink,
    F: FnOnce(&mut FunctionCtx<Cursor<Vec<u8>>, W>) -> T,
{
    init_test_tracing();

    let config = ToolkitConfig::for_mode(LogMode::Structured);
    let mut ctx = FunctionCtx::new(request.build(), sink, &config);
    let correlation_id = ctx.correlation_id().to_string();

    let outcome = handler(&mut ctx);
    (correlation_id, outcome)
}
