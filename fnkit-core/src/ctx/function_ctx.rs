use crate::config::ToolkitConfig;
use crate::ctx::CorrelationId;
use crate::logging::{ContextLogger, LogLevel};
use http::{Method, Request, Uri};
use std::fmt;
use std::panic::Location;
use tokio_util::sync::CancellationToken;

/// Per-request context handed to a function handler.
///
/// Owns the inbound request and the outbound response sink for exactly one
/// exchange, and carries the correlation id that tags every log line and
/// response envelope produced through it. One terminal response-writing call
/// is expected per context; nothing stops a second one, but the sink decides
/// what happens then.
pub struct FunctionCtx<B, W> {
    /// Assigned once in [`FunctionCtx::new`], survives every derivation.
    pub(crate) correlation_id: CorrelationId,

    /// Replaced wholesale through [`FunctionCtx::set_logger`], never mutated.
    pub(crate) logger: ContextLogger,

    pub(crate) request: Request<B>,

    pub(crate) response: W,

    /// Deadline/cancellation signal scoped to this request.
    pub(crate) cancellation: CancellationToken,

    /// Upper bound applied by the body readers.
    pub(crate) max_body_bytes: usize,
}

/// Construction and derivation API
impl<B, W> FunctionCtx<B, W> {
    /// Bind a fresh correlation id and logger to a request/response pair.
    ///
    /// If the host put a [`CancellationToken`] into the request extensions,
    /// the context gets a child of it, so cancelling the request cancels the
    /// context but not the other way round.
    pub fn new(request: Request<B>, response: W, config: &ToolkitConfig) -> Self {
        let correlation_id = CorrelationId::generate();
        let logger = ContextLogger::new(correlation_id.clone(), config.log_mode);
        let cancellation = request
            .extensions()
            .get::<CancellationToken>()
            .map(CancellationToken::child_token)
            .unwrap_or_default();

        Self {
            correlation_id,
            logger,
            request,
            response,
            cancellation,
            max_body_bytes: config.max_body_bytes,
        }
    }

    /// Same context, different cancellation handle.
    pub fn with_cancellation(self, cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            ..self
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn logger(&self) -> &ContextLogger {
        &self.logger
    }

    pub fn set_logger(&mut self, logger: ContextLogger) {
        self.logger = logger;
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn request(&self) -> &Request<B> {
        &self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn response(&self) -> &W {
        &self.response
    }

    pub fn into_response(self) -> W {
        self.response
    }
}

/// Logging API
///
/// The plain methods report the caller's source location. Wrappers that want
/// their own caller reported instead should use [`FunctionCtx::log_at`].
impl<B, W> FunctionCtx<B, W> {
    #[track_caller]
    pub fn log(&self, level: impl Into<LogLevel>, message: &str) {
        self.logger
            .log(level.into(), Location::caller(), format_args!("{message}"));
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Formatted variant, e.g. `ctx.logf(LogLevel::Info, format_args!("user {id}"))`.
    #[track_caller]
    pub fn logf(&self, level: impl Into<LogLevel>, args: fmt::Arguments<'_>) {
        self.logger.log(level.into(), Location::caller(), args);
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Debug, args);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Info, args);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Warn, args);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Error, args);
    }

    pub fn log_at(&self, level: LogLevel, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.logger.log(level, location, args);
    }
}

impl<B, W> fmt::Debug for FunctionCtx<B, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionCtx")
            .field("correlation_id", &self.correlation_id)
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}
