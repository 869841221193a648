use crate::ctx::{
    CORRELATION_ID_HEADER, ErrorEnvelope, FatalError, FunctionCtx, ResponseSink, SuccessEnvelope,
};
use crate::logging::LogLevel;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use std::error::Error as StdError;
use std::panic::Location;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Response API
///
/// Every writer is terminal: it sets headers, writes the status and the body,
/// and returns. A [`FatalError`] is logged with `fatal = true` before it is
/// handed back.
impl<B, W: ResponseSink> FunctionCtx<B, W> {
    pub fn set_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response.headers_mut().insert(name, value);
    }

    /// 200 with an arbitrary body and content type.
    #[track_caller]
    pub fn write_raw(&mut self, content_type: &str, body: &[u8]) -> Result<(), FatalError> {
        let caller = Location::caller();
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|_| FatalError::InvalidContentType(content_type.to_string()));
        let content_type = self.fatal_on_err(caller, content_type)?;

        self.write_raw_at(caller, content_type, body)
    }

    /// 200 with `{"correlationId": .., "data": data}`.
    #[track_caller]
    pub fn write_json<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<(), FatalError> {
        self.write_success(Location::caller(), Some(data))
    }

    /// 200 with `{"correlationId": ..}` and no data.
    #[track_caller]
    pub fn write_ok(&mut self) -> Result<(), FatalError> {
        self.write_success::<()>(Location::caller(), None)
    }

    /// Error envelope with no underlying cause.
    #[track_caller]
    pub fn fail(&mut self, status: StatusCode, message: &str) -> Result<(), FatalError> {
        self.report_error_at(Location::caller(), status, None, message)
    }

    /// Error envelope with status `status`. `err` only ends up in the log line.
    #[track_caller]
    pub fn report_error(
        &mut self,
        status: StatusCode,
        err: Option<&dyn StdError>,
        message: &str,
    ) -> Result<(), FatalError> {
        self.report_error_at(Location::caller(), status, err, message)
    }

    fn write_success<T: Serialize + ?Sized>(
        &mut self,
        caller: &Location<'_>,
        data: Option<&T>,
    ) -> Result<(), FatalError> {
        self.logger
            .log(LogLevel::Info, caller, format_args!("Generating JSON response"));

        let envelope = SuccessEnvelope {
            correlation_id: self.correlation_id.to_string(),
            data,
        };
        let body = serde_json::to_vec(&envelope).map_err(FatalError::Serialize);
        let body = self.fatal_on_err(caller, body)?;

        self.write_raw_at(caller, HeaderValue::from_static(JSON_CONTENT_TYPE), &body)
    }

    fn write_raw_at(
        &mut self,
        caller: &Location<'_>,
        content_type: HeaderValue,
        body: &[u8],
    ) -> Result<(), FatalError> {
        self.logger.log(
            LogLevel::Info,
            caller,
            format_args!("Finished processing the request"),
        );

        self.send(caller, StatusCode::OK, content_type, body)
    }

    fn report_error_at(
        &mut self,
        caller: &Location<'_>,
        status: StatusCode,
        err: Option<&dyn StdError>,
        message: &str,
    ) -> Result<(), FatalError> {
        let code = status.as_u16();
        match err {
            Some(err) => self.logger.log(
                LogLevel::Error,
                caller,
                format_args!("Request failed (error code {code}) \"{message}\": {err}"),
            ),
            None => self.logger.log(
                LogLevel::Error,
                caller,
                format_args!("Request failed (error code {code}) \"{message}\""),
            ),
        }

        let envelope = ErrorEnvelope {
            correlation_id: self.correlation_id.to_string(),
            error_code: code,
            message: message.to_string(),
        };
        let body = serde_json::to_vec(&envelope).map_err(FatalError::Serialize);
        let body = self.fatal_on_err(caller, body)?;

        self.send(caller, status, HeaderValue::from_static(JSON_CONTENT_TYPE), &body)
    }

    fn send(
        &mut self,
        caller: &Location<'_>,
        status: StatusCode,
        content_type: HeaderValue,
        body: &[u8],
    ) -> Result<(), FatalError> {
        let headers = self.response.headers_mut();
        headers.insert(CONTENT_TYPE, content_type);
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        if let Ok(id) = HeaderValue::from_str(self.correlation_id.as_str()) {
            headers.insert(HeaderName::from_static(CORRELATION_ID_HEADER), id);
        }

        let sent = self
            .response
            .write_head(status)
            .and_then(|()| self.response.write_body(body))
            .map_err(FatalError::Send);

        self.fatal_on_err(caller, sent)
    }

    fn fatal_on_err<T>(
        &self,
        caller: &Location<'_>,
        result: Result<T, FatalError>,
    ) -> Result<T, FatalError> {
        result.inspect_err(|err| self.logger.fatal(caller, err))
    }
}
