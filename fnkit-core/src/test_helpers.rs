use crate::config::ToolkitConfig;
use crate::ctx::{FunctionCtx, RecordedResponse};
use crate::logging::LogMode;
use http::Request;
use http::header::CONTENT_LENGTH;
use std::io::Cursor;

//-----------------------------------------------------------------------------
// Request/context builders
//-----------------------------------------------------------------------------
pub type TestCtx<'a> = FunctionCtx<Cursor<Vec<u8>>, &'a mut RecordedResponse>;

pub fn request(method: &str, uri: &str, body: impl Into<Vec<u8>>) -> Request<Cursor<Vec<u8>>> {
    let body = body.into();
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_LENGTH, body.len().to_string())
        .body(Cursor::new(body))
        .unwrap()
}

pub fn ctx_with_mode<'a>(
    req: Request<Cursor<Vec<u8>>>,
    recorder: &'a mut RecordedResponse,
    mode: LogMode,
) -> TestCtx<'a> {
    FunctionCtx::new(req, recorder, &ToolkitConfig::for_mode(mode))
}

pub fn ctx<'a>(req: Request<Cursor<Vec<u8>>>, recorder: &'a mut RecordedResponse) -> TestCtx<'a> {
    ctx_with_mode(req, recorder, LogMode::Structured)
}
