use fnkit_core::ctx::{FatalError, FunctionCtx, ResponseSink};
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;

#[derive(Debug, Serialize)]
struct EchoReply {
    method: String,
    path: String,
    greeting: String,
    user_agent: String,
    body: Value,
}

/// Echo the request back inside a success envelope.
///
/// `?status=NNN` answers with an error envelope carrying that status instead,
/// and a body that is present but not JSON is rejected with 400.
pub fn handle<B: Read, W: ResponseSink>(ctx: &mut FunctionCtx<B, W>) -> Result<(), FatalError> {
    ctx.info("Started!");

    if ctx.has_query_parameter("status") {
        let requested = ctx.query_parameter("status");
        return match requested.parse::<u16>().ok().and_then(|c| StatusCode::from_u16(c).ok()) {
            Some(status) => ctx.fail(status, "Failure requested by caller"),
            None => ctx.fail(StatusCode::BAD_REQUEST, "status must be a valid HTTP status code"),
        };
    }

    let raw = match ctx.read_body() {
        Ok(raw) => raw,
        Err(err) => {
            return ctx.report_error(StatusCode::BAD_REQUEST, Some(&err), "Could not read request body");
        }
    };

    let body = if raw.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&raw) {
            Ok(value) => value,
            Err(err) => {
                return ctx.report_error(
                    StatusCode::BAD_REQUEST,
                    Some(&err),
                    "Request body must be valid JSON",
                );
            }
        }
    };

    let name = match ctx.query_parameter("name") {
        name if name.is_empty() => "world".to_string(),
        name => name,
    };
    ctx.debugf(format_args!("greeting {name}"));

    let reply = EchoReply {
        method: ctx.method().to_string(),
        path: ctx.uri().path().to_string(),
        greeting: format!("Hello, {name}!"),
        user_agent: ctx.header("user-agent").to_string(),
        body,
    };

    ctx.write_json(&reply)
}
