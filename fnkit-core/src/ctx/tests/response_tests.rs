use crate::config::ToolkitConfig;
use crate::ctx::{
    ErrorEnvelope, FatalError, FunctionCtx, JSON_CONTENT_TYPE, RecordedResponse, ResponseSink,
    StreamResponse, SuccessEnvelope,
};
use crate::logging::LogMode;
use crate::logging::capture::capture_logs;
use crate::test_helpers::{ctx, ctx_with_mode, request};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::io::{self, Cursor};
use tracing::Level;

//-----------------------------------------------------------------------------
// Failing collaborators
//-----------------------------------------------------------------------------

/// Sink whose body writes always fail, the way a dropped client connection does.
#[derive(Default)]
struct BrokenSink {
    headers: HeaderMap,
}

impl ResponseSink for BrokenSink {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, _status: StatusCode) -> io::Result<()> {
        Ok(())
    }

    fn write_body(&mut self, _body: &[u8]) -> io::Result<()> {
        Err(io::Error::other("test Error"))
    }
}

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("cannot encode this"))
    }
}

type BrokenCtx = FunctionCtx<Cursor<Vec<u8>>, BrokenSink>;

fn broken_ctx() -> BrokenCtx {
    FunctionCtx::new(
        request("GET", "/", ""),
        BrokenSink::default(),
        &ToolkitConfig::for_mode(LogMode::Structured),
    )
}

//-----------------------------------------------------------------------------
// Success responses
//-----------------------------------------------------------------------------
#[test]
fn write_raw_sends_status_200_with_exact_content_type_and_bytes() {
    // Arrange
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);

    // Act
    ctx.write_raw("application/octet-stream", &[1, 2, 3, 4, 5])
        .unwrap();
    drop(ctx);

    // Assert
    assert_eq!(recorder.status(), Some(StatusCode::OK));
    assert_eq!(
        recorder.header("content-type"),
        Some("application/octet-stream")
    );
    assert_eq!(recorder.header("content-length"), Some("5"));
    assert_eq!(recorder.body(), &[1, 2, 3, 4, 5]);
}

#[test]
fn write_raw_logs_completion_at_info() {
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);

    let (result, events) = capture_logs(|| ctx.write_raw("text/plain", b"ok"));

    assert!(result.is_ok());
    assert!(
        events
            .iter()
            .any(|e| e.level == Level::INFO && e.message() == "Finished processing the request")
    );
}

#[test]
fn write_raw_rejects_an_invalid_content_type() {
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);

    let result = ctx.write_raw("text/plain\n", b"ok");
    drop(ctx);

    assert!(matches!(result, Err(FatalError::InvalidContentType(_))));
    assert_eq!(recorder.status(), None);
}

#[test]
fn write_json_wraps_data_in_a_success_envelope() {
    // Arrange
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);
    let id = ctx.correlation_id().to_string();
    let data = json!({"Foo": "Bar", "Heh": 1234});

    // Act
    ctx.write_json(&data).unwrap();
    drop(ctx);

    // Assert
    assert_eq!(recorder.status(), Some(StatusCode::OK));
    assert_eq!(recorder.header("content-type"), Some(JSON_CONTENT_TYPE));
    assert_eq!(recorder.header("x-correlation-id"), Some(id.as_str()));

    let envelope: SuccessEnvelope<Value> = recorder.body_json().unwrap();
    assert_eq!(envelope.correlation_id, id);
    assert_eq!(envelope.data, Some(data));
}

#[test]
fn write_json_serializes_structs_in_field_order() {
    #[derive(Serialize)]
    struct Pair {
        foo: &'static str,
        bar: &'static str,
    }

    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);

    ctx.write_json(&Pair {
        foo: "foo foo",
        bar: "bar bar",
    })
    .unwrap();
    drop(ctx);

    let body = String::from_utf8(recorder.body().to_vec()).unwrap();
    assert!(body.contains(r#""data":{"foo":"foo foo","bar":"bar bar"}"#));
}

#[test]
fn write_ok_omits_the_data_field() {
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);
    let id = ctx.correlation_id().to_string();

    ctx.write_ok().unwrap();
    drop(ctx);

    let body: Value = recorder.body_json().unwrap();
    assert_eq!(body, json!({ "correlationId": id }));
}

//-----------------------------------------------------------------------------
// Error responses
//-----------------------------------------------------------------------------
#[test]
fn report_error_writes_status_and_error_envelope() {
    // Arrange
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("POST", "/", ""), &mut recorder);
    let id = ctx.correlation_id().to_string();
    let cause = io::Error::other("Test Error");

    // Act
    let (result, events) = capture_logs(|| {
        ctx.report_error(StatusCode::BAD_REQUEST, Some(&cause), "Test Error Message")
    });
    drop(ctx);

    // Assert
    assert!(result.is_ok());
    assert_eq!(recorder.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(recorder.header("content-type"), Some(JSON_CONTENT_TYPE));

    let envelope: ErrorEnvelope = recorder.body_json().unwrap();
    assert_eq!(
        envelope,
        ErrorEnvelope {
            correlation_id: id,
            error_code: 400,
            message: "Test Error Message".to_string(),
        }
    );

    let line = events
        .iter()
        .find(|e| e.level == Level::ERROR)
        .expect("error line");
    assert!(line.message().contains("400"));
    assert!(line.message().contains("Test Error Message"));
    assert!(line.message().contains("Test Error"));
}

#[test]
fn cause_never_reaches_the_wire() {
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);
    let cause = io::Error::other("db password rejected");

    ctx.report_error(StatusCode::INTERNAL_SERVER_ERROR, Some(&cause), "try later")
        .unwrap();
    drop(ctx);

    let body = String::from_utf8(recorder.body().to_vec()).unwrap();
    assert!(!body.contains("db password rejected"));
}

#[test]
fn fail_matches_report_error_without_a_cause() {
    // Arrange
    let mut failed = RecordedResponse::new();
    let mut reported = RecordedResponse::new();
    let mut fail_ctx = ctx(request("GET", "/", ""), &mut failed);
    let mut report_ctx = ctx(request("GET", "/", ""), &mut reported);
    let fail_id = fail_ctx.correlation_id().to_string();
    let report_id = report_ctx.correlation_id().to_string();

    // Act
    let (_, fail_events) = capture_logs(|| fail_ctx.fail(StatusCode::NOT_FOUND, "no such order"));
    let (_, report_events) = capture_logs(|| {
        report_ctx.report_error(StatusCode::NOT_FOUND, None, "no such order")
    });
    drop(fail_ctx);
    drop(report_ctx);

    // Assert
    assert_eq!(failed.status(), reported.status());
    let fail_body: Value = failed.body_json().unwrap();
    let report_body: Value = reported.body_json().unwrap();
    assert_eq!(fail_body["errorCode"], report_body["errorCode"]);
    assert_eq!(fail_body["message"], report_body["message"]);
    assert_eq!(fail_body["correlationId"], json!(fail_id));
    assert_eq!(report_body["correlationId"], json!(report_id));
    assert_eq!(fail_events[0].message(), report_events[0].message());
    assert_eq!(
        fail_events[0].message(),
        "Request failed (error code 404) \"no such order\""
    );
}

#[test]
fn empty_error_message_is_omitted_from_the_envelope() {
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);

    ctx.fail(StatusCode::UNAUTHORIZED, "").unwrap();
    drop(ctx);

    let body: Value = recorder.body_json().unwrap();
    assert!(body.get("message").is_none());
    assert_eq!(body["errorCode"], json!(401));
}

#[test]
fn custom_headers_survive_until_the_response_is_written() {
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx_with_mode(request("GET", "/", ""), &mut recorder, LogMode::Console);

    ctx.set_response_header(
        HeaderName::from_static("cache-control"),
        HeaderValue::from_static("no-store"),
    );
    ctx.write_ok().unwrap();
    drop(ctx);

    assert_eq!(recorder.header("cache-control"), Some("no-store"));
}

//-----------------------------------------------------------------------------
// Fatal paths
//-----------------------------------------------------------------------------
#[test]
fn failed_write_is_fatal_for_every_writer() {
    let writers: [(&str, fn(&mut BrokenCtx) -> Result<(), FatalError>); 4] = [
        ("write_raw", |ctx| ctx.write_raw("application/json", b"{}")),
        ("write_json", |ctx| ctx.write_json(&json!({"foo": "bar"}))),
        ("report_error", |ctx| {
            ctx.report_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&io::Error::other("test Error")),
                "test Error",
            )
        }),
        ("fail", |ctx| ctx.fail(StatusCode::INTERNAL_SERVER_ERROR, "test Error")),
    ];

    for (name, write) in writers {
        // Arrange
        let mut ctx = broken_ctx();

        // Act
        let (result, events) = capture_logs(|| write(&mut ctx));

        // Assert
        let err = result.expect_err(name);
        assert!(matches!(err, FatalError::Send(_)), "{name}");
        assert!(
            err.to_string()
                .contains("Could not send response to user: test Error"),
            "{name}: {err}"
        );

        let fatal = events
            .iter()
            .find(|e| e.is_fatal())
            .unwrap_or_else(|| panic!("{name} should log a fatal line"));
        assert_eq!(fatal.level, Level::ERROR);
        assert!(fatal.message().contains("Could not send response to user"));
    }
}

#[test]
fn serialization_failure_is_fatal_and_nothing_is_sent() {
    let mut recorder = RecordedResponse::new();
    let mut ctx = ctx(request("GET", "/", ""), &mut recorder);

    let (result, events) = capture_logs(|| ctx.write_json(&Unserializable));
    drop(ctx);

    let err = result.unwrap_err();
    assert!(matches!(err, FatalError::Serialize(_)));
    assert!(err.to_string().contains("cannot encode this"));
    assert!(events.iter().any(|e| e.is_fatal()));
    assert_eq!(recorder.status(), None);
    assert!(recorder.body().is_empty());
}

#[test]
fn stream_response_write_failure_is_fatal() {
    struct ClosedSocket;

    impl io::Write for ClosedSocket {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let mut ctx = FunctionCtx::new(
        request("GET", "/", ""),
        StreamResponse::new(ClosedSocket),
        &ToolkitConfig::default(),
    );

    let err = ctx.write_ok().unwrap_err();

    assert!(err.to_string().contains("broken pipe"));
}
