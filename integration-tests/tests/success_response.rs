use fnkit_core::ctx::{JSON_CONTENT_TYPE, SuccessEnvelope};
use http::StatusCode;
use integration_tests::harness::{TestRequest, events_for, invoke};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

/// Function answering with a JSON object, the canonical happy path.
#[test]
fn ok_json_returns_success_envelope() {
    // Arrange
    let request = TestRequest::new("POST", "/")
        .header("Content-Type", "text/plain")
        .body("");

    // Act
    let inv = invoke(request, |ctx| {
        ctx.info("Started!");
        ctx.write_json(&json!({"Foo": "Bar", "Heh": 1234}))
    });

    // Assert
    assert!(inv.outcome.is_ok());
    assert_eq!(inv.response.status(), Some(StatusCode::OK));
    assert_eq!(
        inv.response.header("content-type"),
        Some(JSON_CONTENT_TYPE)
    );

    let envelope: SuccessEnvelope<Value> = inv.response.body_json().unwrap();
    assert_eq!(envelope.correlation_id, inv.correlation_id);
    assert_eq!(envelope.data, Some(json!({"Foo": "Bar", "Heh": 1234})));
}

/// Decoding the body of `write_json(v)` yields `v` back under `data`.
#[test]
fn data_round_trips_through_the_envelope() {
    let payloads = [
        json!(null),
        json!("plain string"),
        json!([1, 2, 3]),
        json!({"nested": {"list": [true, false], "n": 1.5}}),
    ];

    for payload in payloads {
        let expected = payload.clone();
        let inv = invoke(TestRequest::new("GET", "/"), move |ctx| {
            ctx.write_json(&payload)
        });

        let body: Value = inv.response.body_json().unwrap();
        assert_eq!(body["correlationId"], json!(inv.correlation_id));
        if expected.is_null() {
            // `null` data is indistinguishable from no data on the wire.
            assert!(body.get("data").is_none_or(Value::is_null));
        } else {
            assert_eq!(body["data"], expected);
        }
    }
}

/// The correlation id is echoed in a header as well as in the body.
#[test]
fn correlation_header_matches_envelope() {
    let inv = invoke(TestRequest::new("GET", "/"), |ctx| ctx.write_ok());

    assert_eq!(
        inv.response.header("x-correlation-id"),
        Some(inv.correlation_id.as_str())
    );
}

/// Raw bytes go out untouched with the caller's content type.
#[test]
fn raw_response_carries_exact_bytes() {
    let inv = invoke(TestRequest::new("GET", "/blob"), |ctx| {
        ctx.write_raw("application/octet-stream", &[1, 2, 3, 4, 5])
    });

    assert_eq!(inv.response.status(), Some(StatusCode::OK));
    assert_eq!(
        inv.response.header("content-type"),
        Some("application/octet-stream")
    );
    assert_eq!(inv.response.body(), &[1u8, 2, 3, 4, 5]);

    let finished = events_for(&inv.correlation_id)
        .into_iter()
        .any(|e| e.message() == "Finished processing the request");
    assert!(finished, "expected completion log line");
}
