//! In-memory event recording for tests.
//!
//! [`EventRecorder`] is a `tracing` layer that keeps every event it sees as a
//! [`CapturedEvent`]. Unit tests scope it to a closure with [`capture_logs`];
//! the integration harness installs one globally and filters by correlation id.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn message(&self) -> &str {
        self.field("message").unwrap_or_default()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.field("correlation_id")
    }

    pub fn is_fatal(&self) -> bool {
        self.field("fatal") == Some("true")
    }
}

/// Cloning shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded events carrying `correlation_id` as a structured field.
    pub fn events_for(&self, correlation_id: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.correlation_id() == Some(correlation_id))
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for EventRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                level: *event.metadata().level(),
                fields: fields.0,
            });
    }
}

/// Renders every field the way a reader would expect to compare it: strings
/// unquoted, numbers and booleans through `Display`.
#[derive(Default)]
struct FieldCollector(Vec<(String, String)>);

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        self.0.push((field.name().to_string(), value));
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let recorder = EventRecorder::new();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());

    let out = tracing::subscriber::with_default(subscriber, f);
    (out, recorder.events())
}
