use fnkit_core::logging::capture::{CapturedEvent, EventRecorder};
use std::sync::{Once, OnceLock};
use tracing_subscriber::layer::SubscriberExt;

/// Process-wide recorder shared by every test in the binary.
pub fn recorder() -> &'static EventRecorder {
    static RECORDER: OnceLock<EventRecorder> = OnceLock::new();
    RECORDER.get_or_init(EventRecorder::new)
}

pub fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::registry().with(recorder().clone());

        tracing::subscriber::set_global_default(subscriber)
            .expect("failed to set global tracing subscriber");
    });
}

/// Events tagged with one correlation id. Tests run in parallel against the
/// same global subscriber, so this is how each test finds its own lines.
pub fn events_for(correlation_id: &str) -> Vec<CapturedEvent> {
    recorder().events_for(correlation_id)
}
