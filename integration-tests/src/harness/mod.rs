mod function;
pub mod tracing;

pub use function::{Invocation, TestRequest, invoke, invoke_with_sink};
pub use self::tracing::{events_for, init_test_tracing};
pub use fnkit_core::logging::capture::CapturedEvent;
