use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Seconds since the epoch, the format log collectors on the platforms expect.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct UnixSeconds;

impl FormatTime for UnixSeconds {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Utc::now().timestamp())
    }
}
