use chrono::{DateTime, Utc};

/// Time source for the engine. Injected so evaluations are deterministic in
/// tests and so the adaptive weekday factor is an explicit input, not an
/// ambient read.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
