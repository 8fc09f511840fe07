use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt};

/// Time source injected into the arbiter and the tracker.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Resolves once `duration` has elapsed.
    fn after(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn after(&self, duration: Duration) -> BoxFuture<'static, ()> {
        // negative durations fire immediately
        let duration = duration.to_std().unwrap_or_default();

        tokio::time::sleep(duration).boxed()
    }
}

#[tokio::test]
async fn system_clock_after_fires() {
    let clock = SystemClock;
    let before = clock.now();

    clock.after(Duration::milliseconds(5)).await;

    assert!(clock.now() - before >= Duration::milliseconds(5));
}
