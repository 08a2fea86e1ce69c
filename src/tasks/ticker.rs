//! Recurring tick task for the session timer

use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// Call `on_tick` once per `period` until it returns `false`.
///
/// The first call happens one full period after the task starts.
pub async fn tick_task<F>(period: Duration, mut on_tick: F)
where
    F: FnMut() -> bool,
{
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;
        if !on_tick() {
            debug!("Tick task no longer current, stopping");
            break;
        }
    }
}
