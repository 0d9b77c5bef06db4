// src/session/countdown.rs

use std::sync::{Arc, atomic::Ordering};
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::{ActiveAttempt, AttemptRegistry};

/// How often a timed-out attempt is submitted before it is given up on.
const FORCED_SUBMIT_TRIES: u32 = 3;

/// Ticks once per second until the attempt closes or its time runs out.
/// Running out forces a submission through the same exactly-once path as a
/// manual submit.
pub(super) async fn run(registry: AttemptRegistry, attempt: Arc<ActiveAttempt>) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if attempt.is_closed() {
            return;
        }

        let left = attempt.remaining_secs.fetch_sub(1, Ordering::SeqCst) - 1;
        if left <= 0 {
            break;
        }
    }

    tracing::info!("Time is up for attempt {}, submitting", attempt.id);
    for tries in 1..=FORCED_SUBMIT_TRIES {
        match registry.finalize(&attempt).await {
            Ok(_) => return,
            Err(e) => tracing::error!(
                "Forced submission of attempt {} failed ({}/{}): {:?}",
                attempt.id,
                tries,
                FORCED_SUBMIT_TRIES,
                e
            ),
        }
        if tries < FORCED_SUBMIT_TRIES {
            ticker.tick().await;
        }
    }

    registry.expire(&attempt).await;
}
