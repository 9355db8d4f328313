//! Periodic retention sweep.
//!
//! One background task ticks at `gateway.housekeeping_interval_ms` and sweeps
//! the store under the same lock the handlers use, so a sweep never overlaps
//! ingestion or a chart build.

use std::time::Duration;

use statdeck_core::Timestamp;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::app_state::AppState;

pub fn spawn(state: AppState) -> JoinHandle<()> {
    let period = state.cfg().gateway.housekeeping_interval();
    spawn_every(state, period)
}

pub fn spawn_every(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately; the store was just seeded
        ticker.tick().await;

        loop {
            ticker.tick().await;
            state.house_keeping(Timestamp::now());
        }
    })
}
