//! Countdown engine background task

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tracing::{error, info};

use crate::state::{AppState, Intent};

/// Time between two countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that ticks every timer once per period for the life of the process
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut interval = interval(TICK_PERIOD);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        if let Err(e) = state.submit(Intent::Tick).await {
            error!("Countdown tick failed: {}", e);
        }
    }
}
