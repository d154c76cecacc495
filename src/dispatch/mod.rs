//! Staggered launch of concurrent request slots.
mod stagger;


use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{error, info};

use crate::domain::RequestOutcome;

pub use stagger::StaggerRange;

/// One logical request slot. Implementations must turn every failure they
/// know about into an outcome; anything that escapes (a panic) is caught by
/// [`dispatch`] and recorded for that slot only.
#[async_trait]
pub trait SlotRunner: Send + Sync + 'static {
    async fn run(&self, index: usize) -> RequestOutcome;
}

/// Launches `count` slots (indices `1..=count`), waiting a delay drawn from
/// `stagger` between consecutive launches, and returns their outcomes in
/// launch order.
///
/// Slots run concurrently once started; the stagger is measured from the
/// previous launch, not from its completion.
pub async fn dispatch<R>(runner: Arc<R>, count: usize, stagger: StaggerRange) -> Vec<RequestOutcome>
where
    R: SlotRunner + ?Sized,
{
    let mut handles = Vec::with_capacity(count);
    for index in 1..=count {
        if index > 1 {
            let delay = stagger.sample();
            info!(
                "Waiting {:.2}s before launching request #{}",
                delay.as_secs_f64(),
                index
            );
            sleep(delay).await;
        }
        info!("Launching request #{}", index);
        let runner = Arc::clone(&runner);
        let handle = tokio::spawn(async move { runner.run(index).await });
        handles.push((index, handle));
    }

    info!("All {} requests launched, waiting for completion", count);

    let mut outcomes = Vec::with_capacity(count);
    for (index, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                error!("Request #{} failed unexpectedly: {}", index, err);
                outcomes.push(RequestOutcome::unexpected(index, &err.to_string()));
            }
        }
    }
    outcomes
}
