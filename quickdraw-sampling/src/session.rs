//! The sleep-then-collect loop.

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::cadence::Cadence;
use crate::surface::PickSurface;

/// Drive one collection run: for every duration in the cadence, sleep, then
/// attempt exactly one pick.
///
/// Waiting and collecting never overlap; this is one logical actor. A failed
/// tick is dropped, not retried, and still consumes its slot of the budget,
/// so the surface is invoked exactly as many times as the cadence planned.
/// Results accumulate on the surface; the loop itself returns nothing.
pub async fn run_session<S, R>(surface: &mut S, cadence: Cadence<R>)
where
    S: PickSurface,
    R: Rng,
{
    let planned = cadence.remaining();
    let mut ticks = 0u32;
    let mut collected = 0u32;

    for wait in cadence {
        sleep(wait).await;
        ticks += 1;

        match surface.collect_pick().await {
            Some(sample) => {
                collected += 1;
                debug!(
                    target: "sampling.session",
                    tick = ticks,
                    numbers = ?sample.numbers(),
                    "pick collected"
                );
            }
            None => {
                warn!(target: "sampling.session", tick = ticks, "pick failed; tick dropped");
            }
        }
    }

    info!(
        target: "sampling.session",
        planned,
        ticks,
        collected,
        "collection run complete"
    );
}
