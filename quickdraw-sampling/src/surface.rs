//! Capability seam between the collection loop and whatever produces picks.

use async_trait::async_trait;
use quickdraw_common::Sample;

/// Something that can produce one quick-tip pick on demand.
///
/// The single operation attempts one collection and reports the marked
/// numbers, or `None` when the attempt failed. Implementations swallow and
/// log their own failures; errors never cross this boundary. Each successful
/// pick is appended to the sample set the implementation owns before it is
/// returned, so the caller of the loop reads accumulated results off the
/// concrete surface afterwards.
#[async_trait]
pub trait PickSurface: Send {
    /// Attempt one collection.
    async fn collect_pick(&mut self) -> Option<Sample>;
}
