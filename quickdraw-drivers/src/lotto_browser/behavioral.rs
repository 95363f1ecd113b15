use rand::rngs::OsRng;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
/// Produces human-like delays around page interactions to reduce automation
/// signals.
pub struct BehavioralEngine {}

impl BehavioralEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// Sleep for a random duration between `min` and `max` milliseconds.
    pub async fn random_delay(&self, min: u64, max: u64) {
        let mut rng = OsRng;
        let ms = rng.gen_range(min..=max);
        sleep(Duration::from_millis(ms)).await;
    }

    /// Pause after a click long enough for the field to re-render its marks.
    pub async fn settle_after_click(&self) {
        self.random_delay(800, 1400).await;
    }
}

impl Default for BehavioralEngine {
    fn default() -> Self {
        Self::new()
    }
}
