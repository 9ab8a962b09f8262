use std::time::Duration;

use tracing::info;

/// Fixed-rate pause between batches of pages.
///
/// Every `pages_per_batch` completed pages the throttler sleeps for `pause`
/// and starts counting again. It does not look at rate-limit headers.
#[derive(Debug, Clone)]
pub struct BatchThrottler {
    pages_per_batch: u32,
    pause: Duration,
    pages_in_batch: u32,
}

impl BatchThrottler {
    pub const DEFAULT_PAGES_PER_BATCH: u32 = 10;
    pub const DEFAULT_PAUSE: Duration = Duration::from_secs(2);

    pub fn new(pages_per_batch: u32, pause: Duration) -> Self {
        Self {
            pages_per_batch: pages_per_batch.max(1),
            pause,
            pages_in_batch: 0,
        }
    }

    /// Records a finished page and sleeps if it closed a batch.
    ///
    /// `has_more` is false after the last page; there is nothing left to pace then,
    /// so the counter advances without sleeping.
    pub async fn page_completed(&mut self, has_more: bool) -> bool {
        self.pages_in_batch += 1;
        if self.pages_in_batch < self.pages_per_batch {
            return false;
        }

        self.pages_in_batch = 0;
        if !has_more || self.pause.is_zero() {
            return false;
        }

        info!(
            "Processed {} pages in this batch, pausing for {:?}",
            self.pages_per_batch, self.pause
        );
        tokio::time::sleep(self.pause).await;
        true
    }
}

impl Default for BatchThrottler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGES_PER_BATCH, Self::DEFAULT_PAUSE)
    }
}
