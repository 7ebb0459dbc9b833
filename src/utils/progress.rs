//! Progress tracking for the download loop.
//!
//! The counter only decides *when* a checkpoint is due; logging is left to
//! the caller.
//!
//! # Usage
//!
//! ```
//! use fact_search::utils::ProgressCounter;
//!
//! let mut progress = ProgressCounter::new(3);
//! assert_eq!(progress.record(true), None);
//! assert_eq!(progress.record(false), None);
//! assert_eq!(progress.record(true), Some((2, 3)));
//! ```

/// Report every this many successful downloads
pub const REPORT_INTERVAL: usize = 10;

/// Counts processed and successful items of a run with a known size
#[derive(Debug, Clone)]
pub struct ProgressCounter {
    /// Number of items in the run
    total: usize,

    /// Items processed so far, successful or not
    processed: usize,

    /// Items that succeeded
    succeeded: usize,
}

impl ProgressCounter {
    /// Create a counter for `total` items
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            succeeded: 0,
        }
    }

    /// Record the outcome of the next item.
    ///
    /// Returns `Some((succeeded, total))` when a checkpoint should be
    /// reported: the success count just reached a multiple of
    /// [`REPORT_INTERVAL`], or this was the last item.
    pub fn record(&mut self, success: bool) -> Option<(usize, usize)> {
        self.processed += 1;
        if success {
            self.succeeded += 1;
        }

        let interval_hit = success && self.succeeded % REPORT_INTERVAL == 0;
        let finished = self.processed == self.total;
        if interval_hit || finished {
            Some((self.succeeded, self.total))
        } else {
            None
        }
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }
}
