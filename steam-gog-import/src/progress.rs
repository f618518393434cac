//! Progress callbacks for indexing, importing and matching.

/// Receives progress from the long-running ETL steps.
pub trait ImportProgress {
    /// One product or game handled; `current` is 1-based.
    fn on_item(&self, current: usize, total: usize, name: &str);

    /// A step starts, e.g. "Indexing gogdb_2024-03-01 (91234 products)".
    fn on_phase(&self, message: &str);

    /// The step finished; `message` summarizes its counts.
    fn on_complete(&self, message: &str);
}

/// Discards every update.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_item(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// Reports through the `log` crate, one line per `every` items.
///
/// For output that is not a terminal, where a redrawn bar would be lost.
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn every(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }

    fn should_report(&self, current: usize, total: usize) -> bool {
        current.is_multiple_of(self.every) || current == total
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::every(1000)
    }
}

impl ImportProgress for LogProgress {
    fn on_item(&self, current: usize, total: usize, _name: &str) {
        if self.should_report(current, total) {
            log::info!("  [{current}/{total}]");
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{message}");
    }

    fn on_complete(&self, message: &str) {
        log::info!("{message}");
    }
}
