//! Run-scoped conversion counters

/// Immutable snapshot of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub converted: usize,
    pub skipped: usize,
    pub files_processed: usize,
}

/// Tallies one run; a fresh tracker starts every counter at zero
#[derive(Debug, Default)]
pub struct ConversionTracker {
    stats: ConversionStats,
}

impl ConversionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_converted(&mut self) {
        self.stats.converted += 1;
    }

    pub fn increment_skipped(&mut self) {
        self.stats.skipped += 1;
    }

    pub fn increment_files_processed(&mut self) {
        self.stats.files_processed += 1;
    }

    pub fn stats(&self) -> ConversionStats {
        self.stats
    }
}
