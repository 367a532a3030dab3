//! Progress reporting for the link stripping pass

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripStage {
    Pages,
    Catalog,
    Complete,
}

impl fmt::Display for StripStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StripStage::Pages => write!(f, "Page Cleaning"),
            StripStage::Catalog => write!(f, "Catalog Cleaning"),
            StripStage::Complete => write!(f, "Complete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub stage: StripStage,
    /// Pages finished before this update
    pub completed: usize,
    pub total: usize,
}

impl ProgressUpdate {
    /// Emitted before page `index` (zero based) is processed
    pub fn page(index: usize, total: usize) -> Self {
        Self {
            stage: StripStage::Pages,
            completed: index,
            total,
        }
    }

    pub fn catalog(total: usize) -> Self {
        Self {
            stage: StripStage::Catalog,
            completed: total,
            total,
        }
    }

    pub fn complete(total: usize) -> Self {
        Self {
            stage: StripStage::Complete,
            completed: total,
            total,
        }
    }

    /// Whole percent, rounded down; an empty document counts as done
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.completed.min(self.total) * 100 / self.total) as u8
    }
}

/// Receives progress from the worker running the pass
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: &ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: &ProgressUpdate) {
        self(update)
    }
}

/// Discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _update: &ProgressUpdate) {}
}

/// Forwards updates to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, update: &ProgressUpdate) {
        debug!(
            "{}: {}/{} ({}%)",
            update.stage,
            update.completed,
            update.total,
            update.percent()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn percent_rounds_down_like_integer_division() {
        assert_eq!(ProgressUpdate::page(0, 3).percent(), 0);
        assert_eq!(ProgressUpdate::page(1, 3).percent(), 33);
        assert_eq!(ProgressUpdate::page(2, 3).percent(), 66);
        assert_eq!(ProgressUpdate::complete(3).percent(), 100);
    }

    #[test]
    fn empty_document_is_complete() {
        assert_eq!(ProgressUpdate::page(0, 0).percent(), 100);
    }

    #[test]
    fn closures_are_sinks() {
        let seen = Mutex::new(Vec::new());
        let sink = |u: &ProgressUpdate| seen.lock().push(u.percent());
        sink.report(&ProgressUpdate::page(1, 2));
        sink.report(&ProgressUpdate::complete(2));
        assert_eq!(*seen.lock(), vec![50, 100]);
    }
}
