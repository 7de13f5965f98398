//! Scoped timing of initialization stages.
//!
//! An [`InitTimer`] logs `START` when created and `FINISHED` when
//! dropped, so a stage is closed on every exit path: normal return,
//! `?` propagation, or unwinding. Nested timers indent their output.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

/// One timed scope, in the order scopes were opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingEntry {
    pub name: &'static str,
    pub depth: usize,
    /// `None` while the scope is still open.
    pub elapsed: Option<Duration>,
}

/// Collects the scopes of the timers that record into it.
///
/// Assembly runs on one thread, so the log is not `Send`.
#[derive(Debug, Clone, Default)]
pub struct TimingLog {
    entries: Rc<RefCell<Vec<TimingEntry>>>,
}

impl TimingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<TimingEntry> {
        self.entries.borrow().clone()
    }

    fn open(&self, name: &'static str, depth: usize) -> usize {
        let mut entries = self.entries.borrow_mut();
        entries.push(TimingEntry {
            name,
            depth,
            elapsed: None,
        });
        entries.len() - 1
    }

    fn close(&self, slot: usize, elapsed: Duration) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(slot) {
            entry.elapsed = Some(elapsed);
        }
    }
}

/// Guard timing one initialization stage.
#[must_use = "the stage is timed until the guard is dropped"]
#[derive(Debug)]
pub struct InitTimer {
    name: &'static str,
    depth: usize,
    start: Instant,
    slot: Option<(TimingLog, usize)>,
}

impl InitTimer {
    /// Start timing `name`.
    pub fn new(name: &'static str) -> Self {
        Self::start(name, None)
    }

    /// Start timing `name`, also recording the scope in `log`.
    pub fn recording(name: &'static str, log: &TimingLog) -> Self {
        Self::start(name, Some(log))
    }

    fn start(name: &'static str, sink: Option<&TimingLog>) -> Self {
        let depth = NESTING.with(|n| {
            let depth = n.get();
            n.set(depth + 1);
            depth
        });
        log::debug!("{:indent$}START: {name}", "", indent = depth * 2);
        Self {
            name,
            depth,
            start: Instant::now(),
            slot: sink.map(|sink| (sink.clone(), sink.open(name, depth))),
        }
    }

    /// Number of timers currently open on this thread.
    pub fn depth() -> usize {
        NESTING.with(Cell::get)
    }
}

impl Drop for InitTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        NESTING.with(|n| n.set(n.get().saturating_sub(1)));
        log::debug!(
            "{:indent$}FINISHED: {} ({} us)",
            "",
            self.name,
            elapsed.as_micros(),
            indent = self.depth * 2
        );
        if let Some((sink, slot)) = self.slot.take() {
            sink.close(slot, elapsed);
        }
    }
}
