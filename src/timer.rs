//! Single-threaded deferred tasks with cancellable handles.
//!
//! The queue has its own clock, measured as a `Duration` since the queue was
//! created. Tests drive it with [`TimerQueue::advance`]. A host run loop
//! installs a [`ClockSource`] so deadlines are stamped from wall-clock time,
//! and a [`Waker`] so it can arm a one-shot native timer for
//! [`TimerQueue::next_deadline`] and call [`TimerQueue::run_due`] when it
//! fires. Nothing here sleeps or spawns.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Host time on the queue's scale.
pub type ClockSource = Rc<dyn Fn() -> Duration>;

/// Told the earliest live deadline whenever it may have changed.
pub type Waker = Rc<dyn Fn(Option<Duration>)>;

#[derive(Debug, Default)]
struct TimerSlot {
    cancelled: Cell<bool>,
    fired: Cell<bool>,
}

/// Handle to one scheduled task.
///
/// Dropping the handle does not cancel the task; call
/// [`cancel`](Self::cancel) explicitly.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    slot: Rc<TimerSlot>,
    deadline: Duration,
}

impl TimerHandle {
    /// Prevent the task from ever running. Idempotent; a no-op once fired.
    pub fn cancel(&self) {
        self.slot.cancelled.set(true);
    }

    /// True while the task is neither cancelled nor fired.
    pub fn is_pending(&self) -> bool {
        !self.slot.cancelled.get() && !self.slot.fired.get()
    }

    /// Queue time at which the task is due.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

struct Entry {
    deadline: Duration,
    seq: u64,
    slot: Rc<TimerSlot>,
    task: Task,
}

struct QueueInner {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    entries: RefCell<Vec<Entry>>,
    clock: RefCell<Option<ClockSource>>,
    waker: RefCell<Option<Waker>>,
    running: Cell<bool>,
}

/// Shared handle to a timer queue. Clones refer to the same queue.
#[derive(Clone)]
pub struct TimerQueue {
    inner: Rc<QueueInner>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(QueueInner {
                now: Cell::new(Duration::ZERO),
                next_seq: Cell::new(0),
                entries: RefCell::new(Vec::new()),
                clock: RefCell::new(None),
                waker: RefCell::new(None),
                running: Cell::new(false),
            }),
        }
    }

    /// Current queue time.
    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Follow host time. Until the next advance, `schedule` stamps
    /// deadlines from `clock` instead of the last advanced-to time.
    pub fn set_clock(&self, clock: Option<ClockSource>) {
        *self.inner.clock.borrow_mut() = clock;
    }

    pub fn set_waker(&self, waker: Option<Waker>) {
        *self.inner.waker.borrow_mut() = waker;
    }

    /// Run `task` once, `delay` after the current queue time.
    pub fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        if !self.inner.running.get() {
            self.sync_clock();
        }
        let deadline = self.now() + delay;
        let seq = self.inner.next_seq.get();
        self.inner.next_seq.set(seq + 1);

        let slot = Rc::new(TimerSlot::default());
        let cancelled: Vec<Entry> = {
            let mut entries = self.inner.entries.borrow_mut();
            let (live, cancelled) = std::mem::take(&mut *entries)
                .into_iter()
                .partition(|e| !e.slot.cancelled.get());
            *entries = live;
            entries.push(Entry {
                deadline,
                seq,
                slot: Rc::clone(&slot),
                task,
            });
            cancelled
        };
        // Cancelled tasks are dropped outside the borrow; their captures may
        // schedule again from a destructor.
        drop(cancelled);

        if !self.inner.running.get() {
            self.wake();
        }
        TimerHandle { slot, deadline }
    }

    /// Number of tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.inner
            .entries
            .borrow()
            .iter()
            .filter(|e| !e.slot.cancelled.get())
            .count()
    }

    /// Deadline of the earliest live task, for hosts that sleep until it.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .entries
            .borrow()
            .iter()
            .filter(|e| !e.slot.cancelled.get())
            .map(|e| e.deadline)
            .min()
    }

    /// Advance the clock by `by`, running every task that comes due.
    pub fn advance(&self, by: Duration) -> usize {
        self.advance_to(self.now() + by)
    }

    /// Advance the clock to `target`, running due tasks in deadline order
    /// (ties in scheduling order). Tasks scheduled by a running task that
    /// fall due before `target` run in the same call. The clock never moves
    /// backwards. Returns the number of tasks run.
    pub fn advance_to(&self, target: Duration) -> usize {
        let outer = !self.inner.running.replace(true);
        let mut ran = 0;
        while let Some(entry) = self.pop_due(target) {
            if entry.deadline > self.now() {
                self.inner.now.set(entry.deadline);
            }
            if entry.slot.cancelled.get() {
                continue;
            }
            entry.slot.fired.set(true);
            trace!(deadline = ?entry.deadline, "timer fired");
            (entry.task)();
            ran += 1;
        }
        if target > self.now() {
            self.inner.now.set(target);
        }
        if outer {
            self.inner.running.set(false);
            self.wake();
        }
        ran
    }

    /// Run every task due at the clock source's current time. Without a
    /// clock source this only runs tasks due at `now()`.
    pub fn run_due(&self) -> usize {
        let clock = self.inner.clock.borrow().clone();
        let target = clock.map_or(self.now(), |clock| clock());
        self.advance_to(target)
    }

    fn sync_clock(&self) {
        let clock = self.inner.clock.borrow().clone();
        if let Some(clock) = clock {
            let host_now = clock();
            if host_now > self.now() {
                self.inner.now.set(host_now);
            }
        }
    }

    fn wake(&self) {
        let waker = self.inner.waker.borrow().clone();
        if let Some(waker) = waker {
            waker(self.next_deadline());
        }
    }

    fn pop_due(&self, target: Duration) -> Option<Entry> {
        let mut entries = self.inner.entries.borrow_mut();
        let idx = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= target)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(i, _)| i)?;
        Some(entries.remove(idx))
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}
