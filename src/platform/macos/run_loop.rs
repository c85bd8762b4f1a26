//! Drives the timer queue from the main run loop.
//!
//! At most one one-shot NSTimer is armed, for the queue's earliest live
//! deadline. The queue re-arms it through its waker after every schedule
//! and advance, so nothing wakes the run loop while no task is pending.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use tracing::{trace, warn};

use super::bridge::{get_class, id, msg_send, AnyObject, RcBlock, Retained};
use crate::error::Result;
use crate::timer::{ClockSource, TimerQueue};

struct DriverState {
    timers: TimerQueue,
    clock: ClockSource,
    armed: RefCell<Option<Retained<AnyObject>>>,
}

impl DriverState {
    fn disarm(&self) {
        let armed = self.armed.borrow_mut().take();
        if let Some(timer) = armed {
            unsafe {
                let _: () = msg_send![&*timer, invalidate];
            }
        }
    }

    fn rearm(self: &Rc<Self>, next: Option<Duration>) {
        self.disarm();
        let Some(deadline) = next else {
            return;
        };
        let cls = match get_class("NSTimer") {
            Ok(cls) => cls,
            Err(err) => {
                warn!(error = %err, "cannot arm run loop timer");
                return;
            }
        };

        let delay = deadline.saturating_sub((self.clock)());
        let weak: Weak<DriverState> = Rc::downgrade(self);
        let block = RcBlock::new(move |_timer: id| {
            if let Some(state) = weak.upgrade() {
                state.fire();
            }
        });
        let timer: id = unsafe {
            msg_send![
                cls,
                scheduledTimerWithTimeInterval: delay.as_secs_f64(),
                repeats: false,
                block: &*block
            ]
        };
        trace!(?delay, "run loop timer armed");
        *self.armed.borrow_mut() = unsafe { Retained::retain(timer) };
    }

    fn fire(&self) {
        // A fired one-shot timer is already invalid; just release it.
        self.armed.borrow_mut().take();
        let fired = self.timers.run_due();
        trace!(fired, "run loop timer fired");
    }
}

/// Keeps a [`TimerQueue`] on wall-clock time and fires its tasks from the
/// main run loop. Detaches from the queue and invalidates its timer on drop.
pub struct RunLoopTimer {
    state: Rc<DriverState>,
}

impl RunLoopTimer {
    /// Attach to `timers`. The queue's clock follows wall-clock time from
    /// this call on.
    ///
    /// # Safety
    /// Must be called from the main thread.
    pub unsafe fn start(timers: &TimerQueue) -> Result<Self> {
        get_class("NSTimer")?;

        let origin = Instant::now();
        let offset = timers.now();
        let clock: ClockSource = Rc::new(move || offset + origin.elapsed());
        let state = Rc::new(DriverState {
            timers: timers.clone(),
            clock: Rc::clone(&clock),
            armed: RefCell::new(None),
        });

        timers.set_clock(Some(clock));
        let weak = Rc::downgrade(&state);
        timers.set_waker(Some(Rc::new(move |next: Option<Duration>| {
            if let Some(state) = weak.upgrade() {
                state.rearm(next);
            }
        })));
        state.rearm(timers.next_deadline());

        Ok(Self { state })
    }

    /// True while a native timer is waiting for the next deadline.
    pub fn is_armed(&self) -> bool {
        self.state.armed.borrow().is_some()
    }
}

impl Drop for RunLoopTimer {
    fn drop(&mut self) {
        self.state.timers.set_waker(None);
        self.state.timers.set_clock(None);
        self.state.disarm();
    }
}
