//! Synchronous, single-threaded signal bus.
//!
//! The bus provides a publish/subscribe mechanism where:
//! - Producers call [`SignalBus::publish`] and every current subscriber of
//!   that signal name runs before `publish` returns, in subscription order
//! - Subscribers may unsubscribe (themselves or others) from inside a
//!   handler without corrupting the dispatch in progress
//! - A failing or panicking handler is isolated and reported; the remaining
//!   subscribers still run
//! - Worker threads post through a [`SignalPoster`] and the owning context
//!   delivers those signals with [`SignalBus::pump`]
//!
//! The bus is passed explicitly to producers and consumers; there is no
//! process-wide instance.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{trace, warn};

use super::inbox::{SignalInbox, SignalPoster};
use super::lifeline::{Lifeline, LifelineWatch};
use super::types::{Signal, SignalName};
use crate::error::HandlerError;

/// What a signal handler returns.
pub type HandlerResult = Result<(), HandlerError>;

type BoxedHandler = Box<dyn FnMut(&Signal) -> HandlerResult>;

/// Unique id of one subscription on one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Returned by `subscribe`; pass it to [`SignalBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    name: SignalName,
}

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn name(&self) -> SignalName {
        self.name
    }
}

/// One handler failure collected during a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    pub subscription: SubscriptionId,
    pub error: HandlerError,
}

/// Outcome of a single [`SignalBus::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Name the signal was delivered under.
    pub name: SignalName,
    /// Handlers that ran and returned `Ok`.
    pub delivered: usize,
    /// Subscriptions skipped because they were unsubscribed mid-dispatch or
    /// their owner is gone.
    pub skipped: usize,
    /// Handlers that failed, panicked or were re-entered.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    fn new(name: SignalName) -> Self {
        Self {
            name,
            delivered: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    /// True when no handler failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, subscription: SubscriptionId, error: HandlerError) {
        self.failures.push(HandlerFailure {
            subscription,
            error,
        });
    }
}

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    name: SignalName,
    owner: Option<LifelineWatch>,
    active: Rc<Cell<bool>>,
    handler: Rc<RefCell<BoxedHandler>>,
}

impl Subscription {
    fn owner_alive(&self) -> bool {
        self.owner.as_ref().map_or(true, LifelineWatch::is_alive)
    }

    fn is_live(&self) -> bool {
        self.active.get() && self.owner_alive()
    }
}

struct BusInner {
    next_id: Cell<u64>,
    subscriptions: RefCell<Vec<Subscription>>,
    inbox: SignalInbox,
}

/// Shared handle to a signal bus. Cloning is cheap and yields the same bus.
#[derive(Clone)]
pub struct SignalBus {
    inner: Rc<BusInner>,
}

impl SignalBus {
    /// Create a new, empty bus.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(BusInner {
                next_id: Cell::new(1),
                subscriptions: RefCell::new(Vec::new()),
                inbox: SignalInbox::new(),
            }),
        }
    }

    /// Subscribe a handler that lives as long as the subscription.
    pub fn subscribe<F>(&self, name: SignalName, handler: F) -> SubscriptionHandle
    where
        F: FnMut(&Signal) -> HandlerResult + 'static,
    {
        self.insert(name, None, Box::new(handler))
    }

    /// Subscribe a handler tied to `owner`.
    ///
    /// Once the lifeline is dropped the handler is never invoked again, even
    /// if nobody calls [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe_owned<F>(
        &self,
        name: SignalName,
        owner: &Lifeline,
        handler: F,
    ) -> SubscriptionHandle
    where
        F: FnMut(&Signal) -> HandlerResult + 'static,
    {
        self.insert(name, Some(owner.watch()), Box::new(handler))
    }

    fn insert(
        &self,
        name: SignalName,
        owner: Option<LifelineWatch>,
        handler: BoxedHandler,
    ) -> SubscriptionHandle {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        self.inner.subscriptions.borrow_mut().push(Subscription {
            id,
            name,
            owner,
            active: Rc::new(Cell::new(true)),
            handler: Rc::new(RefCell::new(handler)),
        });
        trace!(signal = %name, subscription = id.0, "subscribed");

        SubscriptionHandle { id, name }
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    ///
    /// Safe to call from inside any handler, including the one being
    /// removed. A subscription removed mid-dispatch is not invoked for the
    /// remainder of that dispatch.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let removed = {
            let mut subs = self.inner.subscriptions.borrow_mut();
            subs.iter()
                .position(|s| s.id == handle.id)
                .map(|pos| subs.remove(pos))
        };
        // Dropped outside the borrow: the handler's captures may call back
        // into the bus from their destructors.
        match removed {
            Some(sub) => {
                sub.active.set(false);
                trace!(signal = %handle.name, subscription = handle.id.0, "unsubscribed");
                true
            }
            None => false,
        }
    }

    /// Deliver `signal` synchronously to every live subscriber of its name.
    pub fn publish(&self, signal: Signal) -> DispatchReport {
        let name = signal.name();
        let targets: Vec<Subscription> = self
            .inner
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect();

        let mut report = DispatchReport::new(name);
        let mut saw_dead_owner = false;

        for sub in &targets {
            if !sub.active.get() {
                report.skipped += 1;
                continue;
            }
            if !sub.owner_alive() {
                sub.active.set(false);
                saw_dead_owner = true;
                report.skipped += 1;
                trace!(signal = %name, subscription = sub.id.0, "owner gone, skipping");
                continue;
            }

            let Ok(mut handler) = sub.handler.try_borrow_mut() else {
                report.record(sub.id, HandlerError::Reentrant);
                continue;
            };
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (&mut **handler)(&signal)));
            drop(handler);

            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => report.record(sub.id, err),
                Err(payload) => {
                    report.record(sub.id, HandlerError::Panicked(panic_message(payload.as_ref())))
                }
            }
        }
        drop(targets);

        if saw_dead_owner {
            self.prune();
        }

        for failure in &report.failures {
            warn!(
                signal = %name,
                subscription = failure.subscription.0,
                error = %failure.error,
                "signal handler failed"
            );
        }
        report
    }

    /// Number of live subscriptions for `name`.
    pub fn subscriber_count(&self, name: SignalName) -> usize {
        self.inner
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.name == name && s.is_live())
            .count()
    }

    /// Get a thread-safe poster that queues signals for [`pump`](Self::pump).
    pub fn poster(&self) -> SignalPoster {
        self.inner.inbox.poster()
    }

    /// Publish every signal posted since the last pump, in posting order.
    ///
    /// Returns the number of signals delivered. Signals posted by handlers
    /// during this pump are left for the next one.
    pub fn pump(&self) -> usize {
        let pending = self.inner.inbox.drain();
        let count = pending.len();
        for signal in pending {
            self.publish(signal);
        }
        count
    }

    fn prune(&self) {
        let dead: Vec<Subscription> = {
            let mut subs = self.inner.subscriptions.borrow_mut();
            let (live, dead) = std::mem::take(&mut *subs)
                .into_iter()
                .partition(Subscription::is_live);
            *subs = live;
            dead
        };
        trace!(pruned = dead.len(), "pruned dead subscriptions");
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subs = self.inner.subscriptions.borrow();
        f.debug_struct("SignalBus")
            .field("subscriptions", &subs.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
