//! Owner liveness tokens.
//!
//! A subscriber that must never be called after it is destroyed holds a
//! [`Lifeline`] and subscribes with it. The bus keeps only a
//! [`LifelineWatch`] and checks it before every dispatch, so a dead owner is
//! skipped rather than dereferenced.

use std::rc::{Rc, Weak};

/// Owner-held liveness token. Dropping it ends every subscription made
/// with it.
#[derive(Debug, Default)]
pub struct Lifeline(Rc<()>);

impl Lifeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer side of this lifeline.
    pub fn watch(&self) -> LifelineWatch {
        LifelineWatch(Rc::downgrade(&self.0))
    }
}

/// Non-owning view of a [`Lifeline`].
#[derive(Debug, Clone)]
pub struct LifelineWatch(Weak<()>);

impl LifelineWatch {
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
