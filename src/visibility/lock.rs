use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarOp {
    Attach,
    Detach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// The caller held the lock and ran the operation itself.
    Applied,
    /// The lock was held further up the stack; the holder runs the operation
    /// before releasing.
    Deferred,
}

/// Non-reentrant critical section around toolbar attach/detach.
///
/// Everything runs on one event loop, so contention only happens when an
/// attach or detach synchronously triggers another request (a toolkit
/// emitting pointer-enter while the overlay is removed, for instance). Such
/// requests are queued and run after the current operation in the same
/// critical section. Only the newest queued request is kept, since a later
/// request makes any earlier one moot.
#[derive(Debug, Default)]
pub struct VisibilityLock {
    held: Cell<bool>,
    queued: Cell<Option<ToolbarOp>>,
}

struct Held<'a>(&'a VisibilityLock);

impl Drop for Held<'_> {
    fn drop(&mut self) {
        self.0.held.set(false);
    }
}

impl VisibilityLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }

    pub fn run(&self, op: ToolbarOp, mut apply: impl FnMut(ToolbarOp)) -> LockOutcome {
        if self.held.replace(true) {
            tracing::debug!(?op, "visibility lock busy; queueing toolbar operation");
            self.queued.set(Some(op));
            return LockOutcome::Deferred;
        }
        let _held = Held(self);

        apply(op);
        while let Some(next) = self.queued.take() {
            apply(next);
        }
        LockOutcome::Applied
    }
}
