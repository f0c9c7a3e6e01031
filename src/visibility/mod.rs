mod lock;
mod machine;
mod timer;

pub use lock::{LockOutcome, ToolbarOp, VisibilityLock};
pub use machine::{
    VisibilityError, VisibilityEvent, VisibilityMachine, VisibilityResult, VisibilityState,
    VisibilityTransition,
};
pub use timer::HideTimer;
