#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    const fn summary(self) -> &'static str {
        match self {
            Self::Info => "Invocation",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// Host notification service. Pushing is fire-and-forget.
pub trait Notifier {
    fn push(&self, kind: NotificationKind, message: &str);
}

/// Desktop notification backend for hosts that have no in-app toast area.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn push(&self, kind: NotificationKind, message: &str) {
        if let Err(err) = notify_rust::Notification::new()
            .appname(&self.app_name)
            .summary(kind.summary())
            .body(message)
            .show()
        {
            tracing::warn!(?kind, "system notification failed: {err}");
        }
    }
}
