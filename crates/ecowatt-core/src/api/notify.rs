use tracing::error;

/// Sink for user-visible error notifications.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Emits notifications as `error!` events. Used when no front-end is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_error(&self, message: &str) {
        error!(notification = message, "Request failed");
    }
}
