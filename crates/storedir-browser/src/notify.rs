//! Transient user notifications (toasts).

use std::sync::Mutex;

pub trait Notifier {
    fn error(&self, message: &str);
}

/// Sends notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::error!(notice = message, "user notification");
    }
}

/// Queues notifications until a front-end drains them with [`Self::take`].
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pending: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the queued messages, oldest first.
    pub fn take(&self) -> Vec<String> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        tracing::debug!(notice = message, "queued user notification");
        match self.pending.lock() {
            Ok(mut pending) => pending.push(message.to_owned()),
            Err(poisoned) => poisoned.into_inner().push(message.to_owned()),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn error(&self, message: &str) {
        (**self).error(message);
    }
}
