//! Transient notifications
//!
//! Toasts dismiss themselves after a fixed delay. Each toast owns a tokio
//! timer; dismissing a toast by hand or dropping the last `Notifier` handle
//! aborts its timer, so a timer never fires against state that is gone.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub text: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    toasts: Vec<Toast>,
    timers: HashMap<Uuid, JoinHandle<()>>,
}

struct Inner {
    lifetime: Duration,
    state: Mutex<State>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn expire(&self, id: Uuid) {
        let mut state = self.state();
        state.timers.remove(&id);
        state.toasts.retain(|t| t.id != id);
        tracing::debug!(toast_id = %id, "Toast expired");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
    }
}

/// Shared handle to the toast stack
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Notifier {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                lifetime,
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.inner.lifetime
    }

    pub fn success(&self, text: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Success, text)
    }

    pub fn error(&self, text: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Error, text)
    }

    pub fn info(&self, text: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Info, text)
    }

    /// Raise a toast and arm its dismiss timer.
    ///
    /// Outside a tokio runtime no timer is armed and the toast stays up
    /// until dismissed.
    pub fn push(&self, level: ToastLevel, text: impl Into<String>) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            level,
            text: text.into(),
            raised_at: Utc::now(),
        };
        let id = toast.id;

        match level {
            ToastLevel::Error => tracing::warn!(toast_id = %id, text = %toast.text, "Error toast"),
            _ => tracing::info!(toast_id = %id, text = %toast.text, "Toast"),
        }

        let mut state = self.inner.state();
        state.toasts.push(toast);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let weak = Arc::downgrade(&self.inner);
            let lifetime = self.inner.lifetime;
            let timer = handle.spawn(async move {
                tokio::time::sleep(lifetime).await;
                if let Some(inner) = weak.upgrade() {
                    inner.expire(id);
                }
            });
            state.timers.insert(id, timer);
        }

        id
    }

    /// Dismiss a toast by hand. Returns false if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut state = self.inner.state();
        if let Some(timer) = state.timers.remove(&id) {
            timer.abort();
        }
        let before = state.toasts.len();
        state.toasts.retain(|t| t.id != id);
        before != state.toasts.len()
    }

    /// Dismiss everything
    pub fn clear(&self) {
        let mut state = self.inner.state();
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        state.toasts.clear();
    }

    /// Toasts currently up, oldest first
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.state().toasts.clone()
    }

    pub fn latest(&self) -> Option<Toast> {
        self.inner.state().toasts.last().cloned()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.state().timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses() {
        let notifier = Notifier::new(Duration::from_millis(3000));
        notifier.success("Location added successfully!");
        assert_eq!(notifier.toasts().len(), 1);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(notifier.toasts().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(notifier.toasts().is_empty());
        assert_eq!(notifier.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_cancels_timer() {
        let notifier = Notifier::new(Duration::from_millis(3000));
        let id = notifier.error("Failed to add contact");
        let other = notifier.info("Saved draft");

        assert!(notifier.dismiss(id));
        assert!(!notifier.dismiss(id));
        assert_eq!(notifier.pending_timers(), 1);
        assert_eq!(notifier.latest().map(|t| t.id), Some(other));
    }

    #[test]
    fn test_without_runtime_toast_stays() {
        let notifier = Notifier::new(Duration::from_millis(10));
        notifier.success("Client added successfully!");
        assert_eq!(notifier.pending_timers(), 0);
        assert_eq!(notifier.toasts()[0].level, ToastLevel::Success);
        notifier.clear();
        assert!(notifier.toasts().is_empty());
    }
}
