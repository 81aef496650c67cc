//! Display-side model of the notification stack.
//!
//! # Design
//! - One timer handle per visible notification; dropping the handle cancels it.
//! - The caller supplies the timer factory, so the browser uses `gloo` timeouts
//!   and tests use plain values.
//! - Removal happens at most once per id whether it comes from the timer,
//!   a dismiss button, or a bus signal.

use crate::core::notify::{BusSignal, DISPLAY_DURATION, Notification, NotificationId};
use std::time::Duration;

struct Entry<H> {
    notification: Notification,
    _timer: H,
}

/// Visible notifications in raise order, each with its pending auto-removal.
pub struct NotificationSurface<H> {
    entries: Vec<Entry<H>>,
}

impl<H> Default for NotificationSurface<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> NotificationSurface<H> {
    /// Apply a bus signal. Returns `true` when the visible list changed.
    pub fn apply<F>(&mut self, signal: BusSignal, schedule: F) -> bool
    where
        F: FnOnce(NotificationId, Duration) -> H,
    {
        match signal {
            BusSignal::Raised(notification) => self.show(notification, schedule),
            BusSignal::Dismissed(id) => self.dismiss(id),
        }
    }

    /// Show a notification and arm its removal timer.
    ///
    /// The timer runs for [`DISPLAY_DURATION`] from the moment of display, so a
    /// message raised before the surface mounted still gets its full time on
    /// screen. Duplicate ids are ignored.
    pub fn show<F>(&mut self, notification: Notification, schedule: F) -> bool
    where
        F: FnOnce(NotificationId, Duration) -> H,
    {
        if self.contains(notification.id) {
            return false;
        }
        let timer = schedule(notification.id, DISPLAY_DURATION);
        self.entries.push(Entry {
            notification,
            _timer: timer,
        });
        true
    }

    /// Manual dismissal; cancels the pending timer. Idempotent.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.remove(id)
    }

    /// Timer callback. Removes the notification if it is still visible.
    pub fn expire(&mut self, id: NotificationId) -> bool {
        let removed = self.remove(id);
        if removed {
            tracing::trace!(id, "notification expired");
        }
        removed
    }

    /// Visible notifications in raise order.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().map(|entry| &entry.notification)
    }

    /// Number of visible notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is visible.
    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.entries.iter().any(|entry| entry.notification.id == id)
    }

    fn remove(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.notification.id != id);
        before != self.entries.len()
    }
}
