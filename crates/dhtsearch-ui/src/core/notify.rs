//! Process-wide notification bus.
//!
//! Any code path can raise a message without holding a reference to the
//! surface that shows it. Signals travel over one unbounded channel; the
//! mounted surface claims the receiving end with [`NotificationBus::attach`]
//! and gets everything raised before it mounted, in raise order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// How long a notification stays on screen unless dismissed.
pub const DISPLAY_DURATION: Duration = Duration::from_secs(3);

/// Identifier assigned to each raised notification. Never reused.
pub type NotificationId = u64;

/// Severity of a notification; drives styling only, never ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral information.
    #[default]
    Info,
    /// Completed action.
    Success,
    /// Refused or questionable input.
    Warning,
    /// Failed operation.
    Error,
}

impl Severity {
    /// Lowercase label, also used as a CSS modifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A transient, auto-expiring message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Unique, monotonically increasing id.
    pub id: NotificationId,
    /// Display text.
    pub message: String,
    /// Severity classification.
    pub severity: Severity,
    /// Time the notification was raised.
    pub created_at: DateTime<Utc>,
}

/// Wire format between producers and the display surface: `{message, type}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Display text.
    pub message: String,
    /// Severity; absent means `info`.
    #[serde(rename = "type", default)]
    pub severity: Severity,
}

/// Signal delivered to the display surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusSignal {
    /// A notification was raised.
    Raised(Notification),
    /// A notification should be removed.
    Dismissed(NotificationId),
}

struct BusInner {
    sender: UnboundedSender<BusSignal>,
    receiver: Mutex<Option<UnboundedReceiver<BusSignal>>>,
    next_id: AtomicU64,
}

/// Shared notification bus built on an unbounded `tokio::mpsc` channel.
#[derive(Clone)]
pub struct NotificationBus {
    inner: Arc<BusInner>,
}

static GLOBAL_BUS: LazyLock<NotificationBus> = LazyLock::new(NotificationBus::new);

impl NotificationBus {
    /// Construct an isolated bus. Production code uses [`Self::global`].
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(BusInner {
                sender,
                receiver: Mutex::new(Some(receiver)),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// The process-wide bus.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_BUS
    }

    /// Raise a notification. Succeeds whether or not a surface is mounted.
    pub fn raise(&self, message: impl Into<String>, severity: Severity) {
        let notification = Notification {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };
        tracing::debug!(
            id = notification.id,
            severity = severity.as_str(),
            "notification raised"
        );
        self.send(BusSignal::Raised(notification));
    }

    /// Raise a notification from its wire payload.
    pub fn raise_payload(&self, payload: NotificationPayload) {
        self.raise(payload.message, payload.severity);
    }

    /// Raise an [`Severity::Info`] notification.
    pub fn info(&self, message: impl Into<String>) {
        self.raise(message, Severity::Info);
    }

    /// Raise a [`Severity::Success`] notification.
    pub fn success(&self, message: impl Into<String>) {
        self.raise(message, Severity::Success);
    }

    /// Raise a [`Severity::Warning`] notification.
    pub fn warning(&self, message: impl Into<String>) {
        self.raise(message, Severity::Warning);
    }

    /// Raise a [`Severity::Error`] notification.
    pub fn error(&self, message: impl Into<String>) {
        self.raise(message, Severity::Error);
    }

    /// Remove a notification. Unknown or already removed ids are ignored.
    pub fn dismiss(&self, id: NotificationId) {
        self.send(BusSignal::Dismissed(id));
    }

    /// Claim the receiving end for a display surface.
    ///
    /// Returns `None` while another surface holds it.
    #[must_use]
    pub fn attach(&self) -> Option<NotificationFeed> {
        let receiver = self
            .inner
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        Some(NotificationFeed {
            receiver: Some(receiver),
            bus: Arc::clone(&self.inner),
        })
    }

    /// Whether a surface currently holds the receiving end.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn send(&self, signal: BusSignal) {
        // The receiver lives either in the bus or in a feed that hands it back
        // on drop, so the channel stays open for the bus's lifetime.
        if self.inner.sender.send(signal).is_err() {
            tracing::warn!("notification channel closed; signal dropped");
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end held by the mounted display surface.
///
/// Dropping the feed returns the receiver to the bus; signals raised in the
/// meantime wait for the next surface.
pub struct NotificationFeed {
    receiver: Option<UnboundedReceiver<BusSignal>>,
    bus: Arc<BusInner>,
}

impl NotificationFeed {
    /// Wait for the next signal.
    pub async fn next(&mut self) -> Option<BusSignal> {
        self.receiver.as_mut()?.recv().await
    }

    /// Take the next signal if one is queued.
    pub fn try_next(&mut self) -> Option<BusSignal> {
        self.receiver.as_mut()?.try_recv().ok()
    }

    /// Take every queued signal.
    pub fn drain(&mut self) -> Vec<BusSignal> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            *self
                .bus
                .receiver
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(receiver);
        }
    }
}

/// Raise a notification on the process-wide bus.
pub fn raise(message: impl Into<String>, severity: Severity) {
    NotificationBus::global().raise(message, severity);
}

/// Dismiss a notification on the process-wide bus.
pub fn dismiss(id: NotificationId) {
    NotificationBus::global().dismiss(id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raised(signal: &BusSignal) -> &Notification {
        match signal {
            BusSignal::Raised(notification) => notification,
            BusSignal::Dismissed(id) => panic!("expected raise, got dismissal of {id}"),
        }
    }

    #[test]
    fn raise_before_attach_is_buffered() {
        let bus = NotificationBus::new();
        bus.info("first");
        bus.warning("second");

        let mut feed = bus.attach().unwrap();
        let signals = feed.drain();
        assert_eq!(signals.len(), 2);
        assert_eq!(raised(&signals[0]).message, "first");
        assert_eq!(raised(&signals[1]).severity, Severity::Warning);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let bus = NotificationBus::new();
        for n in 0..5 {
            bus.info(format!("n{n}"));
        }
        let mut feed = bus.attach().unwrap();
        let ids: Vec<_> = feed.drain().iter().map(|s| raised(s).id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn only_one_surface_attaches() {
        let bus = NotificationBus::new();
        let feed = bus.attach();
        assert!(feed.is_some());
        assert!(bus.is_attached());
        assert!(bus.attach().is_none());

        drop(feed);
        assert!(!bus.is_attached());
        assert!(bus.attach().is_some());
    }

    #[test]
    fn signals_survive_surface_remount() {
        let bus = NotificationBus::new();
        let first = bus.attach().unwrap();
        drop(first);

        bus.error("while unmounted");
        bus.dismiss(99);

        let mut feed = bus.attach().unwrap();
        let signals = feed.drain();
        assert_eq!(raised(&signals[0]).message, "while unmounted");
        assert_eq!(signals[1], BusSignal::Dismissed(99));
    }

    #[test]
    fn payload_wire_format_defaults_to_info() {
        let payload: NotificationPayload =
            serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert_eq!(payload.severity, Severity::Info);

        let payload: NotificationPayload =
            serde_json::from_str(r#"{"message":"careful","type":"warning"}"#).unwrap();
        let bus = NotificationBus::new();
        bus.raise_payload(payload);
        let mut feed = bus.attach().unwrap();
        let signal = feed.try_next().unwrap();
        assert_eq!(raised(&signal).severity, Severity::Warning);
        assert!(feed.try_next().is_none());
    }

    #[tokio::test]
    async fn feed_awaits_later_raises() {
        let bus = NotificationBus::new();
        let mut feed = bus.attach().unwrap();
        let producer = bus.clone();
        let (signal, ()) = tokio::join!(feed.next(), async move {
            producer.success("done");
        });
        assert_eq!(raised(&signal.unwrap()).message, "done");
    }

    #[test]
    fn global_helpers_reach_global_bus() {
        raise("from anywhere", Severity::Info);
        dismiss(0);
        let mut feed = NotificationBus::global().attach().unwrap();
        let signals = feed.drain();
        assert!(signals.iter().any(|signal| matches!(
            signal,
            BusSignal::Raised(notification) if notification.message == "from anywhere"
        )));
        assert!(signals.contains(&BusSignal::Dismissed(0)));
    }
}
