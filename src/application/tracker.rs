//! Identity tracking and event translation shared by the native backends
//!
//! Every backend submits notifications under some native handle (a D-Bus id,
//! a toast tag) and later receives callbacks that only carry that handle.
//! [`NotificationTracker`] keeps the handle <-> notification association and
//! turns resolved callbacks into [`NotificationEvent`]s on a broadcast
//! channel, so subscriber code never runs on a native dispatch context.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::domain::{
    normalize_action_id, Notification, NotificationActivated, NotificationDismissReason,
    NotificationDismissed, NotificationEvent, NotificationFailed, NotificationId,
};

/// Capacity of the outbound event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Bidirectional handle <-> notification map
#[derive(Debug)]
struct IdentityMap<H> {
    by_handle: HashMap<H, Notification>,
    by_id: HashMap<NotificationId, H>,
}

impl<H> IdentityMap<H>
where
    H: Eq + Hash + Clone,
{
    fn insert(&mut self, handle: H, notification: Notification) {
        self.by_id.insert(notification.id().clone(), handle.clone());
        self.by_handle.insert(handle, notification);
    }

    fn remove_handle(&mut self, handle: &H) -> Option<Notification> {
        let notification = self.by_handle.remove(handle)?;
        // The id may already point at a newer submission of the same notification
        if self.by_id.get(notification.id()) == Some(handle) {
            self.by_id.remove(notification.id());
        }
        Some(notification)
    }

    fn remove_id(&mut self, id: &NotificationId) -> Option<H> {
        let handle = self.by_id.remove(id)?;
        self.by_handle.remove(&handle);
        Some(handle)
    }
}

/// Tracks active and scheduled notifications by native handle and
/// publishes normalized events for resolved callbacks.
#[derive(Debug)]
pub struct NotificationTracker<H> {
    map: Mutex<IdentityMap<H>>,
    events: broadcast::Sender<NotificationEvent>,
}

impl<H> NotificationTracker<H>
where
    H: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            map: Mutex::new(IdentityMap {
                by_handle: HashMap::new(),
                by_id: HashMap::new(),
            }),
            events,
        }
    }

    /// Subscribe to events published after this call.
    ///
    /// The channel holds [`EVENT_CHANNEL_CAPACITY`] events. A receiver that
    /// falls further behind gets `RecvError::Lagged` and loses the oldest
    /// events, so drain it promptly.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    /// Associate a native handle with a submitted notification
    pub fn register(&self, handle: H, notification: Notification) {
        debug!(?handle, id = %notification.id(), "tracking notification");
        self.lock().insert(handle, notification);
    }

    /// Native handle of a tracked notification
    pub fn handle_of(&self, id: &NotificationId) -> Option<H> {
        self.lock().by_id.get(id).cloned()
    }

    /// Stop tracking a notification without publishing anything.
    /// Returns the handle it was tracked under.
    pub fn forget(&self, id: &NotificationId) -> Option<H> {
        self.lock().remove_id(id)
    }

    /// Stop tracking a handle without publishing anything
    pub fn forget_handle(&self, handle: &H) -> Option<Notification> {
        self.lock().remove_handle(handle)
    }

    pub fn is_tracked(&self, id: &NotificationId) -> bool {
        self.lock().by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every tracked entry
    pub fn clear(&self) {
        let mut map = self.lock();
        map.by_handle.clear();
        map.by_id.clear();
    }

    /// Resolve an activation callback.
    ///
    /// Returns false when the handle is not tracked; nothing is published then.
    pub fn activated(&self, handle: &H, argument: &str) -> bool {
        let notification = match self.lock().by_handle.get(handle) {
            Some(notification) => notification.clone(),
            None => {
                debug!(?handle, "ignoring activation of untracked notification");
                return false;
            }
        };

        self.publish(NotificationEvent::Activated(NotificationActivated {
            notification,
            action_id: normalize_action_id(argument),
        }));
        true
    }

    /// Resolve an activation that also consumes the notification.
    ///
    /// The entry is removed before publishing, so no dismissal follows.
    pub fn consumed(&self, handle: &H, argument: &str) -> bool {
        let Some(notification) = self.lock().remove_handle(handle) else {
            debug!(?handle, "ignoring activation of untracked notification");
            return false;
        };

        self.publish(NotificationEvent::Activated(NotificationActivated {
            notification,
            action_id: normalize_action_id(argument),
        }));
        true
    }

    /// Resolve a dismissal callback, removing the entry.
    ///
    /// Native services may report the same dismissal twice; the second call
    /// finds no entry and is ignored.
    pub fn dismissed(&self, handle: &H, reason: NotificationDismissReason) -> bool {
        let Some(notification) = self.lock().remove_handle(handle) else {
            debug!(?handle, %reason, "ignoring dismissal of untracked notification");
            return false;
        };

        self.publish(NotificationEvent::Dismissed(NotificationDismissed {
            notification,
            reason,
        }));
        true
    }

    /// Resolve a native delivery failure, removing the entry
    pub fn failed(&self, handle: &H, error: &str) -> bool {
        let Some(notification) = self.lock().remove_handle(handle) else {
            return false;
        };

        error!(?handle, id = %notification.id(), error = %error, "notification delivery failed");
        self.publish(NotificationEvent::Failed(NotificationFailed {
            notification,
            error: error.to_string(),
        }));
        true
    }

    fn publish(&self, event: NotificationEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, IdentityMap<H>> {
        // The map holds no invariants a panicking holder could break halfway
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<H> Default for NotificationTracker<H>
where
    H: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn tracked(handle: u32) -> (NotificationTracker<u32>, Notification) {
        let tracker = NotificationTracker::new();
        let notification = Notification::new("Title", "Body");
        tracker.register(handle, notification.clone());
        (tracker, notification)
    }

    #[test]
    fn dismissal_publishes_once() {
        let (tracker, notification) = tracked(7);
        let mut events = tracker.subscribe();

        assert!(tracker.dismissed(&7, NotificationDismissReason::Expired));
        assert!(!tracker.dismissed(&7, NotificationDismissReason::Expired));

        assert_eq!(
            events.try_recv().unwrap(),
            NotificationEvent::Dismissed(NotificationDismissed {
                notification,
                reason: NotificationDismissReason::Expired,
            })
        );
        assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
        assert!(tracker.is_empty());
    }

    #[test]
    fn activation_keeps_entry() {
        let (tracker, notification) = tracked(1);
        let mut events = tracker.subscribe();

        assert!(tracker.activated(&1, ""));
        assert!(tracker.activated(&1, "answer_yes"));
        assert!(tracker.is_tracked(notification.id()));

        let first = events.try_recv().unwrap();
        let second = events.try_recv().unwrap();
        assert!(matches!(first, NotificationEvent::Activated(ref e) if e.action_id == "default"));
        assert!(matches!(second, NotificationEvent::Activated(ref e) if e.action_id == "answer_yes"));
    }

    #[test]
    fn consumed_activation_removes_entry() {
        let (tracker, notification) = tracked(4);
        let mut events = tracker.subscribe();

        assert!(tracker.consumed(&4, "answer_no"));
        assert!(!tracker.is_tracked(notification.id()));
        assert!(!tracker.dismissed(&4, NotificationDismissReason::User));
        assert!(!tracker.consumed(&4, "answer_no"));

        assert!(matches!(
            events.try_recv().unwrap(),
            NotificationEvent::Activated(ref e) if e.action_id == "answer_no"
        ));
        assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn slow_subscriber_lags() {
        let tracker: NotificationTracker<u32> = NotificationTracker::new();
        let mut events = tracker.subscribe();

        let burst = EVENT_CHANNEL_CAPACITY as u32 + 10;
        for handle in 0..burst {
            tracker.register(handle, Notification::new("Title", "Body"));
            tracker.dismissed(&handle, NotificationDismissReason::User);
        }

        assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Lagged(10));
        let mut received = 0;
        while events.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, EVENT_CHANNEL_CAPACITY);
    }

    #[test]
    fn unknown_handles_are_ignored() {
        let tracker: NotificationTracker<u32> = NotificationTracker::new();
        let mut events = tracker.subscribe();

        assert!(!tracker.activated(&3, "x"));
        assert!(!tracker.dismissed(&3, NotificationDismissReason::User));
        assert!(!tracker.failed(&3, "boom"));
        assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn forget_returns_handle_and_silences_callbacks() {
        let (tracker, notification) = tracked(9);
        let mut events = tracker.subscribe();

        assert_eq!(tracker.forget(notification.id()), Some(9));
        assert_eq!(tracker.forget(notification.id()), None);
        assert!(!tracker.dismissed(&9, NotificationDismissReason::Application));
        assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn resubmission_points_id_at_latest_handle() {
        let (tracker, notification) = tracked(1);
        tracker.register(2, notification.clone());
        assert_eq!(tracker.handle_of(notification.id()), Some(2));

        // Dismissing the stale handle leaves the newer association alone
        assert!(tracker.dismissed(&1, NotificationDismissReason::User));
        assert_eq!(tracker.handle_of(notification.id()), Some(2));
    }

    #[test]
    fn failure_publishes_and_removes() {
        let (tracker, notification) = tracked(4);
        let mut events = tracker.subscribe();

        assert!(tracker.failed(&4, "denied"));
        assert!(!tracker.is_tracked(notification.id()));
        assert!(matches!(
            events.try_recv().unwrap(),
            NotificationEvent::Failed(ref e) if e.error == "denied"
        ));
    }

    #[test]
    fn clear_drops_everything() {
        let (tracker, _) = tracked(5);
        tracker.clear();
        assert!(tracker.is_empty());
    }
}
