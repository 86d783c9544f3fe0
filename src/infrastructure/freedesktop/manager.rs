//! Notification manager for freedesktop notification servers

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::application::ports::{
    NotificationManager, NotificationServer, NotifyRequest, ServerSignal, SignalReceiver,
    NORMAL_URGENCY,
};
use crate::application::NotificationTracker;
use crate::domain::schedule::{check_delivery, check_expiration, expire_timeout_ms};
use crate::domain::{
    ApplicationContext, Capabilities, Notification, NotificationDismissReason, NotificationError,
    NotificationEvent, NotificationId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    Disconnected,
    Connected(Capabilities),
    Disposed,
}

/// Notification manager speaking to `org.freedesktop.Notifications`
pub struct FreeDesktopNotificationManager<S: NotificationServer> {
    context: ApplicationContext,
    server: S,
    tracker: Arc<NotificationTracker<u32>>,
    session: Mutex<Session>,
    /// Schedules waiting in-process for their delivery time, one token each
    pending: Mutex<HashMap<NotificationId, Vec<u64>>>,
    next_token: AtomicU64,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl<S: NotificationServer> FreeDesktopNotificationManager<S> {
    pub fn new(context: ApplicationContext, server: S) -> Self {
        Self {
            context,
            server,
            tracker: Arc::new(NotificationTracker::new()),
            session: Mutex::new(Session::Disconnected),
            pending: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(0),
            dispatcher: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &ApplicationContext {
        &self.context
    }

    /// Number of notifications currently tracked
    pub fn tracked_count(&self) -> usize {
        self.tracker.len()
    }

    fn connected(&self) -> Result<Capabilities, NotificationError> {
        match *lock(&self.session) {
            Session::Connected(capabilities) => Ok(capabilities),
            Session::Disconnected => Err(NotificationError::NotConnected),
            Session::Disposed => Err(NotificationError::Disposed),
        }
    }

    fn add_pending(&self, id: &NotificationId) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        lock(&self.pending).entry(id.clone()).or_default().push(token);
        token
    }

    /// Claim a schedule's token. False once hide or dispose cancelled it.
    fn take_pending(&self, id: &NotificationId, token: u64) -> bool {
        let mut pending = lock(&self.pending);
        let Some(tokens) = pending.get_mut(id) else {
            return false;
        };
        let Some(position) = tokens.iter().position(|t| *t == token) else {
            return false;
        };
        tokens.swap_remove(position);
        if tokens.is_empty() {
            pending.remove(id);
        }
        true
    }

    fn build_request(
        &self,
        notification: &Notification,
        capabilities: Capabilities,
        expire_timeout: i32,
    ) -> NotifyRequest {
        NotifyRequest {
            app_name: self.context.name().to_string(),
            replaces_id: 0,
            app_icon: self.context.icon().unwrap_or_default().to_string(),
            summary: notification.title.clone(),
            body: generate_body(notification, capabilities),
            actions: generate_actions(notification),
            urgency: NORMAL_URGENCY,
            expire_timeout,
        }
    }
}

#[async_trait]
impl<S: NotificationServer> NotificationManager for FreeDesktopNotificationManager<S> {
    async fn initialize(&self) -> Result<(), NotificationError> {
        if *lock(&self.session) == Session::Disposed {
            return Err(NotificationError::Disposed);
        }

        let signals = self.server.connect().await?;
        let dispatcher = spawn_dispatcher(Arc::clone(&self.tracker), signals);
        if let Some(previous) = lock(&self.dispatcher).replace(dispatcher) {
            previous.abort();
        }

        let names = self.server.get_capabilities().await?;
        let capabilities = Capabilities::from_freedesktop(&names);
        info!(
            app = self.context.name(),
            capabilities = ?capabilities.labels(),
            "connected to freedesktop notification server"
        );

        *lock(&self.session) = Session::Connected(capabilities);
        Ok(())
    }

    async fn show_notification(
        &self,
        notification: &Notification,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        let capabilities = self.connected()?;
        notification.validate()?;

        let now = Utc::now();
        check_expiration(now, expiration_time)?;

        let request = self.build_request(
            notification,
            capabilities,
            expire_timeout_ms(now, expiration_time),
        );
        let id = self.server.notify(request).await?;

        debug!(id, notification = %notification.id(), "notification submitted");
        self.tracker.register(id, notification.clone());
        Ok(())
    }

    async fn schedule_notification(
        &self,
        notification: &Notification,
        delivery_time: DateTime<Utc>,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        self.connected()?;
        notification.validate()?;

        let now = Utc::now();
        check_delivery(now, delivery_time, expiration_time)?;

        // The server has no scheduler; wait here while the process lives
        let token = self.add_pending(notification.id());
        let delay = (delivery_time - now).to_std().unwrap_or_default();
        debug!(notification = %notification.id(), ?delay, "waiting to deliver notification");
        tokio::time::sleep(delay).await;

        if !self.take_pending(notification.id(), token) {
            debug!(notification = %notification.id(), "scheduled notification was hidden");
            return Ok(());
        }

        self.show_notification(notification, expiration_time).await
    }

    async fn hide_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        self.connected()?;

        if lock(&self.pending).remove(notification.id()).is_some() {
            debug!(notification = %notification.id(), "cancelled pending schedules");
        }

        // Forget first so the server's close signal finds no entry
        match self.tracker.forget(notification.id()) {
            Some(id) => self.server.close_notification(id).await,
            None => Ok(()),
        }
    }

    async fn dispose(&self) {
        {
            let mut session = lock(&self.session);
            if *session == Session::Disposed {
                return;
            }
            *session = Session::Disposed;
        }

        if let Some(dispatcher) = lock(&self.dispatcher).take() {
            dispatcher.abort();
        }
        lock(&self.pending).clear();
        self.tracker.clear();
        self.server.disconnect().await;
        debug!("freedesktop notification manager disposed");
    }

    fn capabilities(&self) -> Capabilities {
        match *lock(&self.session) {
            Session::Connected(capabilities) => capabilities,
            _ => Capabilities::empty(),
        }
    }

    fn launch_action_id(&self) -> Option<String> {
        // Freedesktop servers never launch the application
        None
    }

    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tracker.subscribe()
    }
}

impl<S: NotificationServer> Drop for FreeDesktopNotificationManager<S> {
    fn drop(&mut self) {
        if let Some(dispatcher) = lock(&self.dispatcher).take() {
            dispatcher.abort();
        }
    }
}

/// Translate server signals into tracker callbacks until the stream ends
fn spawn_dispatcher(
    tracker: Arc<NotificationTracker<u32>>,
    mut signals: SignalReceiver,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(signal) = signals.recv().await {
            match signal {
                ServerSignal::ActionInvoked { id, action_key } => {
                    tracker.activated(&id, &action_key);
                }
                ServerSignal::NotificationClosed { id, reason } => {
                    tracker.dismissed(&id, NotificationDismissReason::from_freedesktop_code(reason));
                }
            }
        }
        debug!("notification server signal stream ended");
    })
}

/// Flat `[action_id, label, ...]` list in button order
pub fn generate_actions(notification: &Notification) -> Vec<String> {
    notification
        .buttons
        .iter()
        .flat_map(|button| [button.action_id.clone(), button.label.clone()])
        .collect()
}

/// Body text, with image markup only when the server renders body images
pub fn generate_body(notification: &Notification, capabilities: Capabilities) -> String {
    let mut body = notification.body.clone();

    if let Some(image) = notification
        .body_image_path
        .as_deref()
        .filter(|_| capabilities.contains(Capabilities::BODY_IMAGES))
    {
        body.push_str(&format!(
            "\n<img src=\"{}\" alt=\"{}\"/>",
            quick_xml::escape::escape(image),
            quick_xml::escape::escape(notification.body_image_alt_text.as_str())
        ));
    }

    body
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_alternate_id_and_label() {
        let notification = Notification::new("Question", "Proceed?")
            .with_button("Yes", "yes")
            .with_button("No", "no");
        assert_eq!(generate_actions(&notification), ["yes", "Yes", "no", "No"]);
    }

    #[test]
    fn no_buttons_no_actions() {
        assert!(generate_actions(&Notification::new("T", "B")).is_empty());
    }

    #[test]
    fn body_image_requires_capability() {
        let notification =
            Notification::new("T", "Look at this").with_image("/tmp/cat.png", "A cat");

        assert_eq!(
            generate_body(&notification, Capabilities::BODY_TEXT),
            "Look at this"
        );
        assert_eq!(
            generate_body(&notification, Capabilities::BODY_IMAGES),
            "Look at this\n<img src=\"/tmp/cat.png\" alt=\"A cat\"/>"
        );
    }

    #[test]
    fn body_image_attributes_are_escaped() {
        let notification = Notification::new("T", "B").with_image("/tmp/a\"b.png", "<x>");
        let body = generate_body(&notification, Capabilities::BODY_IMAGES);
        assert!(body.contains("src=\"/tmp/a&quot;b.png\""));
        assert!(body.contains("alt=\"&lt;x&gt;\""));
    }
}
