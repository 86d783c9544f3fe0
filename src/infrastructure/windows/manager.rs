//! Notification manager for Windows toast notifications

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::ports::{
    NotificationManager, ToastCallback, ToastCallbackReceiver, ToastHandle, ToastService,
};
use crate::application::NotificationTracker;
use crate::domain::duration::DEFAULT_LAUNCH_TIMEOUT_SECS;
use crate::domain::schedule::{check_delivery, check_expiration};
use crate::domain::{
    normalize_action_id, ApplicationContext, Capabilities, Notification, NotificationError,
    NotificationEvent,
};

use super::toast_xml;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    Disconnected,
    Connected,
    Disposed,
}

/// Notification manager backed by the toast notifier of an AppUserModelId
pub struct WindowsNotificationManager<T: ToastService> {
    context: ApplicationContext,
    service: T,
    tracker: Arc<NotificationTracker<ToastHandle>>,
    session: Mutex<Session>,
    launch_action_id: Mutex<Option<String>>,
    launch_timeout: Duration,
    next_tag: AtomicU64,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl<T: ToastService> WindowsNotificationManager<T> {
    pub fn new(context: ApplicationContext, service: T) -> Self {
        Self {
            context,
            service,
            tracker: Arc::new(NotificationTracker::new()),
            session: Mutex::new(Session::Disconnected),
            launch_action_id: Mutex::new(None),
            launch_timeout: Duration::from_secs(DEFAULT_LAUNCH_TIMEOUT_SECS),
            next_tag: AtomicU64::new(1),
            dispatcher: Mutex::new(None),
        }
    }

    /// Bound the wait for a cold-start launch action
    pub fn with_launch_timeout(mut self, timeout: Duration) -> Self {
        self.launch_timeout = timeout;
        self
    }

    pub fn context(&self) -> &ApplicationContext {
        &self.context
    }

    /// Number of notifications currently tracked
    pub fn tracked_count(&self) -> usize {
        self.tracker.len()
    }

    fn ensure_connected(&self) -> Result<(), NotificationError> {
        match *lock(&self.session) {
            Session::Connected => Ok(()),
            Session::Disconnected => Err(NotificationError::NotConnected),
            Session::Disposed => Err(NotificationError::Disposed),
        }
    }

    fn next_handle(&self) -> ToastHandle {
        let n = self.next_tag.fetch_add(1, Ordering::Relaxed);
        ToastHandle::new(format!("toast-{}", n))
    }

    async fn await_launch_action(&self) -> Option<String> {
        let activation = self.service.launch_activation()?;

        match tokio::time::timeout(self.launch_timeout, activation).await {
            Ok(Ok(arguments)) => Some(normalize_action_id(&arguments)),
            Ok(Err(_)) => {
                debug!("launch activation was abandoned");
                None
            }
            Err(_) => {
                warn!(
                    timeout = ?self.launch_timeout,
                    "timed out waiting for the launch activation"
                );
                None
            }
        }
    }
}

#[async_trait]
impl<T: ToastService> NotificationManager for WindowsNotificationManager<T> {
    async fn initialize(&self) -> Result<(), NotificationError> {
        if *lock(&self.session) == Session::Disposed {
            return Err(NotificationError::Disposed);
        }

        let callbacks = self.service.open(self.context.app_user_model_id())?;
        let dispatcher = spawn_dispatcher(Arc::clone(&self.tracker), callbacks);
        if let Some(previous) = lock(&self.dispatcher).replace(dispatcher) {
            previous.abort();
        }

        let launch_action_id = self.await_launch_action().await;
        if let Some(action_id) = &launch_action_id {
            info!(action_id = %action_id, "launched by notification activation");
        }
        *lock(&self.launch_action_id) = launch_action_id;

        info!(
            app_user_model_id = self.context.app_user_model_id(),
            "toast notifier ready"
        );
        *lock(&self.session) = Session::Connected;
        Ok(())
    }

    async fn show_notification(
        &self,
        notification: &Notification,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        self.ensure_connected()?;
        notification.validate()?;
        check_expiration(Utc::now(), expiration_time)?;

        let handle = self.next_handle();
        let xml = toast_xml::render(notification);

        // Track before showing so early callbacks resolve
        self.tracker.register(handle.clone(), notification.clone());
        if let Err(e) = self.service.show(&handle, &xml, expiration_time) {
            self.tracker.forget_handle(&handle);
            return Err(e);
        }

        debug!(%handle, notification = %notification.id(), "toast shown");
        Ok(())
    }

    async fn schedule_notification(
        &self,
        notification: &Notification,
        delivery_time: DateTime<Utc>,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        self.ensure_connected()?;
        notification.validate()?;
        check_delivery(Utc::now(), delivery_time, expiration_time)?;

        let handle = self.next_handle();
        let xml = toast_xml::render(notification);

        self.service
            .schedule(&handle, &xml, delivery_time, expiration_time)?;
        self.tracker.register(handle.clone(), notification.clone());

        debug!(%handle, notification = %notification.id(), %delivery_time, "toast scheduled");
        Ok(())
    }

    async fn hide_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        self.ensure_connected()?;

        match self.tracker.forget(notification.id()) {
            Some(handle) => self.service.hide(&handle),
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
        self.tracker.clear();
        self.service.close();
        debug!("windows notification manager disposed");
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::WINDOWS
    }

    fn launch_action_id(&self) -> Option<String> {
        lock(&self.launch_action_id).clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tracker.subscribe()
    }
}

impl<T: ToastService> Drop for WindowsNotificationManager<T> {
    fn drop(&mut self) {
        if let Some(dispatcher) = lock(&self.dispatcher).take() {
            dispatcher.abort();
        }
    }
}

/// Translate toast callbacks into tracker callbacks until the channel closes
fn spawn_dispatcher(
    tracker: Arc<NotificationTracker<ToastHandle>>,
    mut callbacks: ToastCallbackReceiver,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(callback) = callbacks.recv().await {
            match callback {
                // Clicking a toast consumes it; no dismissal follows
                ToastCallback::Activated { handle, arguments } => {
                    tracker.consumed(&handle, &arguments);
                }
                ToastCallback::Dismissed { handle, reason } => {
                    tracker.dismissed(&handle, reason.into());
                }
                ToastCallback::Failed { handle, error } => {
                    tracker.failed(&handle, &error);
                }
            }
        }
        debug!("toast callback channel closed");
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
