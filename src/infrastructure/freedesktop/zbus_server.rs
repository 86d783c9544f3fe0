//! `org.freedesktop.Notifications` over the D-Bus session bus using zbus

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use zbus::message::Type;
use zbus::{proxy, zvariant::Value, Connection, MatchRule, Message, MessageStream};

use crate::application::ports::{NotificationServer, NotifyRequest, ServerSignal, SignalReceiver};
use crate::domain::NotificationError;

const INTERFACE: &str = "org.freedesktop.Notifications";
const OBJECT_PATH: &str = "/org/freedesktop/Notifications";
const SIGNAL_QUEUE_SIZE: usize = 256;

/// D-Bus interface for freedesktop Notifications.
#[allow(clippy::too_many_arguments)]
#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications",
    gen_blocking = false
)]
trait Notifications {
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;

    fn close_notification(&self, id: u32) -> zbus::Result<()>;

    fn get_capabilities(&self) -> zbus::Result<Vec<String>>;
}

/// Notification server reached through the session bus
#[derive(Default)]
pub struct ZbusNotificationServer {
    proxy: Mutex<Option<NotificationsProxy<'static>>>,
    forwarders: Mutex<Vec<JoinHandle<()>>>,
}

impl ZbusNotificationServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn proxy(&self) -> Result<NotificationsProxy<'static>, NotificationError> {
        lock(&self.proxy)
            .clone()
            .ok_or(NotificationError::NotConnected)
    }
}

#[async_trait]
impl NotificationServer for ZbusNotificationServer {
    async fn connect(&self) -> Result<SignalReceiver, NotificationError> {
        let connection = Connection::session()
            .await
            .map_err(|e| NotificationError::ConnectionFailed(e.to_string()))?;
        let proxy = NotificationsProxy::new(&connection)
            .await
            .map_err(|e| NotificationError::ConnectionFailed(e.to_string()))?;

        // Both signals on one stream, so a click's ActionInvoked is always
        // forwarded before the NotificationClosed that follows it
        let rule = MatchRule::builder()
            .msg_type(Type::Signal)
            .interface(INTERFACE)
            .and_then(|builder| builder.path(OBJECT_PATH))
            .map_err(|e| NotificationError::ConnectionFailed(e.to_string()))?
            .build();
        let messages = MessageStream::for_match_rule(rule, &connection, Some(SIGNAL_QUEUE_SIZE))
            .await
            .map_err(|e| NotificationError::ConnectionFailed(e.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let forwarder = tokio::spawn(forward_signals(messages, tx));

        let stale = std::mem::replace(&mut *lock(&self.forwarders), vec![forwarder]);
        for forwarder in stale {
            forwarder.abort();
        }
        *lock(&self.proxy) = Some(proxy);

        debug!("subscribed to freedesktop notification signals");
        Ok(rx)
    }

    async fn get_capabilities(&self) -> Result<Vec<String>, NotificationError> {
        self.proxy()?
            .get_capabilities()
            .await
            .map_err(|e| NotificationError::ServiceFailed(e.to_string()))
    }

    async fn notify(&self, request: NotifyRequest) -> Result<u32, NotificationError> {
        let proxy = self.proxy()?;

        let mut hints = HashMap::new();
        hints.insert("urgency", Value::U8(request.urgency));

        proxy
            .notify(
                &request.app_name,
                request.replaces_id,
                &request.app_icon,
                &request.summary,
                &request.body,
                request.actions.iter().map(String::as_str).collect(),
                hints,
                request.expire_timeout,
            )
            .await
            .map_err(|e| NotificationError::ServiceFailed(e.to_string()))
    }

    async fn close_notification(&self, id: u32) -> Result<(), NotificationError> {
        self.proxy()?
            .close_notification(id)
            .await
            .map_err(|e| NotificationError::ServiceFailed(e.to_string()))
    }

    async fn disconnect(&self) {
        for forwarder in lock(&self.forwarders).drain(..) {
            forwarder.abort();
        }
        lock(&self.proxy).take();
    }
}

/// Forward notification signals in arrival order until the stream ends or
/// the receiver is dropped
async fn forward_signals<M>(messages: M, tx: mpsc::UnboundedSender<ServerSignal>)
where
    M: Stream<Item = zbus::Result<Message>>,
{
    let mut messages = std::pin::pin!(messages);
    while let Some(message) = messages.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!("Error receiving notification signal: {}", e);
                continue;
            }
        };
        let Some(signal) = decode_signal(&message) else {
            continue;
        };
        if tx.send(signal).is_err() {
            break;
        }
    }
    debug!("notification signal stream ended");
}

fn decode_signal(message: &Message) -> Option<ServerSignal> {
    let header = message.header();
    let member = header.member()?;
    let body = message.body();

    match member.as_str() {
        "ActionInvoked" => match body.deserialize::<(u32, String)>() {
            Ok((id, action_key)) => Some(ServerSignal::ActionInvoked { id, action_key }),
            Err(e) => {
                warn!("Malformed ActionInvoked signal: {}", e);
                None
            }
        },
        "NotificationClosed" => match body.deserialize::<(u32, u32)>() {
            Ok((id, reason)) => Some(ServerSignal::NotificationClosed { id, reason }),
            Err(e) => {
                warn!("Malformed NotificationClosed signal: {}", e);
                None
            }
        },
        // ActivationToken and anything newer
        _ => None,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
