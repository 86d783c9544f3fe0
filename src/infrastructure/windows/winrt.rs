//! WinRT toast notifier

use std::collections::HashMap;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use windows::core::{IInspectable, Interface, HSTRING};
use windows::Data::Xml::Dom::XmlDocument;
use windows::Foundation::{DateTime as WinDateTime, IReference, PropertyValue, TypedEventHandler};
use windows::UI::Notifications::{
    ScheduledToastNotification, ToastActivatedEventArgs, ToastDismissalReason,
    ToastDismissedEventArgs, ToastFailedEventArgs, ToastNotification, ToastNotificationManager,
    ToastNotifier,
};
use windows_sys::Win32::UI::Shell::SetCurrentProcessExplicitAppUserModelID;

use crate::application::ports::{
    ToastCallback, ToastCallbackReceiver, ToastDismissal, ToastHandle, ToastService,
};
use crate::domain::NotificationError;

/// Command-line flag Windows passes to a process launched from a toast
const TOAST_ACTIVATED_FLAG: &str = "-ToastActivated";

/// Seconds between 1601-01-01 (WinRT epoch) and 1970-01-01
const WINDOWS_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

type ShownToasts = Arc<Mutex<HashMap<ToastHandle, ToastNotification>>>;

/// Toast service talking to `Windows.UI.Notifications`
#[derive(Default)]
pub struct WinRtToastService {
    notifier: Mutex<Option<ToastNotifier>>,
    callbacks: Mutex<Option<mpsc::UnboundedSender<ToastCallback>>>,
    shown: ShownToasts,
    scheduled: Mutex<HashMap<ToastHandle, ScheduledToastNotification>>,
}

impl WinRtToastService {
    pub fn new() -> Self {
        Self::default()
    }

    fn notifier(&self) -> Result<ToastNotifier, NotificationError> {
        lock(&self.notifier)
            .clone()
            .ok_or(NotificationError::NotConnected)
    }

    fn callback_sender(&self) -> Result<mpsc::UnboundedSender<ToastCallback>, NotificationError> {
        lock(&self.callbacks)
            .clone()
            .ok_or(NotificationError::NotConnected)
    }
}

impl ToastService for WinRtToastService {
    fn open(&self, app_user_model_id: &str) -> Result<ToastCallbackReceiver, NotificationError> {
        register_app_user_model_id(app_user_model_id)?;

        let notifier =
            ToastNotificationManager::CreateToastNotifierWithId(&HSTRING::from(app_user_model_id))
                .map_err(service_error)?;

        let (tx, rx) = mpsc::unbounded_channel();
        *lock(&self.notifier) = Some(notifier);
        *lock(&self.callbacks) = Some(tx);
        Ok(rx)
    }

    fn launch_activation(&self) -> Option<oneshot::Receiver<String>> {
        let mut args = std::env::args().skip_while(|arg| arg != TOAST_ACTIVATED_FLAG);
        args.next()?;

        let (tx, rx) = oneshot::channel();
        match args.next() {
            Some(arguments) => {
                let _ = tx.send(arguments);
            }
            // Activated without arguments: the body was clicked
            None => {
                let _ = tx.send(String::new());
            }
        }
        Some(rx)
    }

    fn show(
        &self,
        handle: &ToastHandle,
        xml: &str,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        let notifier = self.notifier()?;
        let callbacks = self.callback_sender()?;

        let toast = ToastNotification::CreateToastNotification(&load_xml(xml)?)
            .map_err(service_error)?;
        toast.SetTag(&HSTRING::from(handle.tag())).map_err(service_error)?;
        if let Some(expiration) = expiration_time {
            toast
                .SetExpirationTime(&date_time_reference(expiration)?)
                .map_err(service_error)?;
        }

        attach_handlers(&toast, handle, callbacks, Arc::clone(&self.shown))?;
        lock(&self.shown).insert(handle.clone(), toast.clone());

        if let Err(e) = notifier.Show(&toast) {
            lock(&self.shown).remove(handle);
            return Err(service_error(e));
        }
        Ok(())
    }

    fn schedule(
        &self,
        handle: &ToastHandle,
        xml: &str,
        delivery_time: DateTime<Utc>,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        let notifier = self.notifier()?;

        let toast = ScheduledToastNotification::CreateScheduledToastNotification(
            &load_xml(xml)?,
            to_windows_date_time(delivery_time),
        )
        .map_err(service_error)?;
        toast.SetTag(&HSTRING::from(handle.tag())).map_err(service_error)?;
        if let Some(expiration) = expiration_time {
            toast
                .SetExpirationTime(&date_time_reference(expiration)?)
                .map_err(service_error)?;
        }

        notifier.AddToSchedule(&toast).map_err(service_error)?;
        lock(&self.scheduled).insert(handle.clone(), toast);
        Ok(())
    }

    fn hide(&self, handle: &ToastHandle) -> Result<(), NotificationError> {
        let notifier = self.notifier()?;

        if let Some(scheduled) = lock(&self.scheduled).remove(handle) {
            return notifier.RemoveFromSchedule(&scheduled).map_err(service_error);
        }
        if let Some(toast) = lock(&self.shown).remove(handle) {
            return notifier.Hide(&toast).map_err(service_error);
        }

        debug!(%handle, "toast already gone");
        Ok(())
    }

    fn close(&self) {
        lock(&self.callbacks).take();
        lock(&self.shown).clear();
        lock(&self.scheduled).clear();
        lock(&self.notifier).take();
    }
}

/// Forward the toast's native events onto the callback channel
fn attach_handlers(
    toast: &ToastNotification,
    handle: &ToastHandle,
    callbacks: mpsc::UnboundedSender<ToastCallback>,
    shown: ShownToasts,
) -> Result<(), NotificationError> {
    let activated_handle = handle.clone();
    let activated_tx = callbacks.clone();
    toast
        .Activated(&TypedEventHandler::<ToastNotification, IInspectable>::new(
            move |_, args: &Option<IInspectable>| {
                let arguments = args
                    .as_ref()
                    .and_then(|args| args.cast::<ToastActivatedEventArgs>().ok())
                    .and_then(|args| args.Arguments().ok())
                    .map(|arguments| arguments.to_string_lossy())
                    .unwrap_or_default();
                let _ = activated_tx.send(ToastCallback::Activated {
                    handle: activated_handle.clone(),
                    arguments,
                });
                Ok(())
            },
        ))
        .map_err(service_error)?;

    let dismissed_handle = handle.clone();
    let dismissed_tx = callbacks.clone();
    let dismissed_shown = Arc::clone(&shown);
    toast
        .Dismissed(&TypedEventHandler::<ToastNotification, ToastDismissedEventArgs>::new(
            move |_, args: &Option<ToastDismissedEventArgs>| {
                let reason = args
                    .as_ref()
                    .and_then(|args| args.Reason().ok())
                    .map(to_dismissal)
                    .unwrap_or(ToastDismissal::Other(-1));
                lock(&dismissed_shown).remove(&dismissed_handle);
                let _ = dismissed_tx.send(ToastCallback::Dismissed {
                    handle: dismissed_handle.clone(),
                    reason,
                });
                Ok(())
            },
        ))
        .map_err(service_error)?;

    let failed_handle = handle.clone();
    toast
        .Failed(&TypedEventHandler::<ToastNotification, ToastFailedEventArgs>::new(
            move |_, args: &Option<ToastFailedEventArgs>| {
                let error = args
                    .as_ref()
                    .and_then(|args| args.ErrorCode().ok())
                    .map(|code| code.message())
                    .unwrap_or_else(|| "unknown toast failure".to_string());
                warn!(handle = %failed_handle, error = %error, "toast failed");
                lock(&shown).remove(&failed_handle);
                let _ = callbacks.send(ToastCallback::Failed {
                    handle: failed_handle.clone(),
                    error,
                });
                Ok(())
            },
        ))
        .map_err(service_error)?;

    Ok(())
}

fn to_dismissal(reason: ToastDismissalReason) -> ToastDismissal {
    match reason {
        ToastDismissalReason::UserCanceled => ToastDismissal::UserCanceled,
        ToastDismissalReason::ApplicationHidden => ToastDismissal::ApplicationHidden,
        ToastDismissalReason::TimedOut => ToastDismissal::TimedOut,
        other => ToastDismissal::Other(other.0),
    }
}

/// Associate this process with the AppUserModelId toasts are sent under
fn register_app_user_model_id(app_user_model_id: &str) -> Result<(), NotificationError> {
    let wide: Vec<u16> = OsStr::new(app_user_model_id)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: `wide` is a NUL-terminated UTF-16 string that outlives the call
    let hr = unsafe { SetCurrentProcessExplicitAppUserModelID(wide.as_ptr()) };
    if hr < 0 {
        return Err(NotificationError::ServiceFailed(format!(
            "SetCurrentProcessExplicitAppUserModelID failed: 0x{:08X}",
            hr
        )));
    }
    Ok(())
}

fn load_xml(xml: &str) -> Result<XmlDocument, NotificationError> {
    let document = XmlDocument::new().map_err(service_error)?;
    document
        .LoadXml(&HSTRING::from(xml))
        .map_err(|e| NotificationError::invalid_argument("notification", e.message()))?;
    Ok(document)
}

fn to_windows_date_time(time: DateTime<Utc>) -> WinDateTime {
    let ticks = (time.timestamp() + WINDOWS_EPOCH_OFFSET_SECS) * 10_000_000
        + i64::from(time.timestamp_subsec_nanos() / 100);
    WinDateTime {
        UniversalTime: ticks,
    }
}

fn date_time_reference(time: DateTime<Utc>) -> Result<IReference<WinDateTime>, NotificationError> {
    PropertyValue::CreateDateTime(to_windows_date_time(time))
        .and_then(|value| value.cast::<IReference<WinDateTime>>())
        .map_err(service_error)
}

fn service_error(error: windows::core::Error) -> NotificationError {
    NotificationError::ServiceFailed(error.message())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
