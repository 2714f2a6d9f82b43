//! Callback-based and fire-and-forget calling conventions.
//!
//! Every method here returns immediately and runs the matching async method
//! of [`NotificationManager`] on the current tokio runtime. The callback runs
//! once the center has answered; nothing orders it relative to the code that
//! follows the call. In-flight calls cannot be cancelled and no timeout is
//! applied.
//!
//! Called outside a runtime, the callback receives
//! [`NotificationError::NoRuntime`] straight away.

use crate::error::{NotificationError, Result};
use crate::manager::NotificationManager;
use crate::types::{
    AuthorizationStatus, NotificationRequest, ReplaceOutcome, ScheduleOutcome, Trigger,
};
use chrono::{DateTime, Utc};
use log::{debug as log_debug, error as log_error};
use std::future::Future;
use tokio::runtime::Handle;

fn spawn_with<T, Fut, F>(operation: &'static str, future: Fut, callback: F)
where
    T: Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    F: FnOnce(Result<T>) + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            log_debug!("Dispatching {} in the background", operation);
            handle.spawn(async move { callback(future.await) });
        }
        Err(_) => {
            log_error!("Cannot run {}: no tokio runtime", operation);
            callback(Err(NotificationError::NoRuntime(operation)));
        }
    }
}

/// Callback that only logs failures
fn log_failure<T: Send + 'static>(operation: &'static str) -> impl FnOnce(Result<T>) + Send + 'static {
    move |result| {
        if let Err(e) = result {
            log_error!("Error: {} ({})", e, operation);
        }
    }
}

impl NotificationManager {
    /// Request the configured capabilities without waiting; errors are logged
    pub fn request_authorization(&self) {
        self.request_authorization_with(log_failure("request_authorization"))
    }

    pub fn request_authorization_with<F>(&self, callback: F)
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        let manager = self.clone();
        spawn_with(
            "request_authorization",
            async move { manager.try_request_authorization().await },
            callback,
        )
    }

    pub fn authorization_status_with<F>(&self, callback: F)
    where
        F: FnOnce(Result<AuthorizationStatus>) + Send + 'static,
    {
        let manager = self.clone();
        spawn_with(
            "authorization_status",
            async move { Ok(manager.authorization_status().await) },
            callback,
        )
    }

    pub fn schedule_notification_with<F>(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        trigger: Trigger,
        callback: F,
    ) where
        F: FnOnce(Result<ScheduleOutcome>) + Send + 'static,
    {
        let manager = self.clone();
        let (id, title, body) = (id.into(), title.into(), body.into());
        spawn_with(
            "schedule_notification",
            async move {
                manager
                    .try_schedule_notification(&id, &title, &body, trigger)
                    .await
            },
            callback,
        )
    }

    /// Schedule without waiting for the center; submission errors are logged
    pub fn schedule_notification_detached(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        trigger: Trigger,
    ) {
        self.schedule_notification_with(id, title, body, trigger, log_failure("schedule_notification"))
    }

    pub fn schedule_repeating_notification_with<F>(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        interval_seconds: i64,
        callback: F,
    ) where
        F: FnOnce(Result<ScheduleOutcome>) + Send + 'static,
    {
        self.schedule_notification_with(
            id,
            title,
            body,
            Trigger::RepeatingDelay(interval_seconds),
            callback,
        )
    }

    pub fn schedule_repeating_notification_detached(
        &self,
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        interval_seconds: i64,
    ) {
        self.schedule_repeating_notification_with(
            id,
            title,
            body,
            interval_seconds,
            log_failure("schedule_repeating_notification"),
        )
    }

    pub fn pending_requests_with<F>(&self, callback: F)
    where
        F: FnOnce(Result<Vec<NotificationRequest>>) + Send + 'static,
    {
        let manager = self.clone();
        spawn_with(
            "pending_requests",
            async move { Ok(manager.pending_requests().await) },
            callback,
        )
    }

    pub fn pending_request_ids_with<F>(&self, callback: F)
    where
        F: FnOnce(Result<Vec<String>>) + Send + 'static,
    {
        let manager = self.clone();
        spawn_with(
            "pending_request_ids",
            async move { Ok(manager.pending_request_ids().await) },
            callback,
        )
    }

    pub fn replace_notification_with<F>(
        &self,
        id: impl Into<String>,
        new_title: impl Into<String>,
        new_body: impl Into<String>,
        new_date: DateTime<Utc>,
        callback: F,
    ) where
        F: FnOnce(Result<ReplaceOutcome>) + Send + 'static,
    {
        let manager = self.clone();
        let (id, new_title, new_body) = (id.into(), new_title.into(), new_body.into());
        spawn_with(
            "replace_notification",
            async move {
                manager
                    .replace_notification(&id, &new_title, &new_body, new_date)
                    .await
            },
            callback,
        )
    }

    pub fn remove_pending_notifications_detached(&self, ids: Vec<String>) {
        let manager = self.clone();
        spawn_with(
            "remove_pending_notifications",
            async move {
                manager.remove_pending_notifications(&ids).await;
                Ok(())
            },
            log_failure("remove_pending_notifications"),
        )
    }

    pub fn remove_all_pending_notifications_detached(&self) {
        let manager = self.clone();
        spawn_with(
            "remove_all_pending_notifications",
            async move {
                manager.remove_all_pending_notifications().await;
                Ok(())
            },
            log_failure("remove_all_pending_notifications"),
        )
    }

    pub fn remove_all_delivered_notifications_detached(&self) {
        let manager = self.clone();
        spawn_with(
            "remove_all_delivered_notifications",
            async move {
                manager.remove_all_delivered_notifications().await;
                Ok(())
            },
            log_failure("remove_all_delivered_notifications"),
        )
    }

    pub fn set_badge_with<F>(&self, count: u32, callback: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        let manager = self.clone();
        spawn_with(
            "set_badge",
            async move { manager.set_badge(count).await },
            callback,
        )
    }

    pub fn set_badge_detached(&self, count: u32) {
        self.set_badge_with(count, log_failure("set_badge"))
    }

    pub fn reset_badge_detached(&self) {
        self.set_badge_with(0, log_failure("reset_badge"))
    }
}
