use crate::error::{NotificationError, Result};
use crate::settings::FacadeSettings;
use crate::system::NotificationCenter;
use crate::types::{
    AuthorizationOptions, AuthorizationStatus, Capability, DeliveredNotification,
    NotificationRequest, NotificationSettings, ReplaceOutcome, ScheduleOutcome, Trigger,
};
use chrono::{DateTime, Utc};
use log::{debug as log_debug, error as log_error, info as log_info, warn as log_warn};
use std::sync::Arc;

/// Facade over a [`NotificationCenter`].
///
/// Holds no notification state of its own; every call goes to the center.
/// Clones share the same center.
///
/// The async methods here are the suspending calling convention. Callback
/// and fire-and-forget variants live in [`crate::commands`] and run these
/// same methods.
#[derive(Clone)]
pub struct NotificationManager {
    center: Arc<dyn NotificationCenter>,
    settings: FacadeSettings,
}

impl NotificationManager {
    pub fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self::with_settings(center, FacadeSettings::default())
    }

    pub fn with_settings(center: Arc<dyn NotificationCenter>, settings: FacadeSettings) -> Self {
        log_debug!("NotificationManager created over the {} center", center.name());
        Self { center, settings }
    }

    pub fn center(&self) -> &Arc<dyn NotificationCenter> {
        &self.center
    }

    pub fn settings(&self) -> &FacadeSettings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Authorization
    // ------------------------------------------------------------------

    /// Request the configured capabilities, propagating errors
    ///
    /// # Returns
    /// * `true` if the center allows delivery afterwards
    pub async fn try_request_authorization(&self) -> Result<bool> {
        self.request_authorization_for(self.settings.authorization_options)
            .await
    }

    /// Request the configured capabilities; errors are logged and reported as `false`
    pub async fn request_authorization_granted(&self) -> bool {
        match self.try_request_authorization().await {
            Ok(granted) => granted,
            Err(e) => {
                log_error!("Error: {}", e);
                false
            }
        }
    }

    /// Request a specific set of capabilities, propagating errors
    pub async fn request_authorization_for(&self, options: AuthorizationOptions) -> Result<bool> {
        log_info!("Requesting notification authorization: {:?}", options);
        let granted = self.center.request_authorization(options).await?;
        log_info!("Notification authorization granted: {}", granted);
        Ok(granted)
    }

    /// Live authorization status; `NotDetermined` when the center has no answer yet
    pub async fn authorization_status(&self) -> AuthorizationStatus {
        self.center.notification_settings().await.authorization_status
    }

    pub async fn notification_settings(&self) -> NotificationSettings {
        self.center.notification_settings().await
    }

    // ------------------------------------------------------------------
    // Scheduling
    // ------------------------------------------------------------------

    /// Schedule a notification, propagating submission errors.
    ///
    /// A trigger in the past, or a delay that is not strictly positive, is
    /// silently ignored: the center is not called and `Ignored` is returned.
    /// A pending request with the same id is replaced.
    pub async fn try_schedule_notification(
        &self,
        id: &str,
        title: &str,
        body: &str,
        trigger: Trigger,
    ) -> Result<ScheduleOutcome> {
        if !trigger.is_schedulable(Utc::now()) {
            log_warn!("Ignoring notification '{}': trigger {:?} is not in the future", id, trigger);
            return Ok(ScheduleOutcome::Ignored);
        }

        let request = self.build_request(id, title, body, trigger);
        self.center.add(request).await?;

        log_info!("Scheduled notification '{}'", id);
        Ok(ScheduleOutcome::Scheduled)
    }

    /// Schedule a notification; submission errors are logged, not returned
    pub async fn schedule_notification(&self, id: &str, title: &str, body: &str, trigger: Trigger) {
        if let Err(e) = self.try_schedule_notification(id, title, body, trigger).await {
            log_error!("Error: {}", e);
        }
    }

    /// Schedule a notification to arrive at `trigger_date`
    pub async fn schedule_notification_at(
        &self,
        id: &str,
        title: &str,
        body: &str,
        trigger_date: DateTime<Utc>,
    ) {
        self.schedule_notification(id, title, body, Trigger::AbsoluteTime(trigger_date))
            .await
    }

    /// Schedule a notification to arrive `seconds` from now
    pub async fn schedule_notification_in(&self, id: &str, title: &str, body: &str, seconds: i64) {
        self.schedule_notification(id, title, body, Trigger::RelativeDelay(seconds))
            .await
    }

    /// Schedule a notification that fires every `interval_seconds` until removed,
    /// propagating submission errors
    pub async fn try_schedule_repeating_notification(
        &self,
        id: &str,
        title: &str,
        body: &str,
        interval_seconds: i64,
    ) -> Result<ScheduleOutcome> {
        self.try_schedule_notification(id, title, body, Trigger::RepeatingDelay(interval_seconds))
            .await
    }

    /// Schedule a repeating notification; submission errors are logged, not returned
    pub async fn schedule_repeating_notification(
        &self,
        id: &str,
        title: &str,
        body: &str,
        interval_seconds: i64,
    ) {
        self.schedule_notification(id, title, body, Trigger::RepeatingDelay(interval_seconds))
            .await
    }

    fn build_request(&self, id: &str, title: &str, body: &str, trigger: Trigger) -> NotificationRequest {
        NotificationRequest::new(id, title, body, trigger).with_sound(self.settings.default_sound)
    }

    // ------------------------------------------------------------------
    // Fetch
    // ------------------------------------------------------------------

    /// Snapshot of the pending requests, in whatever order the center reports
    pub async fn pending_requests(&self) -> Vec<NotificationRequest> {
        self.center.pending_requests().await
    }

    /// Ids of the pending requests, in the same order as [`Self::pending_requests`]
    pub async fn pending_request_ids(&self) -> Vec<String> {
        self.center
            .pending_requests()
            .await
            .into_iter()
            .map(|request| request.id)
            .collect()
    }

    pub async fn delivered_notifications(&self) -> Vec<DeliveredNotification> {
        self.center.delivered_notifications().await
    }

    async fn find_pending(&self, id: &str) -> Result<NotificationRequest> {
        self.center
            .pending_requests()
            .await
            .into_iter()
            .find(|request| request.id == id)
            .ok_or_else(|| NotificationError::NoSuchPendingRequest(id.to_string()))
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace the pending request `id` with new content firing at `new_date`.
    ///
    /// Nothing happens if no pending request has this id, or if `new_date`
    /// is not in the future.
    ///
    /// The old request is removed before the new one is submitted, without
    /// any rollback. If the submission fails the id is left with no pending
    /// request and the error is returned. Concurrent replacements of the same
    /// id are not synchronized; the last submission wins.
    pub async fn replace_notification(
        &self,
        id: &str,
        new_title: &str,
        new_body: &str,
        new_date: DateTime<Utc>,
    ) -> Result<ReplaceOutcome> {
        if let Err(e) = self.find_pending(id).await {
            log_debug!("Not replacing: {}", e);
            return Ok(ReplaceOutcome::NotPending);
        }

        let trigger = Trigger::AbsoluteTime(new_date);
        if !trigger.is_schedulable(Utc::now()) {
            log_warn!("Not replacing '{}': new date {} is not in the future", id, new_date);
            return Ok(ReplaceOutcome::Ignored);
        }

        self.center.remove_pending(&[id.to_string()]).await;

        let request = self.build_request(id, new_title, new_body, trigger);
        if let Err(e) = self.center.add(request).await {
            log_error!("Replacing '{}' failed after the old request was removed: {}", id, e);
            return Err(e.into());
        }

        log_info!("Replaced notification '{}'", id);
        Ok(ReplaceOutcome::Replaced)
    }

    // ------------------------------------------------------------------
    // Remove
    // ------------------------------------------------------------------

    /// Remove every pending request. Removed requests cannot be restored.
    pub async fn remove_all_pending_notifications(&self) {
        log_info!("Removing all pending notifications");
        self.center.remove_all_pending().await
    }

    /// Remove every delivered notification. Removed notifications cannot be restored.
    pub async fn remove_all_delivered_notifications(&self) {
        log_info!("Removing all delivered notifications");
        self.center.remove_all_delivered().await
    }

    /// Remove the pending requests with the given ids; unknown ids are ignored
    pub async fn remove_pending_notifications(&self, ids: &[String]) {
        log_debug!("Removing pending notifications {:?}", ids);
        self.center.remove_pending(ids).await
    }

    pub async fn remove_delivered_notifications(&self, ids: &[String]) {
        log_debug!("Removing delivered notifications {:?}", ids);
        self.center.remove_delivered(ids).await
    }

    // ------------------------------------------------------------------
    // Badge
    // ------------------------------------------------------------------

    pub fn supports_badge_api(&self) -> bool {
        self.center.supports_badge_count()
    }

    /// Set the application's badge count
    ///
    /// Fails with `NotAvailable` on centers without a settable badge.
    pub async fn set_badge(&self, count: u32) -> Result<()> {
        if !self.supports_badge_api() {
            return Err(NotificationError::NotAvailable(Capability::BadgeCount));
        }
        self.center.set_badge_count(count).await?;
        log_debug!("Badge count set to {}", count);
        Ok(())
    }

    pub async fn reset_badge(&self) -> Result<()> {
        self.set_badge(0).await
    }
}
