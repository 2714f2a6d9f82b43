use crate::error::CenterError;
use crate::system::NotificationCenter;
use crate::types::{
    offset_by_seconds, AuthorizationOptions, AuthorizationStatus, DeliveredNotification,
    NotificationRequest, NotificationSettings, Trigger,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug as log_debug, info as log_info, warn as log_warn};
use std::sync::Arc;
use tokio::sync::RwLock;

/// How the simulated user answers the first authorization prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationResponse {
    Grant,
    Deny,
    Fail(String),
}

#[derive(Debug, Clone)]
struct PendingEntry {
    request: NotificationRequest,
    fire_at: DateTime<Utc>,
}

#[derive(Debug)]
struct CenterState {
    authorization_status: AuthorizationStatus,
    granted_options: AuthorizationOptions,
    pending: Vec<PendingEntry>,
    delivered: Vec<DeliveredNotification>,
    badge_count: u32,
    submission_failure: Option<String>,
}

/// Notification center that keeps everything in process memory.
///
/// Nothing fires on its own: call [`InMemoryNotificationCenter::deliver_due`]
/// to move due requests to the delivered list.
#[derive(Debug, Clone)]
pub struct InMemoryNotificationCenter {
    state: Arc<RwLock<CenterState>>,
    response: AuthorizationResponse,
    badge_supported: bool,
}

impl Default for InMemoryNotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNotificationCenter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CenterState {
                authorization_status: AuthorizationStatus::NotDetermined,
                granted_options: AuthorizationOptions::default(),
                pending: Vec::new(),
                delivered: Vec::new(),
                badge_count: 0,
                submission_failure: None,
            })),
            response: AuthorizationResponse::Grant,
            badge_supported: true,
        }
    }

    pub fn with_authorization_response(mut self, response: AuthorizationResponse) -> Self {
        self.response = response;
        self
    }

    /// Behave like a target without a settable badge
    pub fn without_badge_support(mut self) -> Self {
        self.badge_supported = false;
        self
    }

    /// Make every following `add` fail with the given platform message
    pub async fn fail_submissions(&self, message: impl Into<String>) {
        self.state.write().await.submission_failure = Some(message.into());
    }

    pub async fn accept_submissions(&self) {
        self.state.write().await.submission_failure = None;
    }

    /// Force an authorization status, as if the user changed it in system settings
    pub async fn set_authorization_status(&self, status: AuthorizationStatus) {
        self.state.write().await.authorization_status = status;
    }

    pub async fn badge_count(&self) -> u32 {
        self.state.read().await.badge_count
    }

    /// Time at which the pending request `id` fires next
    pub async fn next_fire_time(&self, id: &str) -> Option<DateTime<Utc>> {
        let state = self.state.read().await;
        state
            .pending
            .iter()
            .find(|entry| entry.request.id == id)
            .map(|entry| entry.fire_at)
    }

    /// Deliver every pending request due at `now`.
    ///
    /// One-shot requests leave the pending list; repeating requests stay
    /// pending and re-arm one interval after `now`.
    ///
    /// # Returns
    /// * Number of notifications delivered
    pub async fn deliver_due(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.write().await;
        let mut still_pending = Vec::with_capacity(state.pending.len());
        let mut delivered = Vec::new();

        for mut entry in std::mem::take(&mut state.pending) {
            if entry.fire_at > now {
                still_pending.push(entry);
                continue;
            }

            delivered.push(DeliveredNotification {
                request: entry.request.clone(),
                delivered_at: now,
            });

            if let Trigger::RepeatingDelay(interval) = entry.request.trigger {
                match offset_by_seconds(now, interval) {
                    Some(next) => {
                        entry.fire_at = next;
                        still_pending.push(entry);
                    }
                    None => log_warn!(
                        "Dropping repeating notification '{}': next fire time is out of range",
                        entry.request.id
                    ),
                }
            }
        }

        let count = delivered.len();
        state.pending = still_pending;
        for notification in delivered {
            // A re-delivered id replaces its previous delivered entry
            state
                .delivered
                .retain(|existing| existing.request.id != notification.request.id);
            state.delivered.push(notification);
        }

        if count > 0 {
            log_debug!("Delivered {} in-memory notification(s)", count);
        }
        count
    }

    fn settings_for(state: &CenterState) -> NotificationSettings {
        let enabled = state.authorization_status.allows_delivery();
        NotificationSettings {
            authorization_status: state.authorization_status,
            alert_enabled: enabled && state.granted_options.alert,
            sound_enabled: enabled && state.granted_options.sound,
            badge_enabled: enabled && state.granted_options.badge,
        }
    }
}

#[async_trait]
impl NotificationCenter for InMemoryNotificationCenter {
    async fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> Result<bool, CenterError> {
        let mut state = self.state.write().await;

        // The user is only prompted once; later requests report the stored answer
        if state.authorization_status != AuthorizationStatus::NotDetermined {
            return Ok(state.authorization_status.allows_delivery());
        }

        match &self.response {
            AuthorizationResponse::Grant => {
                state.authorization_status = if options.provisional {
                    AuthorizationStatus::Provisional
                } else {
                    AuthorizationStatus::Authorized
                };
                state.granted_options = options;
                log_info!(
                    "In-memory center granted authorization: {:?}",
                    state.authorization_status
                );
                Ok(true)
            }
            AuthorizationResponse::Deny => {
                state.authorization_status = AuthorizationStatus::Denied;
                Ok(false)
            }
            AuthorizationResponse::Fail(message) => Err(CenterError::Platform(message.clone())),
        }
    }

    async fn notification_settings(&self) -> NotificationSettings {
        Self::settings_for(&*self.state.read().await)
    }

    async fn add(&self, request: NotificationRequest) -> Result<(), CenterError> {
        let now = Utc::now();
        let mut state = self.state.write().await;

        if state.authorization_status == AuthorizationStatus::Denied {
            return Err(CenterError::NotAllowed);
        }
        if let Some(message) = &state.submission_failure {
            return Err(CenterError::Platform(message.clone()));
        }
        if !request.trigger.is_schedulable(now) {
            return Err(CenterError::InvalidTrigger);
        }

        // Delays count from submission, not from any `now` later passed to `deliver_due`
        let fire_at = request
            .trigger
            .first_fire_time(now)
            .ok_or(CenterError::InvalidTrigger)?;
        state.pending.retain(|entry| entry.request.id != request.id);
        state.pending.push(PendingEntry { request, fire_at });
        Ok(())
    }

    async fn pending_requests(&self) -> Vec<NotificationRequest> {
        let state = self.state.read().await;
        state.pending.iter().map(|entry| entry.request.clone()).collect()
    }

    async fn remove_pending(&self, ids: &[String]) {
        let mut state = self.state.write().await;
        state.pending.retain(|entry| !ids.contains(&entry.request.id));
    }

    async fn remove_all_pending(&self) {
        self.state.write().await.pending.clear();
    }

    async fn delivered_notifications(&self) -> Vec<DeliveredNotification> {
        self.state.read().await.delivered.clone()
    }

    async fn remove_delivered(&self, ids: &[String]) {
        let mut state = self.state.write().await;
        state
            .delivered
            .retain(|notification| !ids.contains(&notification.request.id));
    }

    async fn remove_all_delivered(&self) {
        self.state.write().await.delivered.clear();
    }

    fn supports_badge_count(&self) -> bool {
        self.badge_supported
    }

    async fn set_badge_count(&self, count: u32) -> Result<(), CenterError> {
        if !self.badge_supported {
            return Err(CenterError::BadgeUnsupported);
        }
        self.state.write().await.badge_count = count;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(id: &str, trigger: Trigger) -> NotificationRequest {
        NotificationRequest::new(id, "Title", "Body", trigger)
    }

    #[tokio::test]
    async fn test_duplicate_id_replaces_pending_request() {
        let center = InMemoryNotificationCenter::new();
        center.add(request("a", Trigger::RelativeDelay(60))).await.unwrap();
        center.add(request("b", Trigger::RelativeDelay(60))).await.unwrap();

        let mut replacement = request("a", Trigger::RelativeDelay(120));
        replacement.content.title = "Updated".to_string();
        center.add(replacement).await.unwrap();

        let pending = center.pending_requests().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, "b");
        assert_eq!(pending[1].id, "a");
        assert_eq!(pending[1].content.title, "Updated");
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_trigger() {
        let center = InMemoryNotificationCenter::new();
        let result = center.add(request("a", Trigger::RelativeDelay(0))).await;
        assert_eq!(result, Err(CenterError::InvalidTrigger));
        assert!(center.pending_requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_fails_when_denied() {
        let center =
            InMemoryNotificationCenter::new().with_authorization_response(AuthorizationResponse::Deny);
        let granted = center
            .request_authorization(AuthorizationOptions::standard())
            .await
            .unwrap();
        assert!(!granted);

        let result = center.add(request("a", Trigger::RelativeDelay(60))).await;
        assert_eq!(result, Err(CenterError::NotAllowed));
    }

    #[tokio::test]
    async fn test_authorization_is_only_prompted_once() {
        let center = InMemoryNotificationCenter::new();
        assert!(center
            .request_authorization(AuthorizationOptions::standard())
            .await
            .unwrap());
        let settings = center.notification_settings().await;
        assert_eq!(settings.authorization_status, AuthorizationStatus::Authorized);
        assert!(settings.alert_enabled && settings.sound_enabled && settings.badge_enabled);

        // A second prompt with provisional options does not downgrade the status
        assert!(center
            .request_authorization(AuthorizationOptions::all())
            .await
            .unwrap());
        assert_eq!(
            center.notification_settings().await.authorization_status,
            AuthorizationStatus::Authorized
        );
    }

    #[tokio::test]
    async fn test_status_changed_outside_the_app() {
        let center = InMemoryNotificationCenter::new();
        center
            .request_authorization(AuthorizationOptions::standard())
            .await
            .unwrap();

        center.set_authorization_status(AuthorizationStatus::Denied).await;
        let settings = center.notification_settings().await;
        assert_eq!(settings.authorization_status, AuthorizationStatus::Denied);
        assert!(!settings.alert_enabled && !settings.sound_enabled && !settings.badge_enabled);
        assert_eq!(
            center.add(request("a", Trigger::RelativeDelay(60))).await,
            Err(CenterError::NotAllowed)
        );
    }

    #[tokio::test]
    async fn test_provisional_grant() {
        let center = InMemoryNotificationCenter::new();
        assert!(center
            .request_authorization(AuthorizationOptions::all())
            .await
            .unwrap());
        assert_eq!(
            center.notification_settings().await.authorization_status,
            AuthorizationStatus::Provisional
        );
    }

    #[tokio::test]
    async fn test_deliver_due_moves_one_shot_and_rearms_repeating() {
        let center = InMemoryNotificationCenter::new();
        center.add(request("once", Trigger::RelativeDelay(10))).await.unwrap();
        center.add(request("every", Trigger::RepeatingDelay(10))).await.unwrap();
        center.add(request("later", Trigger::RelativeDelay(3600))).await.unwrap();

        let now = Utc::now() + Duration::seconds(30);
        assert_eq!(center.deliver_due(now).await, 2);

        let pending: Vec<String> = center
            .pending_requests()
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(pending, vec!["every".to_string(), "later".to_string()]);
        assert_eq!(
            center.next_fire_time("every").await,
            Some(now + Duration::seconds(10))
        );

        let delivered = center.delivered_notifications().await;
        assert_eq!(delivered.len(), 2);
        assert!(delivered.iter().all(|n| n.delivered_at == now));

        // Firing again only re-delivers the repeating request
        assert_eq!(center.deliver_due(now + Duration::seconds(10)).await, 1);
        assert_eq!(center.delivered_notifications().await.len(), 2);

        center.remove_delivered(&["once".to_string()]).await;
        assert_eq!(center.delivered_notifications().await.len(), 1);
        center.remove_all_delivered().await;
        assert!(center.delivered_notifications().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_delay_beyond_representable_dates() {
        let center = InMemoryNotificationCenter::new();

        let result = center.add(request("huge", Trigger::RelativeDelay(i64::MAX))).await;
        assert_eq!(result, Err(CenterError::InvalidTrigger));

        let result = center
            .add(request("huge", Trigger::RepeatingDelay(10_000_000_000_000)))
            .await;
        assert_eq!(result, Err(CenterError::InvalidTrigger));

        assert!(center.pending_requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_deliver_due_drops_repeating_request_that_cannot_rearm() {
        let center = InMemoryNotificationCenter::new();
        center
            .add(request("yearly", Trigger::RepeatingDelay(365 * 24 * 3600)))
            .await
            .unwrap();

        // Deliver close to the end of the representable range
        let now = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        assert_eq!(center.deliver_due(now).await, 1);

        assert!(center.pending_requests().await.is_empty());
        assert_eq!(center.delivered_notifications().await.len(), 1);
    }

    #[tokio::test]
    async fn test_badge_support() {
        let center = InMemoryNotificationCenter::new();
        center.set_badge_count(7).await.unwrap();
        assert_eq!(center.badge_count().await, 7);

        let unsupported = InMemoryNotificationCenter::new().without_badge_support();
        assert!(!unsupported.supports_badge_count());
        assert_eq!(
            unsupported.set_badge_count(1).await,
            Err(CenterError::BadgeUnsupported)
        );
    }

    #[tokio::test]
    async fn test_injected_submission_failure() {
        let center = InMemoryNotificationCenter::new();
        center.fail_submissions("storage unavailable").await;
        let result = center.add(request("a", Trigger::RelativeDelay(60))).await;
        assert_eq!(
            result,
            Err(CenterError::Platform("storage unavailable".to_string()))
        );

        center.accept_submissions().await;
        assert!(center.add(request("a", Trigger::RelativeDelay(60))).await.is_ok());
    }
}
