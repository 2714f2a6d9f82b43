use crate::error::CenterError;
use crate::types::{
    AuthorizationOptions, DeliveredNotification, NotificationRequest, NotificationSettings,
};
use async_trait::async_trait;

/// The platform's local-notification service.
///
/// Implementations own every piece of notification state: pending and
/// delivered requests, the authorization status and the badge count. They
/// must be safe to call from several tasks at once.
///
/// Submitting a request whose id matches a pending request replaces that
/// request.
#[async_trait]
pub trait NotificationCenter: Send + Sync {
    /// Ask the user for the given capabilities
    ///
    /// # Returns
    /// * `true` if the center now allows notifications to be delivered
    async fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> Result<bool, CenterError>;

    /// Current settings, read live on every call
    async fn notification_settings(&self) -> NotificationSettings;

    /// Submit a request for delivery
    async fn add(&self, request: NotificationRequest) -> Result<(), CenterError>;

    /// Requests that have not fired yet, in the center's order
    async fn pending_requests(&self) -> Vec<NotificationRequest>;

    async fn remove_pending(&self, ids: &[String]);

    async fn remove_all_pending(&self);

    async fn delivered_notifications(&self) -> Vec<DeliveredNotification>;

    async fn remove_delivered(&self, ids: &[String]);

    async fn remove_all_delivered(&self);

    /// Whether an aggregate badge count can be set on this platform
    fn supports_badge_count(&self) -> bool;

    async fn set_badge_count(&self, count: u32) -> Result<(), CenterError>;

    /// Center name (for logging/debugging)
    fn name(&self) -> &'static str;
}
