use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A local notification as handed to the notification center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Caller-supplied identifier, unique among pending requests
    pub id: String,
    pub content: NotificationContent,
    pub trigger: Trigger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    /// Play the platform's default notification sound
    pub sound: bool,
}

/// When a request fires. Delays are in whole seconds from the moment the
/// request reaches the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    AbsoluteTime(DateTime<Utc>),
    RelativeDelay(i64),
    RepeatingDelay(i64),
}

impl Trigger {
    /// Past or zero triggers are never handed to the center.
    pub fn is_schedulable(&self, now: DateTime<Utc>) -> bool {
        match self {
            Trigger::AbsoluteTime(at) => *at > now,
            Trigger::RelativeDelay(seconds) | Trigger::RepeatingDelay(seconds) => *seconds > 0,
        }
    }

    pub fn repeats(&self) -> bool {
        matches!(self, Trigger::RepeatingDelay(_))
    }

    /// First time this trigger fires when submitted at `submitted_at`.
    ///
    /// `None` when the delay does not fit in a representable date.
    pub fn first_fire_time(&self, submitted_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Trigger::AbsoluteTime(at) => Some(*at),
            Trigger::RelativeDelay(seconds) | Trigger::RepeatingDelay(seconds) => {
                offset_by_seconds(submitted_at, *seconds)
            }
        }
    }
}

/// `from + seconds`, or `None` on overflow
pub(crate) fn offset_by_seconds(from: DateTime<Utc>, seconds: i64) -> Option<DateTime<Utc>> {
    from.checked_add_signed(Duration::try_seconds(seconds)?)
}

impl NotificationRequest {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        trigger: Trigger,
    ) -> Self {
        Self {
            id: id.into(),
            content: NotificationContent {
                title: title.into(),
                body: body.into(),
                sound: true,
            },
            trigger,
        }
    }

    pub fn with_sound(mut self, sound: bool) -> Self {
        self.content.sound = sound;
        self
    }
}

/// Authorization state as reported by the notification center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Denied,
    Authorized,
    /// Notifications are delivered quietly without an explicit user prompt
    Provisional,
    /// Granted for a limited time (app clips and similar)
    Ephemeral,
}

impl AuthorizationStatus {
    pub fn allows_delivery(&self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Authorized
                | AuthorizationStatus::Provisional
                | AuthorizationStatus::Ephemeral
        )
    }
}

/// Capabilities requested from the user when asking for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
    pub car_play: bool,
    pub critical_alert: bool,
    pub provisional: bool,
}

impl AuthorizationOptions {
    /// Every capability, including the platform-specific extras.
    pub fn all() -> Self {
        Self {
            alert: true,
            sound: true,
            badge: true,
            car_play: true,
            critical_alert: true,
            provisional: true,
        }
    }

    /// Alerts, sounds and badges.
    pub fn standard() -> Self {
        Self {
            alert: true,
            sound: true,
            badge: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Live settings snapshot of the notification center.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub authorization_status: AuthorizationStatus,
    pub alert_enabled: bool,
    pub sound_enabled: bool,
    pub badge_enabled: bool,
}

/// A notification that has already fired and is still listed by the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveredNotification {
    pub request: NotificationRequest,
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleOutcome {
    Scheduled,
    /// The trigger was in the past or not positive; nothing was submitted
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplaceOutcome {
    Replaced,
    /// No pending request carries the id; nothing changed
    NotPending,
    /// The new date is not in the future; the old request was left in place
    Ignored,
}

/// Platform features that may be missing on some targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    BadgeCount,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::BadgeCount => write!(f, "badge count"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_validation() {
        let now = Utc::now();

        assert!(Trigger::AbsoluteTime(now + Duration::seconds(1)).is_schedulable(now));
        assert!(!Trigger::AbsoluteTime(now).is_schedulable(now));
        assert!(!Trigger::AbsoluteTime(now - Duration::hours(1)).is_schedulable(now));

        assert!(Trigger::RelativeDelay(1).is_schedulable(now));
        assert!(!Trigger::RelativeDelay(0).is_schedulable(now));
        assert!(!Trigger::RelativeDelay(-5).is_schedulable(now));
        assert!(Trigger::RepeatingDelay(60).is_schedulable(now));
        assert!(!Trigger::RepeatingDelay(0).is_schedulable(now));
    }

    #[test]
    fn test_first_fire_time() {
        let now = Utc::now();
        assert_eq!(
            Trigger::RelativeDelay(3600).first_fire_time(now),
            Some(now + Duration::hours(1))
        );
        let at = now + Duration::days(2);
        assert_eq!(Trigger::AbsoluteTime(at).first_fire_time(now), Some(at));
        assert!(Trigger::RepeatingDelay(10).repeats());
        assert!(!Trigger::RelativeDelay(10).repeats());
    }

    #[test]
    fn test_first_fire_time_out_of_range() {
        let now = Utc::now();
        assert_eq!(Trigger::RelativeDelay(i64::MAX).first_fire_time(now), None);
        assert_eq!(
            Trigger::RepeatingDelay(10_000_000_000_000).first_fire_time(now),
            None
        );
        // Still a valid delay as far as validation is concerned
        assert!(Trigger::RelativeDelay(i64::MAX).is_schedulable(now));
    }

    #[test]
    fn test_authorization_status() {
        assert_eq!(AuthorizationStatus::default(), AuthorizationStatus::NotDetermined);
        assert!(!AuthorizationStatus::NotDetermined.allows_delivery());
        assert!(!AuthorizationStatus::Denied.allows_delivery());
        assert!(AuthorizationStatus::Authorized.allows_delivery());
        assert!(AuthorizationStatus::Provisional.allows_delivery());
        assert!(AuthorizationStatus::Ephemeral.allows_delivery());
    }

    #[test]
    fn test_authorization_options() {
        let standard = AuthorizationOptions::standard();
        assert!(standard.alert && standard.sound && standard.badge);
        assert!(!standard.provisional && !standard.critical_alert && !standard.car_play);
        assert!(AuthorizationOptions::default().is_empty());
        assert!(!AuthorizationOptions::all().is_empty());
    }

    #[test]
    fn test_request_serializes_to_json() {
        let request = NotificationRequest::new("a", "T", "B", Trigger::RelativeDelay(3600))
            .with_sound(false);
        let json = serde_json::to_string(&request).unwrap();
        let parsed: NotificationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
        assert!(!parsed.content.sound);
    }
}
