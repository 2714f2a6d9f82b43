//! Local notifications through a platform notification center
//!
//! [`NotificationManager`] wraps a [`NotificationCenter`] with a small API:
//! request permission, schedule one-shot or repeating notifications, list,
//! replace or remove pending ones, and set the badge count. All state stays
//! in the center; the manager only validates input, builds requests and logs
//! failures the caller chose not to receive.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use local_notifications::{InMemoryNotificationCenter, NotificationManager, Trigger};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let manager = NotificationManager::new(Arc::new(InMemoryNotificationCenter::new()));
//!
//! manager.request_authorization_granted().await;
//! manager
//!     .schedule_notification("a", "Title", "Body", Trigger::RelativeDelay(3600))
//!     .await;
//! assert_eq!(manager.pending_request_ids().await, vec!["a".to_string()]);
//!
//! manager.remove_pending_notifications(&["a".to_string()]).await;
//! assert!(manager.pending_request_ids().await.is_empty());
//! # }
//! ```

pub mod commands;
pub mod error;
pub mod manager;
pub mod memory;
pub mod settings;
pub mod system;
pub mod types;

// Re-export main types for easy access
pub use error::{CenterError, NotificationError};
pub use manager::NotificationManager;
pub use memory::{AuthorizationResponse, InMemoryNotificationCenter};
pub use settings::{FacadeSettings, SettingsStore};
pub use system::NotificationCenter;
pub use types::{
    AuthorizationOptions, AuthorizationStatus, Capability, DeliveredNotification,
    NotificationContent, NotificationRequest, NotificationSettings, ReplaceOutcome,
    ScheduleOutcome, Trigger,
};
