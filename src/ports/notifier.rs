//! Notifier Port - Flow Progress and Outcome Delivery

use crate::domain::Notification;

/// Receives every notification the orchestrator emits.
///
/// Called inline from the flow, so implementations must not block.
pub trait Notifier: Send + Sync + 'static {
  fn notify(&self, notification: &Notification);
}
