//! Console Notifier - Terminal Output for Flow Progress
//!
//! Prints each notification on its own line (errors to stderr) and
//! mirrors it into the structured log.

use tracing::{error, info, warn};

use crate::domain::{NoticeLevel, Notification};
use crate::ports::notifier::Notifier;

/// Writes notifications to stdout / stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    /// Suppress terminal output and only log.
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Log only; used by `watch`, which reports through the structured log
    /// and the metrics endpoint.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        let kind = notification.kind();
        let message = notification.message();

        match notification.level() {
            NoticeLevel::Info => info!(kind, "{message}"),
            NoticeLevel::Success => info!(kind, success = true, "{message}"),
            NoticeLevel::Error => match notification {
                Notification::Failed(err) if err.is_chain_failure() => error!(kind, "{message}"),
                _ => warn!(kind, "{message}"),
            },
        }

        if self.quiet {
            return;
        }

        match notification.level() {
            NoticeLevel::Error => eprintln!("{notification}"),
            _ => println!("{notification}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExchangeError;

    #[test]
    fn test_quiet_notifier_only_logs() {
        assert!(ConsoleNotifier::quiet().quiet);
        assert!(!ConsoleNotifier::new().quiet);

        // Must not panic for any level.
        let notifier = ConsoleNotifier::quiet();
        notifier.notify(&Notification::SaleSubmitting);
        notifier.notify(&Notification::Failed(ExchangeError::ReadFailure("timeout".into())));
    }
}
