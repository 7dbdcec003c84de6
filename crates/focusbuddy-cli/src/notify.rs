use focusbuddy_core::pet::{NotificationPermission, Notifier};

/// Prints notifications to stderr, alongside the log.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        eprintln!("\u{1f514} {title}: {body}");
        Ok(())
    }
}
