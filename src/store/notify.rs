//! User-facing notifications raised by store mutations

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A toast: short title plus one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: &str, description: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn error(description: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error".to_string(),
            description: description.to_string(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!(title = %notification.title, "{}", notification.description)
            }
            NotificationKind::Error => {
                tracing::warn!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}

/// Forwards notifications to a receiver drained by the UI
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_notifier_delivers_in_order() {
        let (notifier, mut receiver) = ChannelNotifier::new();
        notifier.notify(Notification::success("Cliente añadido", "ok"));
        notifier.notify(Notification::error("falló"));

        let first = receiver.recv().await.unwrap();
        let second = receiver.recv().await.unwrap();
        assert_eq!(first.kind, NotificationKind::Success);
        assert_eq!(second.title, "Error");
        assert_eq!(second.description, "falló");
    }

    #[test]
    fn dropped_receiver_is_not_an_error() {
        let (notifier, receiver) = ChannelNotifier::new();
        drop(receiver);
        notifier.notify(Notification::error("nadie escucha"));
    }
}
