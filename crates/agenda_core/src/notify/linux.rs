use crate::error::AppError;
use crate::notify::Notifier;
use crate::reminder::Reminder;
use notify_rust::Notification;

pub struct LinuxNotifier {
    channel: String,
}

impl LinuxNotifier {
    pub fn new(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
        }
    }
}

impl Notifier for LinuxNotifier {
    fn send(&self, reminder: &Reminder) -> Result<(), AppError> {
        Notification::new()
            .summary(&format!("#{}", self.channel))
            .body(&reminder.message())
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
