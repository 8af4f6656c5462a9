use crate::error::AppError;
use crate::notify::Notifier;
use crate::reminder::Reminder;
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier {
    channel: String,
}

impl WindowsNotifier {
    pub fn new(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
        }
    }
}

impl Notifier for WindowsNotifier {
    fn send(&self, reminder: &Reminder) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(&format!("#{}", self.channel))
            .text1(&reminder.message())
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
