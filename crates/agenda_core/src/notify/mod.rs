use crate::error::AppError;
use crate::reminder::Reminder;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

/// Delivery seam for reminders. In a chat deployment the implementation posts
/// to the configured channel; locally it maps to desktop notifications.
pub trait Notifier {
    fn send(&self, reminder: &Reminder) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn send(&self, _reminder: &Reminder) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn notifier_from_env(channel: &str) -> Result<Box<dyn Notifier>, AppError> {
    if std::env::var("AGENDA_DISABLE_NOTIFICATIONS").is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier(channel) {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => Ok(Box::new(NoopNotifier)),
            other => Err(other),
        },
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier(channel: &str) -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier::new(channel)))
}

#[cfg(windows)]
pub fn platform_notifier(channel: &str) -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier::new(channel)))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier(_channel: &str) -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}
