//! Actions that commands and exporters return to the app

/// Outcome of a command, applied by `App::apply_action`
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action needed
    None,

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Open the key reference overlay
    OpenHelp,

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

impl Action {
    pub fn info(msg: impl Into<String>) -> Self {
        Action::Notify(msg.into(), NotifyLevel::Info)
    }

    pub fn warn(msg: impl Into<String>) -> Self {
        Action::Notify(msg.into(), NotifyLevel::Warn)
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Action::Notify(msg.into(), NotifyLevel::Error)
    }
}
