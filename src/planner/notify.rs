use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Progress,
    Success,
    Destructive,
}

/// A user-facing status message emitted on a stage transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub tone: Tone,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn progress(title: &str, description: &str) -> Self {
        Self { tone: Tone::Progress, title: title.into(), description: description.into() }
    }

    pub fn success(title: &str, description: &str) -> Self {
        Self { tone: Tone::Success, title: title.into(), description: description.into() }
    }

    pub fn destructive(title: &str, description: &str) -> Self {
        Self { tone: Tone::Destructive, title: title.into(), description: description.into() }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
