use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

/// A fire-and-forget user notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: Variant::Destructive,
            ..Self::new(title, description)
        }
    }
    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Shows toasts as log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            Variant::Default => info!("{}: {}", toast.title, toast.description),
            Variant::Destructive => warn!("{}: {}", toast.title, toast.description),
        }
    }
}

/// Keeps every toast it receives; clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier(Arc<Mutex<Vec<Toast>>>);

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
    pub fn destructive_count(&self) -> usize {
        self.toasts().iter().filter(|toast| toast.is_destructive()).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(toast);
    }
}
