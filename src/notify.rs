//! Toast-style notifications emitted by list operations.

use std::{collections::VecDeque, fmt, sync::Arc};

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Success,
    Warn,
    Error,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: Kind,
    pub title: String,
    pub message: String,
}

/// Fire-and-forget sink for `(kind, title, message)` notifications.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, kind: Kind, title: &str, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, kind: Kind, title: &str, message: &str) {
        (**self).notify(kind, title, message);
    }
}

/// Writes notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: Kind, title: &str, message: &str) {
        match kind {
            Kind::Success => log::info!("{title} {message}"),
            Kind::Warn => log::warn!("{title} {message}"),
            Kind::Error => log::error!("{title} {message}"),
        }
    }
}

/// Number of notifications a [`History`] keeps by default.
pub const DEFAULT_HISTORY: usize = 100;

/// Keeps the most recent notifications, optionally forwarding each one.
pub struct History<N = LogNotifier> {
    capacity: usize,
    entries: Mutex<VecDeque<Notification>>,
    forward: Option<N>,
}

impl History<LogNotifier> {
    /// A history of [`DEFAULT_HISTORY`] entries that forwards nothing.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            forward: None,
        }
    }
}

impl Default for History<LogNotifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> History<N> {
    /// Also passes each notification to `sink`.
    pub fn forwarding<M: Notifier>(self, sink: M) -> History<M> {
        History {
            capacity: self.capacity,
            entries: self.entries,
            forward: Some(sink),
        }
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.entries.lock().iter().filter(|n| n.kind == kind).count()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<N: Notifier> Notifier for History<N> {
    fn notify(&self, kind: Kind, title: &str, message: &str) {
        if self.capacity > 0 {
            let mut entries = self.entries.lock();
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(Notification {
                kind,
                title: title.to_owned(),
                message: message.to_owned(),
            });
        }
        if let Some(forward) = &self.forward {
            forward.notify(kind, title, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded() {
        let history = History::with_capacity(2);
        history.notify(Kind::Success, "a", "1");
        history.notify(Kind::Warn, "b", "2");
        history.notify(Kind::Error, "c", "3");

        let titles: Vec<_> = history.entries().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["b", "c"]);
        assert_eq!(history.count(Kind::Success), 0);
        assert_eq!(history.count(Kind::Error), 1);
    }

    #[test]
    fn history_forwards() {
        let inner = Arc::new(History::new());
        let outer = History::with_capacity(0).forwarding(Arc::clone(&inner));
        outer.notify(Kind::Warn, "Connection Issue.", "timeout");

        assert!(outer.entries().is_empty());
        assert_eq!(
            inner.entries(),
            [Notification {
                kind: Kind::Warn,
                title: "Connection Issue.".into(),
                message: "timeout".into(),
            }]
        );
    }
}
