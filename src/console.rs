//! User-facing console log.
//!
//! The viewer keeps two log sinks: the developer sink (the `log` crate,
//! file/line tagged, unbounded) and this console, a capped ring buffer of
//! user-facing messages shown in the UI. The console is an explicitly
//! constructed value passed by reference to whoever needs to report to the
//! user; there is no global instance.

use std::collections::VecDeque;

/// Most-recent messages retained; the oldest entry is evicted first.
pub const CONSOLE_CAPACITY: usize = 1000;

#[derive(Debug, Default)]
pub struct Console {
    entries: VecDeque<String>,
}

impl Console {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Record a user-facing message. Also forwarded to the developer sink.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.entries.push_back(message);
        if self.entries.len() > CONSOLE_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
