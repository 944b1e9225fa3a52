use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

impl StatusLevel {
    fn ttl(self) -> Duration {
        match self {
            StatusLevel::Info => Duration::from_secs(3),
            StatusLevel::Warning => Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub timestamp: Instant,
}

impl StatusMessage {
    fn is_expired(&self) -> bool {
        self.timestamp.elapsed() > self.level.ttl()
    }
}

/// Short-lived messages shown under the keyboard ("E3 released", "octave C4").
pub struct StatusBar {
    messages: Vec<StatusMessage>,
    max: usize,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max: 16,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.messages.push(StatusMessage {
            text: text.into(),
            level,
            timestamp: Instant::now(),
        });
        if self.messages.len() > self.max {
            self.messages.remove(0);
        }
    }

    /// Returns the most recent non-expired message, if any.
    pub fn current(&self) -> Option<&StatusMessage> {
        self.messages.iter().rev().find(|m| !m.is_expired())
    }
}
