//! Common test utilities shared across integration tests.
//!
//! Recording doubles for the two seams the core talks through: [`Emit`] for
//! arena pairs and [`InputSink`] for raw key events.

use arrastools::input::Result;
use arrastools::{CancellationToken, Emit, InputSink, Key, SinkError};

/// A recorded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Event {
    Press(Key),
    Release(Key),
    Tap(Key),
    Type(char),
    Text(String),
}

/// Input sink that keeps every event in memory.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingSink {
    pub events: Vec<Event>,
    /// Cancel this token once `events` reaches the given length.
    pub cancel_at: Option<(usize, CancellationToken)>,
    /// Refuse events once `events` holds this many.
    pub fail_at: Option<usize>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_at(len: usize, token: &CancellationToken) -> Self {
        Self {
            cancel_at: Some((len, token.clone())),
            ..Self::default()
        }
    }

    /// Fails every event after the first `len`, except releases.
    pub fn failing_at(len: usize) -> Self {
        Self {
            fail_at: Some(len),
            ..Self::default()
        }
    }

    /// Characters typed or tapped, in order.
    pub fn keystrokes(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Type(c) => Some(*c),
                Event::Tap(Key::Char(c)) => Some(*c),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, event: Event) -> Result<()> {
        let releasing = matches!(event, Event::Release(_));
        if !releasing && self.fail_at.is_some_and(|len| self.events.len() >= len) {
            return Err(SinkError::Inject("input refused".to_string()));
        }
        self.events.push(event);
        if let Some((len, token)) = &self.cancel_at {
            if self.events.len() >= *len {
                token.cancel();
            }
        }
        Ok(())
    }
}

impl InputSink for RecordingSink {
    fn press(&mut self, key: Key) -> Result<()> {
        self.record(Event::Press(key))
    }

    fn release(&mut self, key: Key) -> Result<()> {
        self.record(Event::Release(key))
    }

    fn tap(&mut self, key: Key) -> Result<()> {
        self.record(Event::Tap(key))
    }

    fn type_char(&mut self, c: char) -> Result<()> {
        self.record(Event::Type(c))
    }

    fn type_str(&mut self, text: &str) -> Result<()> {
        self.record(Event::Text(text.to_string()))
    }
}

/// Emitter that records pairs and can cancel a token after `k` of them.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingEmitter {
    pub pairs: Vec<(i32, i32)>,
    pub cancel_after: Option<(usize, CancellationToken)>,
}

#[allow(dead_code)]
impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(k: usize, token: &CancellationToken) -> Self {
        Self {
            pairs: Vec::new(),
            cancel_after: Some((k, token.clone())),
        }
    }
}

impl Emit for RecordingEmitter {
    fn emit(&mut self, x: i32, y: i32) {
        self.pairs.push((x, y));
        if let Some((k, token)) = &self.cancel_after {
            if self.pairs.len() >= *k {
                token.cancel();
            }
        }
    }
}
