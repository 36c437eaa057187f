//! Routine interpreter.
//!
//! A [`Routine`] is a flat list of input [`Step`]s. Every macro in the catalog
//! is a routine; [`execute`] is the single loop that plays them.
//!
//! Only the repeating steps poll the cancellation token. Press/release steps
//! always run, so a console key held at the start of a routine is released
//! even when the user hits Ctrl+C halfway through. If the sink fails instead,
//! the keys still held are released before the error is returned.

use std::thread;
use std::time::Duration;

use tracing::instrument;

use crate::cancel::CancellationToken;
use crate::emit::send_chat;
use crate::input::{InputSink, Key, SinkError};

/// How many times a repeating step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Times(u32),
    UntilCancelled,
}

/// How each character of a repeated unit is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Text input event.
    Type,
    /// Key press and release.
    Tap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Press(Key),
    Release(Key),
    Tap(Key),
    Pause(Duration),
    /// Send `unit` `count` times, sleeping `delay` after each unit.
    Repeat {
        unit: String,
        count: Count,
        entry: Entry,
        delay: Duration,
    },
    /// Type a string in one go, no per-character pacing.
    Text(String),
    /// Return, `command`, Return; `count` times.
    Chat { command: String, count: Count },
    /// Play `steps` `count` times. Each pass counts as one unit.
    Loop { steps: Vec<Step>, count: Count },
}

impl Step {
    pub fn pause_ms(ms: u64) -> Self {
        Step::Pause(Duration::from_millis(ms))
    }

    pub fn repeat(unit: impl Into<String>, count: Count, entry: Entry) -> Self {
        Step::Repeat {
            unit: unit.into(),
            count,
            entry,
            delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Routine {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Units the routine sends when it runs to completion, `None` if unbounded.
    pub fn planned_units(&self) -> Option<u64> {
        self.steps.iter().try_fold(0u64, |total, step| match step {
            Step::Repeat {
                count: Count::UntilCancelled,
                ..
            }
            | Step::Chat {
                count: Count::UntilCancelled,
                ..
            }
            | Step::Loop {
                count: Count::UntilCancelled,
                ..
            } => None,
            Step::Repeat {
                count: Count::Times(n),
                ..
            }
            | Step::Chat {
                count: Count::Times(n),
                ..
            }
            | Step::Loop {
                count: Count::Times(n),
                ..
            } => Some(total + u64::from(*n)),
            _ => Some(total),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutineOptions {
    /// Pause after every typed or tapped character of a repeated unit.
    pub char_delay: Duration,
}

impl Default for RoutineOptions {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutineReport {
    /// Units sent by repeating steps.
    pub units: u64,
    /// A repeating step stopped because the token was cancelled.
    pub cancelled: bool,
}

/// Play `routine` against `sink`.
///
/// A sink error aborts the routine and is returned. Before returning it, every
/// key the routine pressed and had not released yet is released, so a failed
/// macro never leaves the console key down.
#[instrument(skip_all, fields(routine = %routine.name))]
pub fn execute(
    routine: &Routine,
    sink: &mut dyn InputSink,
    options: RoutineOptions,
    token: &CancellationToken,
) -> Result<RoutineReport, SinkError> {
    let mut player = Player {
        sink,
        options,
        token,
        report: RoutineReport::default(),
        held: Vec::new(),
    };

    if let Err(e) = player.play(&routine.steps) {
        tracing::warn!("Routine {} aborted: {}", routine.name, e);
        player.release_held();
        return Err(e);
    }

    let report = player.report;
    tracing::debug!(units = report.units, cancelled = report.cancelled, "routine finished");
    Ok(report)
}

struct Player<'s, 't> {
    sink: &'s mut dyn InputSink,
    options: RoutineOptions,
    token: &'t CancellationToken,
    report: RoutineReport,
    /// Pressed and not yet released, in press order.
    held: Vec<Key>,
}

impl Player<'_, '_> {
    fn play(&mut self, steps: &[Step]) -> Result<(), SinkError> {
        for step in steps {
            match step {
                Step::Press(key) => {
                    self.sink.press(*key)?;
                    if !self.held.contains(key) {
                        self.held.push(*key);
                    }
                }
                Step::Release(key) => {
                    self.sink.release(*key)?;
                    self.held.retain(|held| held != key);
                }
                Step::Tap(key) => self.sink.tap(*key)?,
                Step::Pause(duration) => thread::sleep(*duration),
                Step::Text(text) => self.sink.type_str(text)?,
                Step::Repeat {
                    unit,
                    count,
                    entry,
                    delay,
                } => self.repeat(*count, |player| {
                    player.send_unit(unit, *entry)?;
                    if !delay.is_zero() {
                        thread::sleep(*delay);
                    }
                    Ok(())
                })?,
                Step::Chat { command, count } => {
                    self.repeat(*count, |player| send_chat(player.sink, command))?
                }
                Step::Loop { steps, count } => self.repeat(*count, |player| player.play(steps))?,
            }
        }
        Ok(())
    }

    /// Run `body` per `count`, polling the token before each unit.
    fn repeat<F>(&mut self, count: Count, mut body: F) -> Result<(), SinkError>
    where
        F: FnMut(&mut Self) -> Result<(), SinkError>,
    {
        let limit = match count {
            Count::Times(n) => Some(u64::from(n)),
            Count::UntilCancelled => None,
        };
        let mut sent: u64 = 0;

        while limit.is_none_or(|limit| sent < limit) {
            if self.token.is_cancelled() {
                self.report.cancelled = true;
                return Ok(());
            }
            body(self)?;
            sent += 1;
            self.report.units += 1;
        }
        Ok(())
    }

    fn send_unit(&mut self, unit: &str, entry: Entry) -> Result<(), SinkError> {
        for c in unit.chars() {
            match entry {
                Entry::Type => self.sink.type_char(c)?,
                Entry::Tap => self.sink.tap(Key::Char(c))?,
            }
            if !self.options.char_delay.is_zero() {
                thread::sleep(self.options.char_delay);
            }
        }
        Ok(())
    }

    /// Best effort: a failing sink may refuse these too.
    fn release_held(&mut self) {
        let held = std::mem::take(&mut self.held);
        for key in held.into_iter().rev() {
            if let Err(e) = self.sink.release(key) {
                tracing::warn!("Failed to release {}: {}", key, e);
            }
        }
    }
}
