//! Synthetic keyboard input.
//!
//! Everything that posts events to the OS goes through [`InputSink`]. The
//! binary picks an implementation once at startup:
//!
//! - [`NativeSink`]: real injection through enigo.
//! - [`DryRunSink`]: writes one line per event to a writer instead.

mod dry_run;
mod native;

pub use dry_run::DryRunSink;
pub use native::{NativeSink, permission_hint};

/// Input sink error types.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Input injection unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to inject input: {0}")]
    Inject(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SinkError>;

/// Keys the macros touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Opens and submits the chat box.
    Return,
    Space,
    /// Backtick. Held while typing to route keys to the game's command console.
    Console,
    Char(char),
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Return => write!(f, "Return"),
            Key::Space => write!(f, "Space"),
            Key::Console => write!(f, "`"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Capability interface over OS-level input injection.
///
/// `type_char` sends a character as text input; `tap` presses and releases
/// the physical key. The game treats both as keystrokes but some platforms
/// deliver them differently.
pub trait InputSink {
    fn press(&mut self, key: Key) -> Result<()>;

    fn release(&mut self, key: Key) -> Result<()>;

    fn tap(&mut self, key: Key) -> Result<()> {
        self.press(key)?;
        self.release(key)
    }

    fn type_char(&mut self, c: char) -> Result<()>;

    /// Type a whole string without per-character pacing.
    fn type_str(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.type_char(c)?;
        }
        Ok(())
    }
}
