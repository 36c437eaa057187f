use enigo::{Direction, Enigo, Keyboard, Settings};

use super::{InputSink, Key, Result, SinkError};

/// Injects real input events through enigo.
///
/// Opening the sink is the one permission check a run gets: on macOS it fails
/// without the Accessibility permission, on Linux without a reachable X
/// display. Later failures surface per event.
pub struct NativeSink {
    enigo: Enigo,
}

impl NativeSink {
    pub fn open() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        tracing::debug!("native input sink opened");
        Ok(Self { enigo })
    }

    fn key(&mut self, key: Key, direction: Direction) -> Result<()> {
        let key = match key {
            Key::Return => enigo::Key::Return,
            Key::Space => enigo::Key::Space,
            Key::Console => enigo::Key::Unicode('`'),
            Key::Char(c) => enigo::Key::Unicode(c),
        };
        self.enigo
            .key(key, direction)
            .map_err(|e| SinkError::Inject(e.to_string()))
    }
}

impl InputSink for NativeSink {
    fn press(&mut self, key: Key) -> Result<()> {
        self.key(key, Direction::Press)
    }

    fn release(&mut self, key: Key) -> Result<()> {
        self.key(key, Direction::Release)
    }

    fn tap(&mut self, key: Key) -> Result<()> {
        self.key(key, Direction::Click)
    }

    fn type_char(&mut self, c: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.type_str(c.encode_utf8(&mut buf))
    }

    fn type_str(&mut self, text: &str) -> Result<()> {
        self.enigo
            .text(text)
            .map_err(|e| SinkError::Inject(e.to_string()))
    }
}

/// Hint printed when [`NativeSink::open`] fails.
pub fn permission_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "Grant access in System Settings > Privacy & Security > Accessibility"
    } else if cfg!(target_os = "linux") {
        "Make sure X11 is running and DISPLAY is set"
    } else {
        "Make sure this process may send input events"
    }
}
