use std::io::Write;

use super::{InputSink, Key, Result};

/// Describes every event on its own line instead of injecting it.
///
/// Line format: `press <key>`, `release <key>`, `tap <key>`, `type <char>`,
/// `text <string>`.
pub struct DryRunSink<W: Write> {
    out: W,
}

impl<W: Write> DryRunSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> InputSink for DryRunSink<W> {
    fn press(&mut self, key: Key) -> Result<()> {
        writeln!(self.out, "press {key}")?;
        Ok(())
    }

    fn release(&mut self, key: Key) -> Result<()> {
        writeln!(self.out, "release {key}")?;
        Ok(())
    }

    fn tap(&mut self, key: Key) -> Result<()> {
        writeln!(self.out, "tap {key}")?;
        Ok(())
    }

    fn type_char(&mut self, c: char) -> Result<()> {
        writeln!(self.out, "type {c}")?;
        Ok(())
    }

    fn type_str(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "text {text}")?;
        Ok(())
    }
}
