//! Turning arena pairs into chat commands.

use std::io::{self, Write};

use crate::arena::ArenaSequence;
use crate::input::{InputSink, Key, SinkError};

/// Consumer of arena size pairs.
pub trait Emit {
    fn emit(&mut self, x: i32, y: i32);
}

/// Pure: the chat command for one arena size pair.
pub fn format_arena_size(x: i32, y: i32) -> String {
    format!("$arena size {x} {y}")
}

/// Open chat, type `command`, submit.
pub fn send_chat(sink: &mut dyn InputSink, command: &str) -> Result<(), SinkError> {
    sink.tap(Key::Return)?;
    sink.type_str(command)?;
    sink.tap(Key::Return)
}

/// Sends each pair as `$arena size x y` through an input sink.
///
/// Posting is fire-and-forget: a failed command is logged and counted, and the
/// run carries on with the next pair.
pub struct ChatEmitter<'a> {
    sink: &'a mut dyn InputSink,
    failures: u64,
}

impl<'a> ChatEmitter<'a> {
    pub fn new(sink: &'a mut dyn InputSink) -> Self {
        Self { sink, failures: 0 }
    }

    /// Commands that could not be posted.
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

impl Emit for ChatEmitter<'_> {
    fn emit(&mut self, x: i32, y: i32) {
        let command = format_arena_size(x, y);
        if let Err(e) = send_chat(self.sink, &command) {
            self.failures += 1;
            tracing::warn!("Failed to send '{}': {}", command, e);
        }
    }
}

/// Write `count` arena commands from `sequence`, one per line.
pub fn write_script<W: Write>(
    sequence: &mut ArenaSequence,
    count: u64,
    out: &mut W,
) -> io::Result<()> {
    for _ in 0..count {
        let (x, y) = sequence.next_pair();
        writeln!(out, "{}", format_arena_size(x, y))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Variant, create_sequencer};
    use crate::input::{DryRunSink, Result};

    struct FailingSink;

    impl InputSink for FailingSink {
        fn press(&mut self, _key: Key) -> Result<()> {
            Err(SinkError::Inject("denied".to_string()))
        }

        fn release(&mut self, _key: Key) -> Result<()> {
            Err(SinkError::Inject("denied".to_string()))
        }

        fn type_char(&mut self, _c: char) -> Result<()> {
            Err(SinkError::Inject("denied".to_string()))
        }
    }

    #[test]
    fn test_format_arena_size() {
        assert_eq!(format_arena_size(2, 1024), "$arena size 2 1024");
    }

    #[test]
    fn test_chat_emitter_sends_return_text_return() {
        let mut sink = DryRunSink::new(Vec::new());
        {
            let mut emitter = ChatEmitter::new(&mut sink);
            emitter.emit(4, 1022);
            assert_eq!(emitter.failures(), 0);
        }
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "tap Return\ntext $arena size 4 1022\ntap Return\n");
    }

    #[test]
    fn test_chat_emitter_counts_failures_and_continues() {
        let mut sink = FailingSink;
        let mut emitter = ChatEmitter::new(&mut sink);
        emitter.emit(2, 2);
        emitter.emit(4, 4);
        assert_eq!(emitter.failures(), 2);
    }

    #[test]
    fn test_write_script() {
        let mut seq = create_sequencer(Variant::InversePhase, 2, None).unwrap();
        let mut out = Vec::new();
        write_script(&mut seq, 3, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "$arena size 2 1024\n$arena size 4 1022\n$arena size 6 1020\n"
        );
    }

    #[test]
    fn test_write_script_continues_sequence() {
        let mut seq = create_sequencer(Variant::InPhase, 2, None).unwrap();
        let mut out = Vec::new();
        write_script(&mut seq, 2, &mut out).unwrap();
        write_script(&mut seq, 1, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "$arena size 2 2\n$arena size 4 4\n$arena size 6 6\n"
        );
    }

    #[test]
    fn test_write_script_zero_count() {
        let mut seq = create_sequencer(Variant::InPhase, 2, None).unwrap();
        let mut out = Vec::new();
        write_script(&mut seq, 0, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
