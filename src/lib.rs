//! arrastools library - the pieces behind the `arrastools` binary.
//!
//! The binary (main.rs) only parses arguments, installs the Ctrl+C handler and
//! picks an input sink; everything testable lives here.

pub mod arena;
pub mod benchmark;
pub mod cancel;
pub mod catalog;
pub mod config;
pub mod emit;
pub mod input;
pub mod logging;
pub mod routine;
pub mod unicode;

// Re-export commonly used types
pub use arena::{ArenaError, ArenaSequence, RunOptions, Variant, create_sequencer, run};
pub use cancel::CancellationToken;
pub use emit::{ChatEmitter, Emit};
pub use input::{InputSink, Key, SinkError};
pub use routine::{Routine, RoutineOptions, RoutineReport, execute};
