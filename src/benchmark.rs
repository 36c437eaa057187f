//! Circle spawn benchmark.
//!
//! Plays `circles` with the given amount, then waits for Enter so the timer
//! covers however long the game takes to spawn everything. The result is
//! posted to chat as two lines: `> [<ms>ms] <` and `> [<circles/s>] <`.

use std::io::BufRead;
use std::time::{Duration, Instant};

use tracing::instrument;

use crate::cancel::CancellationToken;
use crate::catalog;
use crate::input::{InputSink, Key, SinkError};
use crate::routine::{self, Routine, RoutineOptions, Step};

pub const DEFAULT_AMOUNT: u32 = 5000;

/// Circles to spawn: `amount` unless it is missing or zero.
pub fn resolve_amount(amount: Option<u32>) -> u32 {
    amount.filter(|&a| a > 0).unwrap_or(DEFAULT_AMOUNT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkResult {
    pub amount: u32,
    pub elapsed: Duration,
}

impl BenchmarkResult {
    pub fn millis(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Circles per second over whole elapsed milliseconds; 0 if no time passed.
    pub fn rate(&self) -> f64 {
        let seconds = self.millis() as f64 / 1000.0;
        if seconds > 0.0 {
            f64::from(self.amount) / seconds
        } else {
            0.0
        }
    }

    /// Chat lines posting this result.
    pub fn chat_routine(&self) -> Routine {
        Routine::new(
            "benchmark_results",
            vec![
                Step::pause_ms(200),
                Step::Tap(Key::Return),
                Step::pause_ms(150),
                Step::Text(format!("> [{}ms] <", self.millis())),
                Step::pause_ms(100),
                Step::Tap(Key::Return),
                Step::Tap(Key::Return),
                Step::pause_ms(100),
                Step::Text(format!("> [{}] <", self.rate() as u64)),
                Step::pause_ms(100),
                Step::Tap(Key::Return),
            ],
        )
    }
}

/// Time `circles * amount`, stopping the clock when a line arrives on `input`.
#[instrument(skip(sink, options, token, input))]
pub fn run_benchmark<R: BufRead>(
    amount: u32,
    sink: &mut dyn InputSink,
    options: RoutineOptions,
    token: &CancellationToken,
    input: &mut R,
) -> Result<BenchmarkResult, SinkError> {
    let amount = resolve_amount(Some(amount));
    let circles = catalog::circles(amount);

    let start = Instant::now();
    routine::execute(&circles, sink, options, token)?;

    eprintln!("\nPress Enter when done to see results...");
    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(BenchmarkResult {
        amount,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DryRunSink;
    use std::io::Cursor;

    #[test]
    fn test_resolve_amount() {
        assert_eq!(resolve_amount(None), DEFAULT_AMOUNT);
        assert_eq!(resolve_amount(Some(0)), DEFAULT_AMOUNT);
        assert_eq!(resolve_amount(Some(120)), 120);
    }

    #[test]
    fn test_rate() {
        let result = BenchmarkResult {
            amount: 5000,
            elapsed: Duration::from_millis(2500),
        };
        assert_eq!(result.millis(), 2500);
        assert!((result.rate() - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rate_zero_elapsed() {
        let result = BenchmarkResult {
            amount: 10,
            elapsed: Duration::from_micros(300),
        };
        assert_eq!(result.rate(), 0.0);
    }

    #[test]
    fn test_chat_routine_text() {
        let result = BenchmarkResult {
            amount: 100,
            elapsed: Duration::from_millis(500),
        };
        let texts: Vec<_> = result
            .chat_routine()
            .steps
            .into_iter()
            .filter_map(|step| match step {
                Step::Text(text) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["> [500ms] <", "> [200] <"]);
    }

    #[test]
    fn test_run_benchmark_plays_circles_and_waits_for_enter() {
        let mut sink = DryRunSink::new(Vec::new());
        let options = RoutineOptions {
            char_delay: Duration::ZERO,
        };
        let mut input = Cursor::new(b"\n".to_vec());

        let result =
            run_benchmark(3, &mut sink, options, &CancellationToken::new(), &mut input).unwrap();
        assert_eq!(result.amount, 3);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.matches("tap c").count(), 3);
        assert_eq!(out.matches("tap h").count(), 3);
    }
}
