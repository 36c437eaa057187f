//! The macro catalog.
//!
//! Every named macro is one row in [`CATALOG`]. A row's [`Body`] expands to a
//! [`Routine`] that the interpreter in [`crate::routine`] plays.

use std::time::Duration;

use serde::Serialize;

use crate::input::Key;
use crate::routine::{Count, Entry, Routine, Step};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown macro: {0} (see `arrastools list`)")]
    UnknownMacro(String),
}

/// Shape of a macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// Hold the console key, pause `lead_ms`, send `unit` `count` times,
    /// press `hold` if set (left down), release the console key. A `count` of
    /// `None` repeats until cancelled.
    Burst {
        unit: &'static str,
        count: Option<u32>,
        entry: Entry,
        delay_ms: u64,
        lead_ms: u64,
        hold: Option<Key>,
    },
    /// Shape spawner: `d`, `"fy"` x10, then `blocks` runs of fifty `f` and an
    /// `h`. With `dd`, a second console pass taps `d` and leaves `d` held.
    Shape { blocks: u32, dd: bool },
    /// Chat command sent `count` times.
    Chat { command: &'static str },
    /// `actions` played over and over until cancelled.
    Loop { actions: &'static [Action] },
}

/// One input of a [`Body::Loop`] macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press(Key),
    Release(Key),
    Tap(Key),
    PauseMs(u64),
}

impl Action {
    fn step(self) -> Step {
        match self {
            Action::Press(key) => Step::Press(key),
            Action::Release(key) => Step::Release(key),
            Action::Tap(key) => Step::Tap(key),
            Action::PauseMs(ms) => Step::pause_ms(ms),
        }
    }
}

/// Select the engineer class, drop traps and fire, then upgrade. Keys `a`,
/// `c` and `q` stay pressed between passes.
const ENGISPAM: &[Action] = &[
    Action::Tap(Key::Char(',')),
    Action::Tap(Key::Char('y')),
    Action::Tap(Key::Char('i')),
    Action::Press(Key::Console),
    Action::Press(Key::Char('a')),
    Action::Press(Key::Char('c')),
    Action::Release(Key::Console),
    Action::Press(Key::Space),
    Action::PauseMs(250),
    Action::Release(Key::Space),
    Action::Press(Key::Console),
    Action::Press(Key::Char('q')),
    Action::Release(Key::Console),
];

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroSpec {
    pub name: &'static str,
    pub about: &'static str,
    pub body: Body,
    /// When set, the macro takes an amount argument defaulting to this value.
    /// It replaces the burst count or the chat repeat count.
    pub default_amount: Option<u32>,
}

const fn burst(unit: &'static str, count: u32, entry: Entry) -> Body {
    Body::Burst {
        unit,
        count: Some(count),
        entry,
        delay_ms: 0,
        lead_ms: 10,
        hold: None,
    }
}

const CIRCLES: MacroSpec = MacroSpec {
    name: "circles",
    about: "press(`), tap(ch)*amount, release(`)",
    body: burst("ch", 210, Entry::Tap),
    default_amount: Some(210),
};

pub const CATALOG: &[MacroSpec] = &[
    MacroSpec {
        name: "wallcrash",
        about: "press(`), type(x*1800), release(`)",
        body: burst("x", 1800, Entry::Type),
        default_amount: None,
    },
    MacroSpec {
        name: "nuke",
        about: "press(`), type(wk*100), release(`)",
        body: burst("wk", 100, Entry::Type),
        default_amount: None,
    },
    MacroSpec {
        name: "shape",
        about: "press(`), type(f*5000), release(`)",
        body: burst("f", 5000, Entry::Type),
        default_amount: None,
    },
    MacroSpec {
        name: "shape2",
        about: "press(`), type(f*1000), hold(w), release(`)",
        body: Body::Burst {
            unit: "f",
            count: Some(1000),
            entry: Entry::Type,
            delay_ms: 0,
            lead_ms: 10,
            hold: Some(Key::Char('w')),
        },
        default_amount: None,
    },
    MacroSpec {
        name: "score",
        about: "press(`), type(n*20000), release(`)",
        body: burst("n", 20000, Entry::Type),
        default_amount: None,
    },
    MacroSpec {
        name: "score50m",
        about: "press(`), type(f*20), release(`)",
        body: burst("f", 20, Entry::Type),
        default_amount: None,
    },
    CIRCLES,
    MacroSpec {
        name: "walls",
        about: "press(`), type(x*210), release(`)",
        body: burst("x", 210, Entry::Type),
        default_amount: None,
    },
    MacroSpec {
        name: "circle",
        about: "press(`), type(ch), release(`)",
        body: Body::Burst {
            unit: "ch",
            count: Some(1),
            entry: Entry::Type,
            delay_ms: 0,
            lead_ms: 5,
            hold: None,
        },
        default_amount: None,
    },
    MacroSpec {
        name: "slowwall",
        about: "press(`), tap(x) with 80ms delay * 50, release(`)",
        body: Body::Burst {
            unit: "x",
            count: Some(50),
            entry: Entry::Tap,
            delay_ms: 80,
            lead_ms: 10,
            hold: None,
        },
        default_amount: None,
    },
    MacroSpec {
        name: "minicirclecrash",
        about: "press(`), tap(ch)*5000, release(`)",
        body: burst("ch", 50 * 100, Entry::Tap),
        default_amount: None,
    },
    MacroSpec {
        name: "circlecrash",
        about: "press(`), tap(ch)*32400, release(`)",
        body: burst("ch", 180 * 180, Entry::Tap),
        default_amount: None,
    },
    MacroSpec {
        name: "mcrash",
        about: "Continuous ch until Ctrl+C",
        body: Body::Burst {
            unit: "ch",
            count: None,
            entry: Entry::Tap,
            delay_ms: 0,
            lead_ms: 10,
            hold: None,
        },
        default_amount: None,
    },
    MacroSpec {
        name: "art",
        about: "Continuous ch with 20ms delay until Ctrl+C",
        body: Body::Burst {
            unit: "ch",
            count: None,
            entry: Entry::Tap,
            delay_ms: 20,
            lead_ms: 10,
            hold: None,
        },
        default_amount: None,
    },
    MacroSpec {
        name: "heal",
        about: "press(`), type(h*3000), release(`)",
        body: burst("h", 3000, Entry::Type),
        default_amount: None,
    },
    MacroSpec {
        name: "shape_small",
        about: "press(`), type(f*100), release(`)",
        body: burst("f", 100, Entry::Type),
        default_amount: None,
    },
    MacroSpec {
        name: "shape_large",
        about: "press(`), type(f*500), release(`)",
        body: burst("f", 500, Entry::Type),
        default_amount: None,
    },
    MacroSpec {
        name: "shape_q",
        about: "Shape pattern (2 iterations + d+d)",
        body: Body::Shape { blocks: 2, dd: true },
        default_amount: None,
    },
    MacroSpec {
        name: "shape_a",
        about: "Shape pattern (6 iterations + d+d)",
        body: Body::Shape { blocks: 6, dd: true },
        default_amount: None,
    },
    MacroSpec {
        name: "shape_z",
        about: "Shape pattern (10 iterations + d+d)",
        body: Body::Shape {
            blocks: 10,
            dd: true,
        },
        default_amount: None,
    },
    MacroSpec {
        name: "shape_y",
        about: "Shape pattern (2 iterations, no d+d)",
        body: Body::Shape {
            blocks: 2,
            dd: false,
        },
        default_amount: None,
    },
    MacroSpec {
        name: "shape_u",
        about: "Shape pattern (6 iterations, no d+d)",
        body: Body::Shape {
            blocks: 6,
            dd: false,
        },
        default_amount: None,
    },
    MacroSpec {
        name: "shape_i",
        about: "Shape pattern (10 iterations, no d+d)",
        body: Body::Shape {
            blocks: 10,
            dd: false,
        },
        default_amount: None,
    },
    MacroSpec {
        name: "arena_close",
        about: "Spam $arena close (default: 200)",
        body: Body::Chat {
            command: "$arena close",
        },
        default_amount: Some(200),
    },
    MacroSpec {
        name: "engispam",
        about: "Engineer trap spam until Ctrl+C",
        body: Body::Loop { actions: ENGISPAM },
        default_amount: None,
    },
];

/// Look up a macro by name.
pub fn find(name: &str) -> Result<&'static MacroSpec, CatalogError> {
    CATALOG
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| CatalogError::UnknownMacro(name.to_string()))
}

/// Build the routine for `name`.
///
/// `amount` overrides the default amount of macros that take one and is
/// ignored by the rest. Zero falls back to the default.
pub fn routine(name: &str, amount: Option<u32>) -> Result<Routine, CatalogError> {
    Ok(find(name)?.routine(amount))
}

/// `circles` with an explicit amount.
pub fn circles(amount: u32) -> Routine {
    CIRCLES.routine(Some(amount))
}

impl MacroSpec {
    pub fn routine(&self, amount: Option<u32>) -> Routine {
        let amount = self
            .default_amount
            .map(|default| amount.filter(|&a| a > 0).unwrap_or(default));

        let steps = match self.body {
            Body::Burst {
                unit,
                count,
                entry,
                delay_ms,
                lead_ms,
                hold,
            } => {
                let count = match amount.or(count) {
                    Some(n) => Count::Times(n),
                    None => Count::UntilCancelled,
                };
                let mut steps = vec![
                    Step::Press(Key::Console),
                    Step::pause_ms(lead_ms),
                    Step::Repeat {
                        unit: unit.to_string(),
                        count,
                        entry,
                        delay: Duration::from_millis(delay_ms),
                    },
                ];
                if let Some(key) = hold {
                    steps.push(Step::Press(key));
                }
                steps.push(Step::Release(Key::Console));
                steps
            }
            Body::Shape { blocks, dd } => shape_steps(blocks, dd),
            Body::Chat { command } => vec![Step::Chat {
                command: command.to_string(),
                count: Count::Times(amount.unwrap_or(1)),
            }],
            Body::Loop { actions } => vec![Step::Loop {
                steps: actions.iter().map(|action| action.step()).collect(),
                count: Count::UntilCancelled,
            }],
        };

        Routine::new(self.name, steps)
    }
}

fn shape_steps(blocks: u32, dd: bool) -> Vec<Step> {
    let block = format!("{}h", "f".repeat(50));
    let mut steps = vec![
        Step::Press(Key::Console),
        Step::pause_ms(5),
        Step::Tap(Key::Char('d')),
        Step::repeat("fy", Count::Times(10), Entry::Type),
        Step::repeat(block, Count::Times(blocks), Entry::Type),
        Step::Release(Key::Console),
    ];
    if dd {
        steps.extend([
            Step::Press(Key::Console),
            Step::Tap(Key::Char('d')),
            Step::Press(Key::Char('d')),
            Step::Release(Key::Console),
        ]);
    }
    steps
}

/// Catalog row as shown by `list --json`.
#[derive(Debug, Serialize)]
pub struct MacroSummary {
    pub name: &'static str,
    pub about: &'static str,
    pub default_amount: Option<u32>,
    /// `None` for macros that run until cancelled.
    pub units: Option<u64>,
}

pub fn summaries() -> Vec<MacroSummary> {
    CATALOG
        .iter()
        .map(|spec| MacroSummary {
            name: spec.name,
            about: spec.about,
            default_amount: spec.default_amount,
            units: spec.routine(None).planned_units(),
        })
        .collect()
}
