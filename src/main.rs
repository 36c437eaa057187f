use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use arrastools::arena::{self, ArenaSequence, RunOptions, Variant};
use arrastools::config::{self, Config};
use arrastools::emit::{self, ChatEmitter};
use arrastools::input::{self, DryRunSink, InputSink, NativeSink};
use arrastools::routine::{self, Routine, RoutineOptions};
use arrastools::{CancellationToken, benchmark, catalog, logging, unicode};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "arrastools")]
#[command(version)]
#[command(about = "Keyboard macros and arena automation for the arras.io console")]
struct Args {
    /// Print input events to stdout instead of injecting them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file [default: ~/.arrastools/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Arena size automation ($arena size x y)
    Arena {
        /// 1/random, 2/in-phase, 3/inverse-phase
        variant: Variant,

        /// Max commands before stopping (0 = unlimited)
        #[arg(long)]
        max: Option<u64>,

        /// Commands per second (0 = unlimited)
        #[arg(long)]
        rate: Option<u32>,

        /// Step size for the bounce variants (positive, even)
        #[arg(long, allow_negative_numbers = true)]
        step: Option<i32>,

        /// Seed for the random variant
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a macro from the catalog
    Run {
        /// Macro name (see `list`)
        name: String,

        /// Amount for macros that take one (circles, arena_close)
        amount: Option<u32>,
    },

    /// List available macros
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print arena commands to stdout without sending them
    Script {
        variant: Variant,

        /// Number of commands
        #[arg(long)]
        count: u64,

        #[arg(long, allow_negative_numbers = true)]
        step: Option<i32>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Time the circles macro and post the result in chat
    Benchmark {
        /// Circles to spawn [default: 5000]
        amount: Option<u32>,
    },

    /// Type characters given as 4-hex-digit code point groups
    Unicode {
        /// e.g. 011156F2C11A; random groups when omitted
        hex: Option<String>,

        /// Random groups to generate without HEX
        #[arg(long, default_value_t = unicode::DEFAULT_BLOCKS)]
        blocks: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Work resolved from the command line before any input is injected.
enum Session {
    Arena {
        variant: Variant,
        step: i32,
        sequence: ArenaSequence,
        options: RunOptions,
    },
    Routine {
        routine: Routine,
    },
    Benchmark {
        amount: u32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config(),
    };

    match args.command {
        Command::List { json } => list_macros(json),
        Command::Script {
            variant,
            count,
            step,
            seed,
        } => {
            let step = arena::normalize_step(step.or(config.step).unwrap_or(arena::DEFAULT_STEP));
            let mut sequence = arena::create_sequencer(variant, step, seed.or(config.seed))?;
            let mut out = io::stdout().lock();
            emit::write_script(&mut sequence, count, &mut out)?;
            Ok(())
        }
        command => {
            let session = plan_session(command, &config)?;
            run_session(session, &config, args.dry_run)
        }
    }
}

/// Validate arguments and build the work, so bad input is reported before
/// the input sink is opened.
fn plan_session(command: Command, config: &Config) -> Result<Session> {
    let session = match command {
        Command::Arena {
            variant,
            max,
            rate,
            step,
            seed,
        } => {
            let step = arena::normalize_step(step.or(config.step).unwrap_or(arena::DEFAULT_STEP));
            Session::Arena {
                variant,
                step,
                sequence: arena::create_sequencer(variant, step, seed.or(config.seed))?,
                options: RunOptions {
                    max_count: max.or(config.max_commands).unwrap_or(0),
                    rate_limit: rate.or(config.rate_limit).unwrap_or(0),
                },
            }
        }
        Command::Run { name, amount } => Session::Routine {
            routine: catalog::routine(&name, amount)?,
        },
        Command::Benchmark { amount } => Session::Benchmark {
            amount: benchmark::resolve_amount(amount),
        },
        Command::Unicode { hex, blocks, seed } => {
            let groups = match hex {
                Some(hex) => unicode::parse_groups(&hex)?,
                None => {
                    let mut rng = match seed {
                        Some(seed) => StdRng::seed_from_u64(seed),
                        None => StdRng::from_entropy(),
                    };
                    unicode::random_groups(&mut rng, blocks)
                }
            };
            let text = unicode::decode(&groups);
            eprintln!("unicode blocks: {} -> '{}'", groups.join(" "), text);
            Session::Routine {
                routine: unicode::routine(&text),
            }
        }
        Command::List { .. } | Command::Script { .. } => {
            anyhow::bail!("command does not inject input")
        }
    };
    Ok(session)
}

/// Commands that inject input: install the stop handler, open the sink, play.
fn run_session(session: Session, config: &Config, dry_run: bool) -> Result<()> {
    let token = CancellationToken::new();
    install_stop_handler(&token)?;

    let mut sink = open_sink(dry_run)?;
    let options = RoutineOptions {
        char_delay: if dry_run {
            Duration::ZERO
        } else {
            config.char_delay()
        },
    };

    eprintln!(
        "{} v{}{}",
        "arrastools".bold(),
        env!("CARGO_PKG_VERSION").cyan(),
        if dry_run { " | dry run".yellow().to_string() } else { String::new() }
    );
    eprintln!("Press Ctrl+C to stop");
    if !dry_run {
        thread::sleep(config.start_delay());
    }

    match session {
        Session::Arena {
            variant,
            step,
            mut sequence,
            options,
        } => run_arena(sink.as_mut(), variant, step, &mut sequence, options, &token),
        Session::Routine { routine } => {
            eprintln!("Starting: {}", routine.name.green());
            let report = routine::execute(&routine, sink.as_mut(), options, &token)
                .with_context(|| format!("Macro {} failed", routine.name))?;
            if report.cancelled {
                eprintln!("[interrupted after {} units]", report.units);
            }
        }
        Session::Benchmark { amount } => {
            eprintln!("benchmark: Timing circles*{amount}");
            let result = benchmark::run_benchmark(
                amount,
                sink.as_mut(),
                options,
                &token,
                &mut io::stdin().lock(),
            )?;
            eprintln!("{} circles in {} ms", result.amount, result.millis());
            eprintln!("Speed: {:.1} circles/second", result.rate());
            routine::execute(&result.chat_routine(), sink.as_mut(), options, &token)?;
        }
    }

    eprintln!("\n{}", "Completed.".green());
    Ok(())
}

fn run_arena(
    sink: &mut dyn InputSink,
    variant: Variant,
    step: i32,
    sequence: &mut ArenaSequence,
    options: RunOptions,
    token: &CancellationToken,
) {
    if variant.uses_step() {
        eprintln!("Starting: {} (step={})", variant.description().green(), step);
    } else {
        eprintln!("Starting: {}", variant.description().green());
    }
    if options.max_count > 0 {
        eprintln!("Max commands: {}", options.max_count);
    }
    if options.rate_limit > 0 {
        eprintln!("Rate limit: {} cmd/s", options.rate_limit);
    }

    let mut emitter = ChatEmitter::new(sink);
    let sent = arena::run(sequence, &mut emitter, options, token);

    if emitter.failures() > 0 {
        eprintln!(
            "{}",
            format!("[{} of {} commands failed to send]", emitter.failures(), sent).red()
        );
    }
    eprintln!("Sent {} commands", sent.to_string().cyan());
}

fn install_stop_handler(token: &CancellationToken) -> Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        eprintln!("\n{}", "Stopping...".yellow());
        token.cancel();
    })
    .context("Failed to install Ctrl+C handler")
}

fn open_sink(dry_run: bool) -> Result<Box<dyn InputSink>> {
    if dry_run {
        return Ok(Box::new(DryRunSink::new(io::stdout())));
    }
    let sink = NativeSink::open().context(input::permission_hint())?;
    Ok(Box::new(sink))
}

fn list_macros(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog::summaries())?);
        return Ok(());
    }

    println!("Arena automation:");
    println!(
        "  {:<16} {}",
        "arena".cyan(),
        "arena <1|2|3> [--max N] [--rate N] [--step N]"
    );
    println!(
        "  {:<16} {}",
        "unicode".cyan(),
        "unicode [HEX] [--blocks N] [--seed N]"
    );
    println!();
    println!("Macros (arrastools run <name> [amount]):");
    for spec in catalog::CATALOG {
        let name = match spec.default_amount {
            Some(_) => format!("{} [amt]", spec.name),
            None => spec.name.to_string(),
        };
        println!("  {:<16} {}", name.cyan(), spec.about);
    }
    Ok(())
}
