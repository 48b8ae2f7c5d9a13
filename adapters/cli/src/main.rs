#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Simon Says in a terminal.

mod config;
mod terminal;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    thread,
};

use anyhow::Result;
use clap::Parser;
use log::{debug, info, warn};
use simon_says_core::{Command, Level, Phase, IDLE_HEADING};
use simon_says_presentation::{dispatch, pad_pressed, start_requested, Presenter};
use simon_says_system_sequencer::SeededColors;
use simon_says_world::{self as world, query, World};

use crate::{
    config::{FileConfig, Settings},
    terminal::{press_tokens, read_line, TerminalPresenter},
};

/// Play Simon Says: watch the pads light up, then repeat the sequence.
#[derive(Debug, Parser)]
#[command(name = "simon-says", version)]
struct Args {
    /// Level 1-4, requiring 8, 14, 20 or 31 rounds.
    #[arg(long)]
    level: Option<Level>,
    /// Seed for the color sequence; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Playback speed multiplier; 2.0 plays twice as fast.
    #[arg(long)]
    speed: Option<f64>,
    /// TOML file supplying defaults for the flags and a [timing] table.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Entry point for the Simon Says command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = file.resolve(args.level, args.seed, args.speed)?;
    info!(
        "level {} (seed {:#x}, speed {})",
        settings.level, settings.seed, settings.speed
    );

    let mut world = World::new(Box::new(SeededColors::new(settings.seed)))
        .with_timing(settings.timing);
    let mut presenter = TerminalPresenter::new(io::stdout());
    let stdin = io::stdin();
    let mut input = stdin.lock();

    presenter.render_heading(IDLE_HEADING)?;
    loop {
        let Some(line) = read_line(
            &mut input,
            &mut presenter,
            "Press Enter to start, or q to quit: ",
        )?
        else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        if !play(&mut world, &settings, &mut input, &mut presenter)? {
            break;
        }
    }
    Ok(())
}

/// Runs a single game to completion; returns `false` when input ended.
fn play<R, W>(
    world: &mut World,
    settings: &Settings,
    input: &mut R,
    presenter: &mut TerminalPresenter<W>,
) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    for command in start_requested(Some(settings.level.get())) {
        submit(world, command, presenter);
    }

    while query::phase(world) != Phase::Idle {
        if query::phase(world) == Phase::PlayerTurn && query::pending_timers(world) == 0 {
            let Some(line) = read_line(input, presenter, "> ")? else {
                return Ok(false);
            };
            for token in press_tokens(&line) {
                if query::phase(world) != Phase::PlayerTurn {
                    debug!("dropping press {token:?} typed past the end of the round");
                    break;
                }
                match pad_pressed(&token) {
                    Some(command) => submit(world, command, presenter),
                    None => debug!("ignoring unknown pad {token:?}"),
                }
            }
            continue;
        }

        let Some(wait) = query::until_next_timer(world) else {
            warn!("no timer pending during {:?}", query::phase(world));
            break;
        };
        thread::sleep(wait.div_f64(settings.speed));
        submit(world, Command::Tick { dt: wait }, presenter);
    }
    Ok(true)
}

fn submit<W: Write>(world: &mut World, command: Command, presenter: &mut TerminalPresenter<W>) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    let failures = dispatch(&events, presenter);
    if failures > 0 {
        warn!("{failures} presenter callbacks failed");
    }
}
