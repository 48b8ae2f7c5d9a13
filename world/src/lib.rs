#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round engine for Simon Says.
//!
//! The [`World`] owns the reference and candidate sequences, the round
//! counter, the configured round target and the virtual [`Timeline`] that
//! paces playback. Adapters mutate it exclusively through [`apply`] and read
//! it through the [`query`] module.

pub mod timeline;

use std::time::Duration;

use log::{debug, trace, warn};
use simon_says_core::{
    ColorSource, Command, Event, Generation, Level, LevelError, Outcome, PadColor, Phase,
    RoundTarget, Timing, UiMode, COMPUTER_TURN_STATUS, IDLE_HEADING, ROUND_WON_STATUS,
    VICTORY_MESSAGE, WRONG_MOVE_MESSAGE,
};

pub use timeline::{Fired, Timeline};

/// Deferred engine action carried by a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TurnAction {
    ActivatePad(PadColor),
    ReleasePad(PadColor),
    BeginPlayerTurn,
    BeginComputerTurn,
}

/// Represents the authoritative Simon Says session state.
#[derive(Debug)]
pub struct World {
    colors: Box<dyn ColorSource>,
    timing: Timing,
    level: Level,
    target: RoundTarget,
    phase: Phase,
    round: u32,
    reference: Vec<PadColor>,
    candidate: Vec<PadColor>,
    lit_pads: Vec<PadColor>,
    pads_interactive: bool,
    generation: Generation,
    timeline: Timeline<TurnAction>,
    last_outcome: Option<Outcome>,
}

impl World {
    /// Creates an idle world that draws new colors from `colors`.
    #[must_use]
    pub fn new(colors: Box<dyn ColorSource>) -> Self {
        let level = Level::default();
        Self {
            colors,
            timing: Timing::default(),
            level,
            target: level.round_target(),
            phase: Phase::Idle,
            round: 0,
            reference: Vec::new(),
            candidate: Vec::new(),
            lit_pads: Vec::new(),
            pads_interactive: false,
            generation: Generation::default(),
            timeline: Timeline::new(),
            last_outcome: None,
        }
    }

    /// Replaces the durations used to pace playback and turn transitions.
    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    fn schedule(&mut self, delay: Duration, action: TurnAction) {
        let _ = self.timeline.schedule(delay, self.generation, action);
    }

    fn set_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        debug!("phase {:?} -> {:?} (round {})", self.phase, phase, self.round);
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn set_pads_interactive(&mut self, interactive: bool, out_events: &mut Vec<Event>) {
        self.pads_interactive = interactive;
        out_events.push(Event::PadsInteractivityChanged { interactive });
    }

    fn activate_pad(&mut self, color: PadColor, out_events: &mut Vec<Event>) {
        self.lit_pads.push(color);
        out_events.push(Event::PadActivated { color });
        self.schedule(self.timing.pad_flash, TurnAction::ReleasePad(color));
    }

    fn release_pad(&mut self, color: PadColor, out_events: &mut Vec<Event>) {
        if let Some(position) = self.lit_pads.iter().position(|lit| *lit == color) {
            let _ = self.lit_pads.remove(position);
            out_events.push(Event::PadReleased { color });
        }
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Idle {
            warn!("start requested while {:?}; ignoring", self.phase);
            return;
        }

        self.generation = self.generation.next();
        self.round = 1;
        self.reference.clear();
        self.candidate.clear();
        debug!(
            "game started at level {} (target {}, generation {})",
            self.level,
            self.target,
            self.generation.get()
        );
        out_events.push(Event::GameStarted {
            level: self.level,
            target: self.target,
        });
        out_events.push(Event::UiModeChanged {
            mode: UiMode::Playing,
        });
        self.begin_computer_turn(out_events);
    }

    fn begin_computer_turn(&mut self, out_events: &mut Vec<Event>) {
        self.set_phase(Phase::ComputerTurn, out_events);
        self.set_pads_interactive(false, out_events);
        out_events.push(Event::StatusChanged {
            text: COMPUTER_TURN_STATUS.to_owned(),
        });
        out_events.push(Event::HeadingChanged {
            text: format!("Round {} of {}", self.round, self.target),
        });

        let color = self.colors.next_color();
        self.reference.push(color);
        out_events.push(Event::SequenceExtended {
            color,
            length: self.reference.len(),
        });

        let playback: Vec<(Duration, PadColor)> = self
            .reference
            .iter()
            .enumerate()
            .map(|(index, color)| (self.timing.activation_offset(index), *color))
            .collect();
        for (offset, color) in playback {
            self.schedule(offset, TurnAction::ActivatePad(color));
        }
        self.schedule(
            self.timing.player_turn_offset(self.round),
            TurnAction::BeginPlayerTurn,
        );
    }

    fn begin_player_turn(&mut self, out_events: &mut Vec<Event>) {
        self.set_phase(Phase::PlayerTurn, out_events);
        self.set_pads_interactive(true, out_events);
        self.candidate.clear();
        out_events.push(Event::StatusChanged {
            text: presses_left(self.remaining_presses()),
        });
    }

    fn submit_press(&mut self, color: PadColor, out_events: &mut Vec<Event>) {
        if self.phase != Phase::PlayerTurn {
            debug!("press on {color} ignored while {:?}", self.phase);
            out_events.push(Event::PressIgnored {
                color,
                phase: self.phase,
            });
            return;
        }

        self.candidate.push(color);
        let index = self.candidate.len() - 1;
        let remaining = self.remaining_presses();
        self.activate_pad(color, out_events);
        out_events.push(Event::PadPressed { color, remaining });

        if self.reference.get(index) != Some(&color) {
            self.set_phase(Phase::GameOver, out_events);
            self.end_round(WRONG_MOVE_MESSAGE, Outcome::Lost, out_events);
        } else if remaining == 0 {
            self.complete_round(out_events);
        } else {
            out_events.push(Event::StatusChanged {
                text: presses_left(remaining),
            });
        }
    }

    fn complete_round(&mut self, out_events: &mut Vec<Event>) {
        if self.candidate.len() == self.target.get() as usize {
            self.set_phase(Phase::GameComplete, out_events);
            self.end_round(VICTORY_MESSAGE, Outcome::Won, out_events);
            return;
        }

        self.round = self.round.saturating_add(1);
        self.candidate.clear();
        self.set_phase(Phase::RoundWon, out_events);
        self.set_pads_interactive(false, out_events);
        out_events.push(Event::StatusChanged {
            text: ROUND_WON_STATUS.to_owned(),
        });
        self.schedule(
            self.timing.round_advance_delay,
            TurnAction::BeginComputerTurn,
        );
    }

    fn end_round(&mut self, message: &str, outcome: Outcome, out_events: &mut Vec<Event>) {
        let cancelled = self.timeline.cancel_all();
        self.generation = self.generation.next();
        debug!(
            "game ended {:?} in round {}; cancelled {} pending timers",
            outcome, self.round, cancelled
        );

        for color in std::mem::take(&mut self.lit_pads) {
            out_events.push(Event::PadReleased { color });
        }
        self.reference.clear();
        self.candidate.clear();
        self.round = 0;
        self.last_outcome = Some(outcome);

        self.set_phase(Phase::Idle, out_events);
        out_events.push(Event::GameEnded {
            outcome,
            message: message.to_owned(),
        });
        out_events.push(Event::HeadingChanged {
            text: IDLE_HEADING.to_owned(),
        });
        out_events.push(Event::UiModeChanged { mode: UiMode::Idle });
        self.set_pads_interactive(false, out_events);
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let until = self.timeline.now().saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        while let Some(fired) = self.timeline.pop_due(until) {
            if fired.generation != self.generation {
                trace!(
                    "discarding timer {} from generation {}",
                    fired.id.get(),
                    fired.generation.get()
                );
                continue;
            }
            trace!("timer {} fired at {:?}", fired.id.get(), fired.due);
            self.fire(fired.action, out_events);
        }
        self.timeline.advance_to(until);
    }

    fn fire(&mut self, action: TurnAction, out_events: &mut Vec<Event>) {
        match action {
            TurnAction::ActivatePad(color) => self.activate_pad(color, out_events),
            TurnAction::ReleasePad(color) => self.release_pad(color, out_events),
            TurnAction::BeginPlayerTurn => self.begin_player_turn(out_events),
            TurnAction::BeginComputerTurn => self.begin_computer_turn(out_events),
        }
    }

    fn remaining_presses(&self) -> usize {
        self.reference.len().saturating_sub(self.candidate.len())
    }
}

fn presses_left(remaining: usize) -> String {
    format!("{remaining} presses left")
}

/// Selects the level used by the next game and returns its round target.
///
/// `None` selects level 1. Levels outside 1..=4 and requests made while a
/// game is running are returned as errors and leave the world untouched.
pub fn configure_level(world: &mut World, level: Option<u32>) -> Result<RoundTarget, LevelError> {
    if world.phase != Phase::Idle {
        return Err(LevelError::GameInProgress);
    }

    let level = match level {
        Some(level) => Level::new(level)?,
        None => Level::default(),
    };
    world.level = level;
    world.target = level.round_target();
    Ok(world.target)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLevel { level } => match configure_level(world, level) {
            Ok(target) => out_events.push(Event::LevelConfigured {
                level: world.level,
                target,
            }),
            Err(error) => {
                warn!("level {level:?} rejected: {error}");
                out_events.push(Event::LevelRejected { error });
            }
        },
        Command::StartGame => world.start(out_events),
        Command::PressPad { color } => world.submit_press(color, out_events),
        Command::Tick { dt } => world.advance(dt, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use simon_says_core::{Level, Outcome, PadColor, Phase, RoundTarget, Timing};

    /// Phase of the round state machine.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Level selected for the current or next game.
    #[must_use]
    pub fn level(world: &World) -> Level {
        world.level
    }

    /// Number of rounds required to win at the selected level.
    #[must_use]
    pub fn round_target(world: &World) -> RoundTarget {
        world.target
    }

    /// Current 1-based round, or zero while idle.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.round
    }

    /// Sequence the player must reproduce.
    #[must_use]
    pub fn reference_sequence(world: &World) -> &[PadColor] {
        &world.reference
    }

    /// Presses the player made during the current round.
    #[must_use]
    pub fn candidate_sequence(world: &World) -> &[PadColor] {
        &world.candidate
    }

    /// Presses still required to finish the current round.
    #[must_use]
    pub fn remaining_presses(world: &World) -> usize {
        world.remaining_presses()
    }

    /// Whether pad presses are currently accepted.
    #[must_use]
    pub fn pads_interactive(world: &World) -> bool {
        world.pads_interactive
    }

    /// Result of the most recently finished game.
    #[must_use]
    pub fn last_outcome(world: &World) -> Option<Outcome> {
        world.last_outcome
    }

    /// Durations pacing playback and transitions.
    #[must_use]
    pub fn timing(world: &World) -> Timing {
        world.timing
    }

    /// Position of the virtual clock.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.timeline.now()
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_timers(world: &World) -> usize {
        world.timeline.pending()
    }

    /// Time remaining until the earliest pending timer fires.
    #[must_use]
    pub fn until_next_timer(world: &World) -> Option<Duration> {
        world
            .timeline
            .next_due()
            .map(|due| due.saturating_sub(world.timeline.now()))
    }
}
