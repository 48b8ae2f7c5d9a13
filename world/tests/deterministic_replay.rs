use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use simon_says_core::{Command, Event, Outcome, PadColor, Phase};
use simon_says_system_sequencer::SeededColors;
use simon_says_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(0x51_4d_0e, 4);
    let second = replay(0x51_4d_0e, 4);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.reference.len(), 5);
    assert_eq!(first.outcome, Some(Outcome::Lost));
}

#[test]
fn replay_differs_across_seeds() {
    let first = replay(1, 6);
    let second = replay(2, 6);

    assert_ne!(first.reference, second.reference);
    assert_ne!(first.fingerprint(), second.fingerprint());
}

#[test]
fn frame_sized_ticks_reach_player_turn_on_schedule() {
    let outcome = replay(7, 1);
    let first_turn = outcome
        .log
        .iter()
        .find(|record| record.event == Event::PhaseChanged { phase: Phase::PlayerTurn })
        .expect("player turn reached");

    assert!(first_turn.at >= Duration::from_millis(1_600));
    assert!(first_turn.at < Duration::from_millis(1_600) + FRAME);
}

fn replay(seed: u64, rounds_to_clear: usize) -> ReplayOutcome {
    let mut world = World::new(Box::new(SeededColors::new(seed)));
    let mut log = Vec::new();

    submit(&mut world, Command::ConfigureLevel { level: Some(2) }, &mut log);
    submit(&mut world, Command::StartGame, &mut log);

    let mut cleared = 0;
    let mut reference = Vec::new();
    while query::phase(&world) != Phase::Idle {
        if query::phase(&world) != Phase::PlayerTurn {
            submit(&mut world, Command::Tick { dt: FRAME }, &mut log);
            continue;
        }

        reference = query::reference_sequence(&world).to_vec();
        if cleared == rounds_to_clear {
            let wrong = wrong_color(reference[0]);
            submit(&mut world, Command::PressPad { color: wrong }, &mut log);
            continue;
        }

        for color in reference.clone() {
            submit(&mut world, Command::PressPad { color }, &mut log);
        }
        cleared += 1;
    }

    ReplayOutcome {
        reference,
        outcome: query::last_outcome(&world),
        log,
    }
}

fn submit(world: &mut World, command: Command, log: &mut Vec<EventRecord>) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    let at = query::now(world);
    log.extend(events.into_iter().map(|event| EventRecord { at, event }));
}

fn wrong_color(expected: PadColor) -> PadColor {
    match expected {
        PadColor::Red => PadColor::Green,
        PadColor::Green => PadColor::Blue,
        PadColor::Blue => PadColor::Yellow,
        PadColor::Yellow => PadColor::Red,
    }
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    reference: Vec<PadColor>,
    outcome: Option<Outcome>,
    log: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.reference.hash(&mut hasher);
        self.outcome.hash(&mut hasher);
        for record in &self.log {
            record.at.hash(&mut hasher);
            format!("{:?}", record.event).hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[derive(Debug, PartialEq)]
struct EventRecord {
    at: Duration,
    event: Event,
}
