#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Simon Says engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative round engine, and the color sources feeding it. Adapters
//! submit [`Command`] values describing player intent or elapsed time, the
//! world executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values that presentation layers render.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Heading shown while no game is running.
pub const IDLE_HEADING: &str = "Simon Says";

/// Status shown while the engine plays back the reference sequence.
pub const COMPUTER_TURN_STATUS: &str = "The computer's turn...";

/// Status shown between a completed round and the next computer turn.
pub const ROUND_WON_STATUS: &str = "Nice! Keep going!";

/// Message announced when the player presses the wrong pad.
pub const WRONG_MOVE_MESSAGE: &str = "Wrong move! Game over.";

/// Message announced when the player matches every round of the level.
pub const VICTORY_MESSAGE: &str = "Congratulations! You completed all rounds.";

/// Prompt returned for any level outside the supported table.
pub const LEVEL_PROMPT: &str = "Please enter level 1, 2, 3, or 4";

/// Round targets indexed by `level - 1`.
const ROUND_TARGETS: [u32; 4] = [8, 14, 20, 31];

/// Commands that express all permissible engine mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Selects the level, and therefore the round target, for the next game.
    ConfigureLevel {
        /// Requested level; `None` selects level 1.
        level: Option<u32>,
    },
    /// Starts a new game using the configured level.
    StartGame,
    /// Delivers a player press on the provided pad.
    PressPad {
        /// Color of the pad the player pressed.
        color: PadColor,
    },
    /// Advances the engine's virtual clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the engine after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the virtual clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a level was selected for the next game.
    LevelConfigured {
        /// Level that became active.
        level: Level,
        /// Number of rounds the player must complete at that level.
        target: RoundTarget,
    },
    /// Reports that a level request was rejected.
    LevelRejected {
        /// Specific reason the request failed.
        error: LevelError,
    },
    /// Announces that a new game began.
    GameStarted {
        /// Level the game is played at.
        level: Level,
        /// Number of rounds the player must complete.
        target: RoundTarget,
    },
    /// Announces that the engine entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Confirms that the reference sequence grew by one color.
    SequenceExtended {
        /// Color appended to the reference sequence.
        color: PadColor,
        /// Length of the reference sequence after the append.
        length: usize,
    },
    /// Requests one-shot visual and audio feedback for a pad.
    PadActivated {
        /// Pad that lit up.
        color: PadColor,
    },
    /// Requests that a previously activated pad revert its visual state.
    PadReleased {
        /// Pad that returned to rest.
        color: PadColor,
    },
    /// Toggles whether pad presses should reach the engine.
    PadsInteractivityChanged {
        /// Whether pads accept presses.
        interactive: bool,
    },
    /// Replaces the status text.
    StatusChanged {
        /// Text to display.
        text: String,
    },
    /// Replaces the heading text.
    HeadingChanged {
        /// Text to display.
        text: String,
    },
    /// Switches between the start control and the status surface.
    UiModeChanged {
        /// Layout that became active.
        mode: UiMode,
    },
    /// Confirms that a press was recorded into the candidate sequence.
    PadPressed {
        /// Pad the player pressed.
        color: PadColor,
        /// Presses still required to finish the round.
        remaining: usize,
    },
    /// Reports that a press arrived outside the player's turn and was dropped.
    PressIgnored {
        /// Pad the player pressed.
        color: PadColor,
        /// Phase that was active when the press arrived.
        phase: Phase,
    },
    /// Announces that the game finished and the engine reset.
    GameEnded {
        /// Whether the player lost or completed every round.
        outcome: Outcome,
        /// Message that should be shown to the player.
        message: String,
    },
}

/// The four colored pads of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadColor {
    /// Top-left pad.
    Red,
    /// Top-right pad.
    Green,
    /// Bottom-left pad.
    Blue,
    /// Bottom-right pad.
    Yellow,
}

impl PadColor {
    /// Every pad in board order.
    pub const ALL: [PadColor; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    /// Lowercase name used by adapters to tag pad elements.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
        }
    }

    /// Resolves an adapter token into a pad color.
    ///
    /// Accepts full names and single-letter initials, ignoring case and
    /// surrounding whitespace. Returns `None` for anything else so adapters
    /// can drop presses that carry no resolvable color.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL.into_iter().find(|color| {
            let name = color.name();
            token.eq_ignore_ascii_case(name) || token.eq_ignore_ascii_case(&name[..1])
        })
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Difficulty preset selecting the total round target of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Level(u8);

impl Level {
    /// Lowest supported level.
    pub const MIN: u32 = 1;
    /// Highest supported level.
    pub const MAX: u32 = 4;

    /// Validates the provided level against the supported table.
    pub fn new(level: u32) -> Result<Self, LevelError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(LevelError::OutOfRange {
                level: i64::from(level),
            })
        }
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0 as u32
    }

    /// Number of rounds the player must complete at this level.
    #[must_use]
    pub const fn round_target(&self) -> RoundTarget {
        RoundTarget(ROUND_TARGETS[self.0 as usize - 1])
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u32> for Level {
    type Error = LevelError;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Level> for u32 {
    fn from(level: Level) -> Self {
        level.get()
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let level: i64 = trimmed.parse().map_err(|_| LevelError::Unparsable {
            input: trimmed.to_owned(),
        })?;
        let level = u32::try_from(level).map_err(|_| LevelError::OutOfRange { level })?;
        Self::new(level)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of rounds a player must complete to win a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundTarget(u32);

impl RoundTarget {
    /// Retrieves the numeric round count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for RoundTarget {
    fn default() -> Self {
        Level::default().round_target()
    }
}

impl fmt::Display for RoundTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a level request may be rejected by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum LevelError {
    /// The requested level falls outside the supported table.
    #[error("Please enter level 1, 2, 3, or 4")]
    OutOfRange {
        /// Level that was requested.
        level: i64,
    },
    /// The provided text does not describe an integer level.
    #[error("Please enter level 1, 2, 3, or 4")]
    Unparsable {
        /// Text that failed to parse.
        input: String,
    },
    /// The level cannot change while a game is running.
    #[error("The level can only be changed between games")]
    GameInProgress,
}

/// Phases of the round state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No game is running; the start control is visible.
    #[default]
    Idle,
    /// The engine is extending and playing back the reference sequence.
    ComputerTurn,
    /// The player reproduces the reference sequence.
    PlayerTurn,
    /// The player matched the round; the next computer turn is pending.
    RoundWon,
    /// The player pressed a wrong pad; the engine is resetting.
    GameOver,
    /// The player matched every round of the level; the engine is resetting.
    GameComplete,
}

/// Terminal result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player pressed a wrong pad.
    Lost,
    /// The player completed every round of the level.
    Won,
}

/// Screen layout requested from the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiMode {
    /// Start control visible, status surface hidden.
    Idle,
    /// Start control hidden, status surface visible.
    Playing,
}

/// Durations that pace playback and turn transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Spacing between consecutive pad activations during playback.
    pub playback_interval: Duration,
    /// Pause after the final playback slot before the player's turn begins.
    pub turn_grace: Duration,
    /// Pause between a completed round and the next computer turn.
    pub round_advance_delay: Duration,
    /// Time an activated pad stays lit.
    pub pad_flash: Duration,
}

impl Timing {
    /// Offset at which the pad at `index` of the reference sequence lights up.
    #[must_use]
    pub fn activation_offset(&self, index: usize) -> Duration {
        self.playback_interval
            .saturating_mul(u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX))
    }

    /// Offset at which the player's turn begins for the provided round.
    #[must_use]
    pub fn player_turn_offset(&self, round: u32) -> Duration {
        self.playback_interval
            .saturating_mul(round)
            .saturating_add(self.turn_grace)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            playback_interval: Duration::from_millis(600),
            turn_grace: Duration::from_millis(1_000),
            round_advance_delay: Duration::from_millis(1_000),
            pad_flash: Duration::from_millis(500),
        }
    }
}

/// Source of the colors appended to the reference sequence.
///
/// The engine draws exactly one color per computer turn. Implementations
/// should pick uniformly among [`PadColor::ALL`] with replacement; tests may
/// supply scripted sequences instead.
pub trait ColorSource: fmt::Debug {
    /// Draws the next color to append.
    fn next_color(&mut self) -> PadColor;
}

/// Handle identifying a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    /// Creates a new timer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Session tag stamped on scheduled timers; bumped on every start and reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    /// Creates a generation with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the generation.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the generation that supersedes this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn level_table_matches_round_targets() {
        let targets: Vec<u32> = (1..=4)
            .map(|level| Level::new(level).expect("valid level").round_target().get())
            .collect();
        assert_eq!(targets, vec![8, 14, 20, 31]);
    }

    #[test]
    fn default_level_is_level_one() {
        assert_eq!(Level::default().get(), 1);
        assert_eq!(RoundTarget::default().get(), 8);
    }

    #[test]
    fn out_of_range_levels_are_rejected_with_prompt() {
        for level in [0, 5, 8, 100] {
            let error = Level::new(level).expect_err("level outside table");
            assert_eq!(
                error,
                LevelError::OutOfRange {
                    level: i64::from(level)
                }
            );
            assert_eq!(error.to_string(), LEVEL_PROMPT);
        }
    }

    #[test]
    fn levels_parse_from_text() {
        assert_eq!("3".parse::<Level>().expect("valid").get(), 3);
        assert_eq!(" 4 ".parse::<Level>().expect("valid").get(), 4);
        assert_eq!(
            "-2".parse::<Level>(),
            Err(LevelError::OutOfRange { level: -2 })
        );

        let error = "two".parse::<Level>().expect_err("not an integer");
        assert_eq!(
            error,
            LevelError::Unparsable {
                input: "two".to_owned()
            }
        );
        assert_eq!(error.to_string(), LEVEL_PROMPT);
        assert!("1.5".parse::<Level>().is_err());
    }

    #[test]
    fn pad_tokens_resolve_names_and_initials() {
        assert_eq!(PadColor::from_token("red"), Some(PadColor::Red));
        assert_eq!(PadColor::from_token("G"), Some(PadColor::Green));
        assert_eq!(PadColor::from_token(" Blue "), Some(PadColor::Blue));
        assert_eq!(PadColor::from_token("y"), Some(PadColor::Yellow));
        assert_eq!(PadColor::from_token(""), None);
        assert_eq!(PadColor::from_token("purple"), None);
        assert_eq!(PadColor::from_token("re"), None);
    }

    #[test]
    fn timing_offsets_follow_playback_model() {
        let timing = Timing::default();
        assert_eq!(timing.activation_offset(0), Duration::from_millis(600));
        assert_eq!(timing.activation_offset(2), Duration::from_millis(1_800));
        assert_eq!(timing.player_turn_offset(1), Duration::from_millis(1_600));
        assert_eq!(timing.player_turn_offset(5), Duration::from_millis(4_000));
    }

    #[test]
    fn generation_advances_monotonically() {
        let first = Generation::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn pad_color_round_trips_through_bincode() {
        assert_round_trip(&PadColor::Yellow);
    }

    #[test]
    fn level_round_trips_through_bincode() {
        assert_round_trip(&Level::new(3).expect("valid level"));
    }

    #[test]
    fn deserialized_level_outside_table_is_rejected() {
        for raw in [0_u32, 5, 9] {
            let bytes = bincode::serialize(&raw).expect("serialize");
            let restored: Result<Level, _> = bincode::deserialize(&bytes);
            assert!(restored.is_err(), "level {raw} should be rejected");
        }

        let bytes = bincode::serialize(&4_u32).expect("serialize");
        let restored: Level = bincode::deserialize(&bytes).expect("level 4 is valid");
        assert_eq!(restored.round_target().get(), 31);
    }

    #[test]
    fn outcome_round_trips_through_bincode() {
        assert_round_trip(&Outcome::Won);
    }
}
