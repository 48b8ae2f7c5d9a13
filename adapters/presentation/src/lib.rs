#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation contracts for Simon Says adapters.
//!
//! Front ends implement [`Presenter`] and feed every event batch produced by
//! the round engine through [`dispatch`]. In the opposite direction,
//! [`start_requested`] and [`pad_pressed`] translate raw UI input into engine
//! commands.

use anyhow::Result;
use log::warn;
use simon_says_core::{Command, Event, PadColor, UiMode};

/// Callback surface the round engine drives to render a game.
///
/// Failures are reported back to [`dispatch`], which logs them and moves on;
/// they never reach the engine.
pub trait Presenter {
    /// Replaces the visible status text.
    fn render_status(&mut self, text: &str) -> Result<()>;

    /// Replaces the visible heading text.
    fn render_heading(&mut self, text: &str) -> Result<()>;

    /// Toggles whether pad presses should be forwarded to the engine.
    fn set_pads_interactive(&mut self, interactive: bool) -> Result<()>;

    /// Plays the pad's light and sound once.
    fn activate_pad(&mut self, color: PadColor) -> Result<()>;

    /// Reverts the pad's visual state after an activation.
    fn release_pad(&mut self, _color: PadColor) -> Result<()> {
        Ok(())
    }

    /// Shows the start control and hides the status surface.
    fn show_idle_ui(&mut self) -> Result<()>;

    /// Hides the start control and reveals the status surface.
    fn show_playing_ui(&mut self) -> Result<()>;

    /// Shows a message the player must acknowledge, such as the game result.
    fn announce(&mut self, text: &str) -> Result<()>;
}

/// Forwards an event batch to the presenter in order.
///
/// Returns the number of callbacks that failed. A failing callback is logged
/// and skipped so the remaining events are still presented.
pub fn dispatch<P>(events: &[Event], presenter: &mut P) -> usize
where
    P: Presenter + ?Sized,
{
    let mut failures = 0;
    for event in events {
        if let Err(error) = present(event, presenter) {
            warn!("presenter failed on {event:?}: {error:#}");
            failures += 1;
        }
    }
    failures
}

fn present<P>(event: &Event, presenter: &mut P) -> Result<()>
where
    P: Presenter + ?Sized,
{
    match event {
        Event::StatusChanged { text } => presenter.render_status(text),
        Event::HeadingChanged { text } => presenter.render_heading(text),
        Event::PadsInteractivityChanged { interactive } => {
            presenter.set_pads_interactive(*interactive)
        }
        Event::PadActivated { color } => presenter.activate_pad(*color),
        Event::PadReleased { color } => presenter.release_pad(*color),
        Event::UiModeChanged { mode: UiMode::Idle } => presenter.show_idle_ui(),
        Event::UiModeChanged {
            mode: UiMode::Playing,
        } => presenter.show_playing_ui(),
        Event::GameEnded { message, .. } => presenter.announce(message),
        Event::LevelRejected { error } => presenter.announce(&error.to_string()),
        Event::TimeAdvanced { .. }
        | Event::LevelConfigured { .. }
        | Event::GameStarted { .. }
        | Event::PhaseChanged { .. }
        | Event::SequenceExtended { .. }
        | Event::PadPressed { .. }
        | Event::PressIgnored { .. } => Ok(()),
    }
}

/// Commands issued when the player asks to start a game at `level`.
#[must_use]
pub fn start_requested(level: Option<u32>) -> [Command; 2] {
    [Command::ConfigureLevel { level }, Command::StartGame]
}

/// Command issued when the player presses the pad tagged with `token`.
///
/// Tokens that do not name a pad (clicks on the gaps between pads, stray
/// keys) produce no command.
#[must_use]
pub fn pad_pressed(token: &str) -> Option<Command> {
    PadColor::from_token(token).map(|color| Command::PressPad { color })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_request_configures_before_starting() {
        assert_eq!(
            start_requested(Some(2)),
            [Command::ConfigureLevel { level: Some(2) }, Command::StartGame]
        );
    }

    #[test]
    fn pad_press_resolves_known_tokens() {
        assert_eq!(
            pad_pressed("yellow"),
            Some(Command::PressPad {
                color: PadColor::Yellow
            })
        );
        assert_eq!(
            pad_pressed("b"),
            Some(Command::PressPad {
                color: PadColor::Blue
            })
        );
    }

    #[test]
    fn pad_press_ignores_unresolvable_tokens() {
        assert_eq!(pad_pressed(""), None);
        assert_eq!(pad_pressed("pad-container"), None);
    }
}
