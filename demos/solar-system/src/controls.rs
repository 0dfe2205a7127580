/// Control-panel commands and the panel's button/label model.
///
/// Commands travel to the game as `InputEvent::Custom` so the built-in panel
/// and a host page calling `app_custom_event` drive the same code path.

use crate::orbit::{DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};

// ── Custom event kinds ──────────────────────────────────────────────

/// a = planet index, b = multiplier.
pub const CUSTOM_SET_SPEED: u32 = 1;
/// a = planet index.
pub const CUSTOM_FOCUS: u32 = 2;
pub const CUSTOM_RESET_VIEW: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetSpeed { planet: usize, multiplier: f32 },
    Focus { planet: usize },
    ResetView,
}

fn planet_index(a: f32) -> Option<usize> {
    (a.is_finite() && a >= 0.0 && a.fract() == 0.0).then_some(a as usize)
}

impl Command {
    /// `(kind, a, b, c)` for `InputEvent::Custom`.
    pub fn encode(self) -> (u32, f32, f32, f32) {
        match self {
            Command::SetSpeed { planet, multiplier } => (CUSTOM_SET_SPEED, planet as f32, multiplier, 0.0),
            Command::Focus { planet } => (CUSTOM_FOCUS, planet as f32, 0.0, 0.0),
            Command::ResetView => (CUSTOM_RESET_VIEW, 0.0, 0.0, 0.0),
        }
    }

    /// Inverse of `encode`. Unknown kinds and malformed planet indices
    /// yield `None`; range checks against the catalogue happen in the game.
    pub fn decode(kind: u32, a: f32, b: f32, _c: f32) -> Option<Self> {
        match kind {
            CUSTOM_SET_SPEED => Some(Command::SetSpeed {
                planet: planet_index(a)?,
                multiplier: b,
            }),
            CUSTOM_FOCUS => Some(Command::Focus { planet: planet_index(a)? }),
            CUSTOM_RESET_VIEW => Some(Command::ResetView),
            _ => None,
        }
    }
}

/// Slider value label, e.g. `"1.5x"`.
pub fn format_multiplier(multiplier: f32) -> String {
    format!("{multiplier:.1}x")
}

/// Slider values mirrored into the DOM panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanelState {
    multipliers: Vec<f32>,
}

impl ControlPanelState {
    pub fn new(planet_count: usize) -> Self {
        Self {
            multipliers: vec![DEFAULT_SPEED; planet_count],
        }
    }

    /// Handle a slider's raw string value. Returns the command to send and
    /// the new value label, or `None` for unparsable input or an unknown
    /// slider.
    pub fn slider_input(&mut self, planet: usize, raw: &str) -> Option<(Command, String)> {
        let value: f32 = raw.trim().parse().ok().filter(|v: &f32| v.is_finite())?;
        let slot = self.multipliers.get_mut(planet)?;
        *slot = value.clamp(MIN_SPEED, MAX_SPEED);
        let multiplier = *slot;
        Some((Command::SetSpeed { planet, multiplier }, format_multiplier(multiplier)))
    }
}

/// Enabled state of the Pause / Resume buttons, which disable each other.
/// Always derived from the app's pause flag, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseButtons {
    pub pause_disabled: bool,
    pub resume_disabled: bool,
}

impl PauseButtons {
    pub fn for_state(paused: bool) -> Self {
        Self {
            pause_disabled: paused,
            resume_disabled: !paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_survive_the_custom_event_channel() {
        for cmd in [
            Command::SetSpeed { planet: 3, multiplier: 2.5 },
            Command::Focus { planet: 7 },
            Command::ResetView,
        ] {
            let (kind, a, b, c) = cmd.encode();
            assert_eq!(Command::decode(kind, a, b, c), Some(cmd));
        }
    }

    #[test]
    fn malformed_events_are_rejected() {
        assert_eq!(Command::decode(42, 0.0, 0.0, 0.0), None);
        assert_eq!(Command::decode(CUSTOM_FOCUS, -1.0, 0.0, 0.0), None);
        assert_eq!(Command::decode(CUSTOM_FOCUS, 1.5, 0.0, 0.0), None);
        assert_eq!(Command::decode(CUSTOM_SET_SPEED, f32::NAN, 1.0, 0.0), None);
    }

    #[test]
    fn labels_use_one_decimal() {
        assert_eq!(format_multiplier(1.0), "1.0x");
        assert_eq!(format_multiplier(2.0), "2.0x");
        assert_eq!(format_multiplier(0.1), "0.1x");
    }

    #[test]
    fn slider_input_clamps_and_labels() {
        let mut state = ControlPanelState::new(8);
        let (cmd, label) = state.slider_input(2, "2.5").unwrap();
        assert_eq!(cmd, Command::SetSpeed { planet: 2, multiplier: 2.5 });
        assert_eq!(label, "2.5x");

        let (cmd, label) = state.slider_input(2, "12").unwrap();
        assert_eq!(cmd, Command::SetSpeed { planet: 2, multiplier: 5.0 });
        assert_eq!(label, "5.0x");

        let (_, label) = state.slider_input(2, " 0.05 ").unwrap();
        assert_eq!(label, "0.1x");

        assert!(state.slider_input(2, "fast").is_none());
        assert!(state.slider_input(2, "NaN").is_none());
        assert!(state.slider_input(99, "1.0").is_none());
    }

    #[test]
    fn pause_and_resume_buttons_disable_each_other() {
        let running = PauseButtons::for_state(false);
        assert!(!running.pause_disabled);
        assert!(running.resume_disabled);
        let paused = PauseButtons::for_state(true);
        assert!(paused.pause_disabled);
        assert!(!paused.resume_disabled);
    }

    #[test]
    fn buttons_follow_a_pause_from_outside_the_panel() {
        use orrery_engine::InputEvent;
        use orrery_web::GameRunner;
        use crate::game::SolarSystem;

        let mut runner = GameRunner::new(SolarSystem::new());
        runner.init();
        let mut buttons = PauseButtons::for_state(runner.is_paused());
        assert_eq!(buttons, PauseButtons::for_state(false));

        // A host page pausing through the exported API goes through the
        // same runner event, so the reported change drives the buttons.
        if let Some(paused) = runner.push_input(InputEvent::Pause) {
            buttons = PauseButtons::for_state(paused);
        }
        assert!(buttons.pause_disabled);
        assert!(!buttons.resume_disabled);
        assert_eq!(buttons, PauseButtons::for_state(runner.is_paused()));

        if let Some(paused) = runner.push_input(InputEvent::Resume) {
            buttons = PauseButtons::for_state(paused);
        }
        assert!(!buttons.pause_disabled);
        assert!(buttons.resume_disabled);
    }
}
